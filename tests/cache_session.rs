use serde_json::{Value, json};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use telemetry_charts::{Availability, DataCache, HttpFetcher, SourceConfig};

fn session(dir: &std::path::Path) -> DataCache<HttpFetcher> {
    let cfg = SourceConfig::local_only(dir.to_string_lossy().into_owned());
    DataCache::new(cfg, HttpFetcher::new().unwrap())
}

#[test]
fn three_waiters_share_one_fetch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("trends.json"), r#"{"d3d11": {"yes": 80, "no": 20}}"#).unwrap();

    let mut cache = session(dir.path());
    let seen: Rc<RefCell<Vec<(u8, Rc<Value>)>>> = Rc::new(RefCell::new(Vec::new()));
    let mut how = Vec::new();
    for id in 0..3u8 {
        let seen = Rc::clone(&seen);
        how.push(cache.ensure_data("trends.json", move |v| seen.borrow_mut().push((id, v))));
    }
    assert_eq!(
        how,
        [Availability::Started, Availability::Joined, Availability::Joined]
    );
    assert_eq!(cache.fetcher().in_flight(), 1);

    cache.run_until_idle();

    let seen = seen.borrow();
    assert_eq!(seen.iter().map(|(id, _)| *id).collect::<Vec<_>>(), [0, 1, 2]);
    for (_, v) in seen.iter() {
        assert!(Rc::ptr_eq(v, &seen[0].1));
    }
    assert_eq!(seen[0].1["d3d11"]["yes"], json!(80));
}

#[test]
fn double_encoded_payload_is_unwrapped() {
    let dir = tempfile::tempdir().unwrap();
    let inner = r#"{"a": 1}"#;
    fs::write(dir.path().join("s.json"), serde_json::to_string(inner).unwrap()).unwrap();

    let mut cache = session(dir.path());
    cache.ensure_data("s.json", |_| {});
    cache.run_until_idle();
    assert_eq!(cache.get("s.json").as_deref(), Some(&json!({"a": 1})));
}

#[test]
fn missing_dataset_never_notifies_and_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = session(dir.path());
    cache.ensure_data("late.json", |_| panic!("failed fetch must not notify"));
    cache.run_until_idle();
    assert!(cache.get("late.json").is_none());

    fs::write(dir.path().join("late.json"), "[1, 2]").unwrap();
    let got = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&got);
    assert_eq!(
        cache.ensure_data("late.json", move |v| *sink.borrow_mut() = Some(v)),
        Availability::Started
    );
    cache.run_until_idle();
    assert_eq!(got.borrow().as_deref(), Some(&json!([1, 2])));
}

#[test]
fn cleared_waiters_are_dropped_silently() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("k.json"), "{}").unwrap();
    let mut cache = session(dir.path());
    cache.ensure_data("k.json", |_| panic!("cleared waiter must not run"));
    cache.clear();
    cache.run_until_idle();
    assert_eq!(cache.get("k.json").as_deref(), Some(&json!({})));
}

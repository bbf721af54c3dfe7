//! Single active tooltip bookkeeping.
//!
//! A surface reports every hover event; the tracker decides whether the
//! tooltip must be shown, replaced, removed, or left alone. Where the tooltip
//! is drawn is up to the caller.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveHover {
    pub target: String,
    pub series_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverChange {
    /// Nothing to do.
    None,
    /// Same target and series as the active tooltip.
    Unchanged,
    /// The active tooltip was removed.
    Removed,
    /// A tooltip with this text should be shown (replacing any previous one).
    Shown(String),
}

#[derive(Debug, Default)]
pub struct HoverTracker {
    active: Option<ActiveHover>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveHover> {
        self.active.as_ref()
    }

    /// Remove the active tooltip, if any.
    pub fn remove(&mut self) -> HoverChange {
        match self.active.take() {
            Some(_) => HoverChange::Removed,
            None => HoverChange::None,
        }
    }

    /// Handle a hover event on `target`.
    ///
    /// `hit` is the hovered series index, or `None` when the pointer is over
    /// empty space. `text` is only called when a new tooltip is needed.
    pub fn hover<T>(&mut self, target: &str, hit: Option<usize>, text: T) -> HoverChange
    where
        T: FnOnce(usize) -> String,
    {
        let Some(series_index) = hit else {
            return self.remove();
        };
        if let Some(active) = &self.active
            && active.target == target
            && active.series_index == series_index
        {
            return HoverChange::Unchanged;
        }

        let text = text(series_index);
        self.active = Some(ActiveHover {
            target: target.to_string(),
            series_index,
            text: text.clone(),
        });
        HoverChange::Shown(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_series_is_unchanged() {
        let mut h = HoverTracker::new();
        assert_eq!(h.hover("pie", Some(1), |i| format!("s{i}")), HoverChange::Shown("s1".into()));
        assert_eq!(h.hover("pie", Some(1), |_| unreachable!()), HoverChange::Unchanged);
        assert_eq!(h.active().unwrap().text, "s1");
    }

    #[test]
    fn other_series_or_target_replaces() {
        let mut h = HoverTracker::new();
        h.hover("a", Some(0), |_| "x".into());
        assert_eq!(h.hover("a", Some(2), |_| "y".into()), HoverChange::Shown("y".into()));
        assert_eq!(h.hover("b", Some(2), |_| "z".into()), HoverChange::Shown("z".into()));
        assert_eq!(h.active().unwrap().target, "b");
    }

    #[test]
    fn miss_removes_once() {
        let mut h = HoverTracker::new();
        h.hover("a", Some(0), |_| "x".into());
        assert_eq!(h.hover("a", None, |_| unreachable!()), HoverChange::Removed);
        assert_eq!(h.hover("a", None, |_| unreachable!()), HoverChange::None);
        assert!(h.active().is_none());
    }
}

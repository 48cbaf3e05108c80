//! Single-slot double-click detection.

use crate::node::{HitKind, ViewId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClickIdentity {
    button: u32,
    kind: HitKind,
    view: Option<ViewId>,
}

/// Remembers the last press so the next one can be classified as the
/// second half of a double-click. Pure timing-and-identity comparison,
/// no machine state beyond the one slot.
#[derive(Debug, Default)]
pub struct DoubleClickTracker {
    identity: Option<ClickIdentity>,
    last_press_msec: Option<u32>,
}

impl DoubleClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a press. Returns `true` when it completes a
    /// double-click, in which case the slot is cleared so a third rapid
    /// press starts a fresh sequence.
    pub fn classify(
        &mut self,
        button: u32,
        kind: HitKind,
        view: Option<ViewId>,
        time_msec: u32,
        window_ms: u32,
    ) -> bool {
        let elapsed = self.last_press_msec.map(|last| time_msec.wrapping_sub(last));
        self.last_press_msec = Some(time_msec);

        let identity = ClickIdentity { button, kind, view };
        if self.identity != Some(identity) {
            self.identity = Some(identity);
            return false;
        }
        match elapsed {
            Some(ms) if ms < window_ms => {
                self.identity = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any remembered press targeting this view.
    pub fn forget_view(&mut self, view: ViewId) {
        if self.identity.is_some_and(|id| id.view == Some(view)) {
            self.identity = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::button;

    const VIEW: ViewId = ViewId(7);

    #[test]
    fn test_two_fast_presses_are_press_then_doubleclick() {
        let mut dc = DoubleClickTracker::new();
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1000, 500));
        assert!(dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1200, 500));
    }

    #[test]
    fn test_slow_presses_never_double() {
        let mut dc = DoubleClickTracker::new();
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1000, 500));
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1600, 500));
        // The slot was refreshed, so a fast follow-up still works.
        assert!(dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1700, 500));
    }

    #[test]
    fn test_third_press_starts_new_sequence() {
        let mut dc = DoubleClickTracker::new();
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1000, 500));
        assert!(dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1100, 500));
        // Immediately after a recognized double-click: press, not another double.
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1200, 500));
        assert!(dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1300, 500));
    }

    #[test]
    fn test_identity_change_resets_sequence() {
        let mut dc = DoubleClickTracker::new();
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1000, 500));
        // Different button.
        assert!(!dc.classify(button::RIGHT, HitKind::Titlebar, Some(VIEW), 1100, 500));
        // Different target view.
        assert!(!dc.classify(button::RIGHT, HitKind::Titlebar, Some(ViewId(8)), 1200, 500));
        // Different classification.
        assert!(!dc.classify(button::RIGHT, HitKind::Client, Some(ViewId(8)), 1300, 500));
    }

    #[test]
    fn test_forget_view_clears_slot() {
        let mut dc = DoubleClickTracker::new();
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1000, 500));
        dc.forget_view(VIEW);
        assert!(!dc.classify(button::LEFT, HitKind::Titlebar, Some(VIEW), 1100, 500));
    }
}

use std::time::{Duration, Instant};

/// Size change below this (on both axes) is ignored, avoiding reflow loops
/// when the host rounds the measured rect differently between frames.
const RESIZE_THRESHOLD: f32 = 1.0;

/// How long a new size must stay put before we commit it.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(50);

/// Memoizes the last committed viewport size and debounces resize bursts so
/// the layout is not recomputed on every pixel of a drag-resize.
///
/// Time is passed in by the caller, so the debounce logic is testable without
/// sleeping. The very first observation commits immediately.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    committed: Option<(f32, f32)>,
    pending: Option<Pending>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    size: (f32, f32),
    since: Instant,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one measured size. Returns `Some(size)` when the caller should
    /// recompute its layout, `None` otherwise.
    pub fn observe(&mut self, w: f32, h: f32, now: Instant) -> Option<(f32, f32)> {
        let size = (w, h);

        let Some(committed) = self.committed else {
            self.committed = Some(size);
            return Some(size);
        };

        if !differs(committed, size) {
            self.pending = None;
            return None;
        }

        match self.pending {
            // Still moving: restart the debounce window at the new size.
            Some(p) if differs(p.size, size) => {
                self.pending = Some(Pending { size, since: now });
                None
            }
            Some(p) if now.duration_since(p.since) >= RESIZE_DEBOUNCE => {
                self.committed = Some(p.size);
                self.pending = None;
                tracing::debug!(w = p.size.0, h = p.size.1, "viewport resize committed");
                Some(p.size)
            }
            Some(_) => None,
            None => {
                self.pending = Some(Pending { size, since: now });
                None
            }
        }
    }

    /// True while a resize is observed but not yet committed; the UI should
    /// keep polling (e.g. schedule a repaint) until this clears.
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    pub fn committed(&self) -> Option<(f32, f32)> {
        self.committed
    }
}

fn differs(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() > RESIZE_THRESHOLD || (a.1 - b.1).abs() > RESIZE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_commits_immediately() {
        let mut t = ViewportTracker::new();
        let now = Instant::now();
        assert_eq!(t.observe(800.0, 600.0, now), Some((800.0, 600.0)));
        assert!(!t.is_settling());
    }

    #[test]
    fn sub_threshold_jitter_is_ignored() {
        let mut t = ViewportTracker::new();
        let now = Instant::now();
        t.observe(800.0, 600.0, now);
        assert_eq!(t.observe(800.5, 599.5, now + Duration::from_millis(100)), None);
        assert!(!t.is_settling());
        assert_eq!(t.committed(), Some((800.0, 600.0)));
    }

    #[test]
    fn resize_commits_after_debounce_window() {
        let mut t = ViewportTracker::new();
        let t0 = Instant::now();
        t.observe(800.0, 600.0, t0);

        assert_eq!(t.observe(1024.0, 768.0, t0 + Duration::from_millis(10)), None);
        assert!(t.is_settling());
        // Same size again but still inside the window.
        assert_eq!(t.observe(1024.0, 768.0, t0 + Duration::from_millis(40)), None);
        // Window elapsed.
        assert_eq!(
            t.observe(1024.0, 768.0, t0 + Duration::from_millis(70)),
            Some((1024.0, 768.0))
        );
        assert!(!t.is_settling());
    }

    #[test]
    fn continued_dragging_restarts_the_window() {
        let mut t = ViewportTracker::new();
        let t0 = Instant::now();
        t.observe(800.0, 600.0, t0);

        t.observe(900.0, 600.0, t0 + Duration::from_millis(10));
        // Still dragging at 55ms: new size, window restarts.
        assert_eq!(t.observe(950.0, 600.0, t0 + Duration::from_millis(55)), None);
        assert_eq!(t.observe(950.0, 600.0, t0 + Duration::from_millis(80)), None);
        assert_eq!(
            t.observe(950.0, 600.0, t0 + Duration::from_millis(110)),
            Some((950.0, 600.0))
        );
    }

    #[test]
    fn snapping_back_cancels_the_pending_resize() {
        let mut t = ViewportTracker::new();
        let t0 = Instant::now();
        t.observe(800.0, 600.0, t0);

        t.observe(900.0, 600.0, t0 + Duration::from_millis(10));
        assert!(t.is_settling());
        assert_eq!(t.observe(800.0, 600.0, t0 + Duration::from_millis(20)), None);
        assert!(!t.is_settling());
        assert_eq!(t.committed(), Some((800.0, 600.0)));
    }
}

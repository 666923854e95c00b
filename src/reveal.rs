use crate::ease::approach;

/// Fraction of a target's height that must intersect the viewport before it
/// counts as visible.
pub const VISIBLE_RATIO: f64 = 0.2;
/// Per-frame ease factor for the slide-in presentation.
const PRESENT_FACTOR: f64 = 0.12;

/// One observed element: a vertical band in document space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealTarget {
    pub top: f64,
    pub height: f64,
}

/// Visibility observer for scroll-revealed sections. Targets are registered
/// wholesale and can be re-registered at any time, which is how content that
/// was hidden during loading gets picked up once it becomes measurable.
///
/// `update` recomputes the visible flag from the scroll window and eases a
/// per-target presentation value toward it; the renderer reads that value to
/// slide sections in rather than snapping them.
#[derive(Debug, Default)]
pub struct RevealObserver {
    targets: Vec<RevealTarget>,
    visible: Vec<bool>,
    progress: Vec<f64>,
}

impl RevealObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registration wholesale. Presentation state restarts from
    /// hidden; the next `update` settles flags against the current scroll.
    pub fn observe(&mut self, targets: Vec<RevealTarget>) {
        self.visible = vec![false; targets.len()];
        self.progress = vec![0.0; targets.len()];
        self.targets = targets;
    }

    /// Move the registered bands without disturbing presentation state, for
    /// resizes where the observed set itself is unchanged. A different target
    /// count falls back to a full re-registration.
    pub fn retarget(&mut self, targets: Vec<RevealTarget>) {
        if targets.len() == self.targets.len() {
            self.targets = targets;
        } else {
            self.observe(targets);
        }
    }

    /// Recompute visibility against the viewport band
    /// `[scroll_y, scroll_y + viewport_h]` and advance presentation easing.
    pub fn update(&mut self, scroll_y: f64, viewport_h: f64) {
        let band_top = scroll_y;
        let band_bottom = scroll_y + viewport_h;
        for (i, t) in self.targets.iter().enumerate() {
            let inter = (t.top + t.height).min(band_bottom) - t.top.max(band_top);
            self.visible[i] = t.height > 0.0 && inter / t.height >= VISIBLE_RATIO;
            let goal = if self.visible[i] { 1.0 } else { 0.0 };
            self.progress[i] = approach(self.progress[i], goal, PRESENT_FACTOR);
        }
    }

    pub fn is_visible(&self, idx: usize) -> bool {
        self.visible.get(idx).copied().unwrap_or(false)
    }

    /// Eased presentation value in [0, 1]; 1 means fully slid in.
    pub fn progress(&self, idx: usize) -> f64 {
        self.progress.get(idx).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observer(targets: &[(f64, f64)]) -> RevealObserver {
        let mut o = RevealObserver::new();
        o.observe(
            targets
                .iter()
                .map(|&(top, height)| RevealTarget { top, height })
                .collect(),
        );
        o
    }

    #[test]
    fn twenty_percent_of_height_flips_the_flag() {
        let mut o = observer(&[(1000.0, 500.0)]);

        // 99 px of 500 px visible: still hidden.
        o.update(1000.0 + 500.0 - 99.0, 99.0 + 0.0);
        assert!(!o.is_visible(0));

        // Exactly 100 px (20%) visible: flips.
        o.update(500.0, 600.0);
        assert!(o.is_visible(0));
    }

    #[test]
    fn leaving_the_band_hides_again() {
        let mut o = observer(&[(1000.0, 400.0)]);
        o.update(900.0, 600.0);
        assert!(o.is_visible(0));
        o.update(3000.0, 600.0);
        assert!(!o.is_visible(0));
    }

    #[test]
    fn progress_eases_toward_the_flag() {
        let mut o = observer(&[(0.0, 300.0)]);
        assert_eq!(o.progress(0), 0.0);

        for _ in 0..120 {
            o.update(0.0, 600.0);
        }
        assert!(o.is_visible(0));
        assert!(o.progress(0) > 0.99);

        for _ in 0..120 {
            o.update(5000.0, 600.0);
        }
        assert!(!o.is_visible(0));
        assert!(o.progress(0) < 0.01);
    }

    #[test]
    fn reobserve_replaces_registration_and_resets_state() {
        let mut o = observer(&[(0.0, 300.0)]);
        o.update(0.0, 600.0);
        assert!(o.is_visible(0));

        o.observe(vec![
            RevealTarget {
                top: 100.0,
                height: 100.0,
            },
            RevealTarget {
                top: 900.0,
                height: 100.0,
            },
        ]);
        assert_eq!(o.len(), 2);
        assert!(!o.is_visible(0), "fresh registration starts hidden");
        assert_eq!(o.progress(0), 0.0);

        o.update(0.0, 600.0);
        assert!(o.is_visible(0));
        assert!(!o.is_visible(1));
        assert_eq!(o.visible_count(), 1);
    }

    #[test]
    fn retarget_moves_bands_but_keeps_progress() {
        let mut o = observer(&[(0.0, 300.0)]);
        for _ in 0..60 {
            o.update(0.0, 600.0);
        }
        let settled = o.progress(0);
        assert!(settled > 0.9);

        o.retarget(vec![RevealTarget {
            top: 50.0,
            height: 300.0,
        }]);
        assert_eq!(o.progress(0), settled);

        // Count change still forces the reset path.
        o.retarget(vec![
            RevealTarget {
                top: 0.0,
                height: 100.0,
            },
            RevealTarget {
                top: 200.0,
                height: 100.0,
            },
        ]);
        assert_eq!(o.progress(0), 0.0);
    }

    #[test]
    fn zero_height_target_is_never_visible() {
        let mut o = observer(&[(100.0, 0.0)]);
        o.update(0.0, 600.0);
        assert!(!o.is_visible(0));
    }

    #[test]
    fn out_of_range_index_is_hidden() {
        let o = observer(&[]);
        assert!(!o.is_visible(7));
        assert_eq!(o.progress(7), 0.0);
        assert!(o.is_empty());
    }
}

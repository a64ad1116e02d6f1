//! Draggable stop panel.
//!
//! The panel is a finite-state value driven by discrete drag events and an
//! explicit clock. Offsets grow downwards: `0.0` is the resting position and
//! [`PanelConfig::dismissed_offset`] is fully hidden.
//!
//! # Examples
//! ```
//! use std::time::Duration;
//! use dinemap_core::{GesturePanel, PanelConfig};
//!
//! let mut panel = GesturePanel::new(PanelConfig::default());
//! panel.begin_drag();
//! panel.drag_move(120.0);
//! panel.end_drag();
//! panel.advance(Duration::from_secs(1));
//! assert!(panel.is_dismissed());
//! ```

use std::time::Duration;

use crate::PanelConfig;

/// Where the panel is in its gesture/animation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelPhase {
    /// Idle at the current offset.
    Resting,
    /// A touch started but has not left the dead zone.
    Pressed {
        /// Offset when the touch started.
        start_offset: f64,
    },
    /// The panel follows the finger.
    Dragging {
        /// Offset when the touch started.
        start_offset: f64,
        /// Latest cumulative vertical translation.
        translation: f64,
    },
    /// A fixed-duration settle animation is running.
    Animating {
        /// Offset when the animation started.
        from: f64,
        /// Target offset.
        to: f64,
        /// Time spent so far.
        elapsed: Duration,
    },
}

/// The stop panel's offset state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct GesturePanel {
    config: PanelConfig,
    offset: f64,
    phase: PanelPhase,
}

impl GesturePanel {
    /// A panel resting at offset `0.0`.
    #[must_use]
    pub const fn new(config: PanelConfig) -> Self {
        Self {
            config,
            offset: 0.0,
            phase: PanelPhase::Resting,
        }
    }

    /// Current vertical offset.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Whether a settle animation is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self.phase, PanelPhase::Animating { .. })
    }

    /// Whether the panel rests fully dismissed.
    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        matches!(self.phase, PanelPhase::Resting)
            && (self.offset - self.config.dismissed_offset).abs() < f64::EPSILON
    }

    /// Start a touch. Ignored while an animation runs; returns whether the
    /// touch was accepted.
    pub const fn begin_drag(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }
        self.phase = PanelPhase::Pressed {
            start_offset: self.offset,
        };
        true
    }

    /// Move the touch by a cumulative `translation` since it started.
    #[expect(
        clippy::float_arithmetic,
        reason = "offsets track the finger position"
    )]
    pub fn drag_move(&mut self, translation: f64) {
        let start_offset = match self.phase {
            PanelPhase::Pressed { start_offset } if translation.abs() > self.config.dead_zone => {
                start_offset
            }
            PanelPhase::Dragging { start_offset, .. } => start_offset,
            _ => return,
        };
        self.phase = PanelPhase::Dragging {
            start_offset,
            translation,
        };
        self.offset = (start_offset + translation).max(0.0);
    }

    /// Release the touch, settling either dismissed or back at `0.0`.
    pub fn end_drag(&mut self) {
        match self.phase {
            PanelPhase::Dragging { translation, .. } => {
                let target = if translation > self.config.dismiss_threshold {
                    self.config.dismissed_offset
                } else {
                    0.0
                };
                self.animate_to(target);
            }
            PanelPhase::Pressed { .. } => self.phase = PanelPhase::Resting,
            PanelPhase::Resting | PanelPhase::Animating { .. } => {}
        }
    }

    /// Animate back to `0.0` from wherever the panel is, interrupting any
    /// gesture or animation.
    pub fn show(&mut self) {
        self.animate_to(0.0);
    }

    /// Advance the running animation by `elapsed`.
    #[expect(
        clippy::float_arithmetic,
        reason = "linear interpolation between offsets"
    )]
    pub fn advance(&mut self, elapsed: Duration) {
        let PanelPhase::Animating {
            from,
            to,
            elapsed: so_far,
        } = self.phase
        else {
            return;
        };
        let elapsed = so_far.saturating_add(elapsed);
        if elapsed >= self.config.animation {
            self.offset = to;
            self.phase = PanelPhase::Resting;
            return;
        }
        let progress = elapsed.as_secs_f64() / self.config.animation.as_secs_f64();
        self.offset = from + (to - from) * progress;
        self.phase = PanelPhase::Animating { from, to, elapsed };
    }

    fn animate_to(&mut self, to: f64) {
        self.phase = PanelPhase::Animating {
            from: self.offset,
            to,
            elapsed: Duration::ZERO,
        };
        self.advance(Duration::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn panel() -> GesturePanel {
        GesturePanel::new(PanelConfig::default())
    }

    fn drag(panel: &mut GesturePanel, translation: f64) {
        assert!(panel.begin_drag());
        panel.drag_move(translation);
        panel.end_drag();
    }

    #[rstest]
    #[case(120.0, 400.0)]
    #[case(60.0, 0.0)]
    #[case(100.0, 0.0)]
    fn release_settles_by_threshold(
        mut panel: GesturePanel,
        #[case] translation: f64,
        #[case] resting: f64,
    ) {
        drag(&mut panel, translation);
        assert!(panel.is_animating());
        panel.advance(Duration::from_millis(250));
        assert_eq!(panel.offset(), resting);
        assert_eq!(panel.phase(), PanelPhase::Resting);
    }

    #[rstest]
    fn offset_tracks_finger_while_dragging(mut panel: GesturePanel) {
        panel.begin_drag();
        panel.drag_move(42.0);
        assert_eq!(panel.offset(), 42.0);
        panel.drag_move(-30.0);
        assert_eq!(panel.offset(), 0.0, "clamped at the resting position");
    }

    #[rstest]
    fn dead_zone_swallows_small_movement(mut panel: GesturePanel) {
        panel.begin_drag();
        panel.drag_move(4.0);
        assert_eq!(panel.offset(), 0.0);
        assert!(matches!(panel.phase(), PanelPhase::Pressed { .. }));
        panel.end_drag();
        assert_eq!(panel.phase(), PanelPhase::Resting);
    }

    #[rstest]
    fn animation_interpolates_linearly(mut panel: GesturePanel) {
        drag(&mut panel, 200.0);
        panel.advance(Duration::from_millis(125));
        assert!((panel.offset() - 300.0).abs() < 1e-9);
    }

    #[rstest]
    fn gestures_are_ignored_while_animating(mut panel: GesturePanel) {
        drag(&mut panel, 150.0);
        assert!(!panel.begin_drag());
        panel.drag_move(-150.0);
        panel.advance(Duration::from_millis(250));
        assert!(panel.is_dismissed());
    }

    #[rstest]
    fn next_gesture_starts_from_resting_offset(mut panel: GesturePanel) {
        drag(&mut panel, 150.0);
        panel.advance(Duration::from_millis(250));
        panel.begin_drag();
        panel.drag_move(-50.0);
        assert_eq!(panel.offset(), 350.0);
    }

    #[rstest]
    fn show_recovers_a_dismissed_panel(mut panel: GesturePanel) {
        drag(&mut panel, 150.0);
        panel.advance(Duration::from_millis(250));

        panel.show();
        panel.advance(Duration::from_millis(250));

        assert_eq!(panel.offset(), 0.0);
        assert!(!panel.is_dismissed());
    }

    #[rstest]
    fn show_interrupts_a_running_animation(mut panel: GesturePanel) {
        drag(&mut panel, 200.0);
        panel.advance(Duration::from_millis(125));

        panel.show();

        match panel.phase() {
            PanelPhase::Animating { from, to, .. } => {
                assert!((from - 300.0).abs() < 1e-9);
                assert_eq!(to, 0.0);
            }
            other => panic!("expected animation, got {other:?}"),
        }
    }

    #[rstest]
    fn zero_duration_animation_settles_immediately() {
        let config = PanelConfig {
            animation: Duration::ZERO,
            ..PanelConfig::default()
        };
        let mut panel = GesturePanel::new(config);
        drag(&mut panel, 120.0);
        assert!(panel.is_dismissed());
    }
}

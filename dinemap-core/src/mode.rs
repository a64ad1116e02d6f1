//! Browse / plan-route mode switch.
//!
//! Every mode-dependent behaviour reads the single [`Mode`] value held by
//! [`ModeController`]: what a marker tap does, and whether the profile
//! selector and stop panel are shown.

use std::fmt;

/// The two map interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    /// Marker taps open restaurant details.
    #[default]
    Browse,
    /// Marker taps append route stops.
    PlanRoute,
}

impl Mode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Browse => Self::PlanRoute,
            Self::PlanRoute => Self::Browse,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Browse => "browse",
            Self::PlanRoute => "plan-route",
        })
    }
}

/// What a marker tap should do in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapIntent {
    /// Show the restaurant's detail view.
    OpenDetail,
    /// Append the restaurant to the route.
    AppendStop,
}

/// Side effect required by a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing beyond the mode change itself.
    None,
    /// Leaving plan-route mode: the stop list and plan must be cleared.
    ClearRoute,
}

/// Single source of truth for the interaction mode.
///
/// # Examples
/// ```
/// use dinemap_core::mode::{Mode, ModeController, TapIntent, Transition};
///
/// let mut modes = ModeController::default();
/// assert_eq!(modes.tap_intent(), TapIntent::OpenDetail);
/// assert_eq!(modes.toggle(), Transition::None);
/// assert_eq!(modes.mode(), Mode::PlanRoute);
/// assert!(modes.shows_profile_selector());
/// assert_eq!(modes.toggle(), Transition::ClearRoute);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Flip the mode and report the side effect the caller must apply.
    pub const fn toggle(&mut self) -> Transition {
        self.enter(self.mode.toggled())
    }

    /// Switch to `mode`; entering the current mode is a no-op.
    pub const fn enter(&mut self, mode: Mode) -> Transition {
        let leaving_plan = matches!(self.mode, Mode::PlanRoute) && matches!(mode, Mode::Browse);
        self.mode = mode;
        if leaving_plan {
            Transition::ClearRoute
        } else {
            Transition::None
        }
    }

    /// Marker-tap dispatch for the current mode.
    #[must_use]
    pub const fn tap_intent(&self) -> TapIntent {
        match self.mode {
            Mode::Browse => TapIntent::OpenDetail,
            Mode::PlanRoute => TapIntent::AppendStop,
        }
    }

    /// Whether the travel-profile selector is visible.
    #[must_use]
    pub const fn shows_profile_selector(&self) -> bool {
        matches!(self.mode, Mode::PlanRoute)
    }

    /// Whether the stop panel is visible.
    #[must_use]
    pub const fn shows_stop_panel(&self) -> bool {
        matches!(self.mode, Mode::PlanRoute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn starts_in_browse() {
        let modes = ModeController::default();
        assert_eq!(modes.mode(), Mode::Browse);
        assert!(!modes.shows_profile_selector());
        assert!(!modes.shows_stop_panel());
    }

    #[rstest]
    fn entering_plan_route_keeps_stops() {
        let mut modes = ModeController::default();
        assert_eq!(modes.enter(Mode::PlanRoute), Transition::None);
        assert_eq!(modes.tap_intent(), TapIntent::AppendStop);
    }

    #[rstest]
    fn re_entering_plan_route_is_harmless() {
        let mut modes = ModeController::default();
        modes.enter(Mode::PlanRoute);
        assert_eq!(modes.enter(Mode::PlanRoute), Transition::None);
        assert_eq!(modes.mode(), Mode::PlanRoute);
    }

    #[rstest]
    fn toggling_is_unbounded() {
        let mut modes = ModeController::default();
        for _ in 0..5 {
            modes.toggle();
        }
        assert_eq!(modes.mode(), Mode::PlanRoute);
    }

    #[rstest]
    #[case(Mode::Browse, "browse")]
    #[case(Mode::PlanRoute, "plan-route")]
    fn displays_mode(#[case] mode: Mode, #[case] text: &str) {
        assert_eq!(mode.to_string(), text);
    }
}

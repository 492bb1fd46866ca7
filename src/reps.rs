use crate::pose::{Limb, PaletteColor};

/// Highlight applied to the feedback limb when the deep position is entered.
pub const DEEP_BEND_COLOR: PaletteColor = PaletteColor::Yellow;

/// Highlight applied to the feedback limb when a repetition completes.
pub const REP_COLOR: PaletteColor = PaletteColor::BrightGreen;

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleState {
    Neutral,
    DeepBend,
    Extended,
}

impl Default for AngleState {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Bounds of the two decision signals driving [`RepCounter::advance`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RepThresholds {
    /// The deep position is entered when the secondary signal is strictly below this.
    pub deep_bend_below: f32,
    /// The extended position is reached when the primary angle is at or above this.
    pub extended_at_or_above: f32,
}

/// A single limb recolor produced by a state transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HighlightDelta {
    pub limb: Limb,
    pub color: PaletteColor,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub state: AngleState,
    pub rep_completed: bool,
    pub highlight: Option<HighlightDelta>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RepCounter {
    state: AngleState,
    count: u32,
}

impl RepCounter {
    /// Feed one frame's decision signals.
    ///
    /// Deep wins over extended when both hold. Between the bounds a deep position
    /// is held and anything else decays to neutral, so only a full deep to
    /// extended cycle counts.
    pub fn advance(
        &mut self,
        primary: f32,
        secondary: f32,
        thresholds: &RepThresholds,
        feedback_limb: Limb,
    ) -> Transition {
        let previous = self.state;
        let mut rep_completed = false;
        let mut highlight = None;

        self.state = if secondary < thresholds.deep_bend_below {
            if previous != AngleState::DeepBend {
                highlight = Some(HighlightDelta {
                    limb: feedback_limb,
                    color: DEEP_BEND_COLOR,
                });
            }
            AngleState::DeepBend
        } else if primary >= thresholds.extended_at_or_above {
            if previous == AngleState::DeepBend {
                rep_completed = true;
                self.count += 1;
                highlight = Some(HighlightDelta {
                    limb: feedback_limb,
                    color: REP_COLOR,
                });
            }
            AngleState::Extended
        } else if previous == AngleState::DeepBend {
            AngleState::DeepBend
        } else {
            AngleState::Neutral
        };

        Transition {
            state: self.state,
            rep_completed,
            highlight,
        }
    }

    /// Forget the current position without touching the count.
    pub fn clear_state(&mut self) {
        self.state = AngleState::Neutral;
    }

    pub fn state(&self) -> AngleState {
        self.state
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

use crate::debounce::DebounceWindow;

const DEFAULT_SKIP_FRAMES: &str = "10";
const DEFAULT_DEEP_BEND_BELOW: &str = "0";
const DEFAULT_EXTENDED_AT_OR_ABOVE: &str = "150";
const DEFAULT_MIN_KNEE_ANGLE: &str = "50";
const DEFAULT_MIN_TORSO_SHIN_OFFSET: &str = "-15";
const DEFAULT_MAX_TORSO_SHIN_OFFSET: &str = "25";
const DEFAULT_MAX_SHIN_LEAN: &str = "35";

/// Analyzer tuning shared by the library and the command line.
#[derive(Debug, Clone, Copy, PartialEq, structopt::StructOpt)]
pub struct AnalyzerConfig {
    /// Frames ignored after each analyzed frame. Zero disables skipping.
    #[structopt(long, default_value = DEFAULT_SKIP_FRAMES)]
    pub skip_frames: u32,

    /// Ignore this many seconds after each analyzed frame instead, when the frame rate is known.
    #[structopt(long)]
    pub skip_seconds: Option<f32>,

    #[structopt(flatten)]
    pub squat: SquatConfig,
}

impl AnalyzerConfig {
    pub fn debounce_window(&self) -> DebounceWindow {
        DebounceWindow {
            skip_frames: self.skip_frames,
            skip_seconds: self.skip_seconds,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            skip_frames: DEFAULT_SKIP_FRAMES.parse().unwrap(),
            skip_seconds: None,
            squat: SquatConfig::default(),
        }
    }
}

/// Squat thresholds, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, structopt::StructOpt)]
pub struct SquatConfig {
    /// Knee to hip angle against the horizontal below which the squat counts as deep.
    #[structopt(long, default_value = DEFAULT_DEEP_BEND_BELOW, allow_hyphen_values = true)]
    pub deep_bend_below: f32,

    /// Knee angle at or above which the lifter counts as standing.
    #[structopt(long, default_value = DEFAULT_EXTENDED_AT_OR_ABOVE)]
    pub extended_at_or_above: f32,

    /// Smallest acceptable knee angle.
    #[structopt(long, default_value = DEFAULT_MIN_KNEE_ANGLE)]
    pub min_knee_angle: f32,

    /// Smallest acceptable torso lean minus shin lean.
    #[structopt(long, default_value = DEFAULT_MIN_TORSO_SHIN_OFFSET, allow_hyphen_values = true)]
    pub min_torso_shin_offset: f32,

    /// Largest acceptable torso lean minus shin lean.
    #[structopt(long, default_value = DEFAULT_MAX_TORSO_SHIN_OFFSET, allow_hyphen_values = true)]
    pub max_torso_shin_offset: f32,

    /// Largest acceptable shin lean.
    #[structopt(long, default_value = DEFAULT_MAX_SHIN_LEAN)]
    pub max_shin_lean: f32,
}

impl Default for SquatConfig {
    fn default() -> Self {
        Self {
            deep_bend_below: DEFAULT_DEEP_BEND_BELOW.parse().unwrap(),
            extended_at_or_above: DEFAULT_EXTENDED_AT_OR_ABOVE.parse().unwrap(),
            min_knee_angle: DEFAULT_MIN_KNEE_ANGLE.parse().unwrap(),
            min_torso_shin_offset: DEFAULT_MIN_TORSO_SHIN_OFFSET.parse().unwrap(),
            max_torso_shin_offset: DEFAULT_MAX_TORSO_SHIN_OFFSET.parse().unwrap(),
            max_shin_lean: DEFAULT_MAX_SHIN_LEAN.parse().unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structopt::StructOpt;

    #[test]
    fn defaults_match_command_line_defaults() {
        let parsed = AnalyzerConfig::from_iter_safe(&["squat-reps"]).unwrap();
        assert_eq!(parsed, AnalyzerConfig::default());
        assert_eq!(parsed.skip_frames, 10);
        assert_eq!(parsed.squat.min_torso_shin_offset, -15.0);
    }

    #[test]
    fn negative_values_on_the_command_line() {
        let parsed = AnalyzerConfig::from_iter_safe(&[
            "squat-reps",
            "--min-torso-shin-offset",
            "-20",
            "--skip-seconds",
            "0.5",
        ])
        .unwrap();
        assert_eq!(parsed.squat.min_torso_shin_offset, -20.0);
        assert_eq!(parsed.skip_seconds, Some(0.5));
    }

    #[test]
    fn debounce_window() {
        let window = AnalyzerConfig::default().debounce_window();
        assert_eq!(window.skip_frames, 10);
        assert_eq!(window.skip_seconds, None);
    }
}

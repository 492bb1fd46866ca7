use crate::{
    config::AnalyzerConfig,
    debounce::{DebounceWindow, Debouncer},
    error::Error,
    exercise::{Exercise, ExerciseKind, Registry, Squat},
    form::{self, Violation},
    geometry::Point,
    pose::{Keypoints, LimbColors},
    reps::{AngleState, RepCounter},
};
use tracing::{debug, instrument, trace, warn};

/// How a frame was handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Geometry, rep tracking and form checks ran.
    Analyzed,
    /// The debounce window swallowed the frame.
    Skipped,
    /// Required joints were missing or degenerate.
    InsufficientData,
    /// No routine is registered for the selected exercise.
    Unsupported,
}

/// What the analyzer reports for one frame.
///
/// Serializes every field plus `frame_was_skipped`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub status: FrameStatus,
    pub feedback: String,
    pub rep_detected: bool,
    pub rep_count: u32,
    pub angle_state: AngleState,
    pub limb_colors: LimbColors,
    pub primary_angle: Option<f32>,
    pub violations: Vec<Violation>,
}

impl AnalysisResult {
    pub fn frame_was_skipped(&self) -> bool {
        self.status == FrameStatus::Skipped
    }
}

impl serde::Serialize for AnalysisResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AnalysisResult", 9)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("frame_was_skipped", &self.frame_was_skipped())?;
        state.serialize_field("feedback", &self.feedback)?;
        state.serialize_field("rep_detected", &self.rep_detected)?;
        state.serialize_field("rep_count", &self.rep_count)?;
        state.serialize_field("angle_state", &self.angle_state)?;
        state.serialize_field("limb_colors", &self.limb_colors)?;
        state.serialize_field("primary_angle", &self.primary_angle)?;
        state.serialize_field("violations", &self.violations)?;
        state.end()
    }
}

/// Where the analyzer stands between calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No exercise selected since construction or the last reset.
    Idle,
    /// The next call will be swallowed by the debounce window.
    Skipping,
    /// The next call will run the full analysis.
    Analyzing,
}

/// Rep counting and form feedback for one exercise session.
///
/// Every call mutates the session, so concurrent camera streams each need their
/// own analyzer.
#[derive(Debug)]
pub struct Analyzer {
    registry: Registry,
    window: DebounceWindow,
    debouncer: Debouncer,
    current_exercise: Option<ExerciseKind>,
    reps: RepCounter,
    limb_colors: LimbColors,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl Analyzer {
    /// An analyzer with every built-in exercise registered.
    pub fn new(config: &AnalyzerConfig) -> Self {
        let mut registry = Registry::empty();
        registry.register(Box::new(Squat::new(&config.squat)));
        Self::with_registry(registry, config.debounce_window())
    }

    pub fn with_registry(registry: Registry, window: DebounceWindow) -> Self {
        Self {
            registry,
            window,
            debouncer: Debouncer::default(),
            current_exercise: None,
            reps: RepCounter::default(),
            limb_colors: LimbColors::default(),
        }
    }

    /// Analyze one frame.
    ///
    /// `keypoints` is indexed by [`crate::pose::Joint`]. `fps` is the observed
    /// frame rate, used to size a duration based debounce window. Never fails:
    /// problems with the frame are reported through [`AnalysisResult::status`].
    #[instrument(name = "Analyzer::analyze", skip(self, keypoints), level = "trace")]
    pub fn analyze(
        &mut self,
        exercise: ExerciseKind,
        keypoints: &[Option<Point>],
        fps: Option<f32>,
    ) -> AnalysisResult {
        if self.current_exercise != Some(exercise) {
            if let Some(previous) = self.current_exercise {
                debug!(message = "exercise changed", ?previous, current = ?exercise);
                self.reps.clear_state();
            }
            self.current_exercise = Some(exercise);
        }

        if self.debouncer.should_skip() {
            trace!(remaining = self.debouncer.remaining());
            return self.neutral(FrameStatus::Skipped);
        }

        let registry = &self.registry;
        let routine = match registry.get(exercise) {
            Some(routine) => routine,
            None => {
                debug!(message = "no routine registered", ?exercise);
                return self.neutral(FrameStatus::Unsupported);
            }
        };

        match Self::run(
            routine,
            Keypoints::new(keypoints),
            &mut self.reps,
            &mut self.limb_colors,
        ) {
            Ok(result) => {
                let frames = self.window.frames(fps).unwrap_or_else(|error| {
                    warn!(message = "falling back to fixed debounce window", ?error, ?fps);
                    self.window.skip_frames
                });
                self.debouncer.arm(frames);
                result
            }
            Err(error) if error.is_insufficient_data() => {
                debug!(message = "insufficient data", %error);
                self.neutral(FrameStatus::InsufficientData)
            }
            Err(error) => {
                warn!(message = "frame analysis failed", %error);
                self.neutral(FrameStatus::InsufficientData)
            }
        }
    }

    /// Analyze one frame for a raw exercise selector. Unknown selectors are unsupported.
    pub fn analyze_selector(
        &mut self,
        selector: i32,
        keypoints: &[Option<Point>],
        fps: Option<f32>,
    ) -> AnalysisResult {
        match ExerciseKind::from_selector(selector) {
            Some(exercise) => self.analyze(exercise, keypoints, fps),
            None => {
                debug!(message = "unknown exercise selector", selector);
                self.neutral(FrameStatus::Unsupported)
            }
        }
    }

    fn run(
        routine: &dyn Exercise,
        keypoints: Keypoints<'_>,
        reps: &mut RepCounter,
        limb_colors: &mut LimbColors,
    ) -> Result<AnalysisResult, Error> {
        // measure everything before touching any state so a bad frame changes nothing
        let measurements = routine.measure(keypoints)?;
        let (violations, feedback) = form::evaluate(routine.form_checks(), &measurements.angles)?;

        let transition = reps.advance(
            measurements.primary,
            measurements.secondary,
            &routine.rep_thresholds(),
            routine.feedback_limb(),
        );
        if let Some(delta) = transition.highlight {
            limb_colors.set(delta.limb, delta.color)?;
        }
        if transition.rep_completed {
            debug!(message = "rep completed", count = reps.count());
        }

        Ok(AnalysisResult {
            status: FrameStatus::Analyzed,
            feedback,
            rep_detected: transition.rep_completed,
            rep_count: reps.count(),
            angle_state: transition.state,
            limb_colors: *limb_colors,
            primary_angle: Some(measurements.primary),
            violations: violations.iter().collect(),
        })
    }

    fn neutral(&self, status: FrameStatus) -> AnalysisResult {
        AnalysisResult {
            status,
            feedback: String::new(),
            rep_detected: false,
            rep_count: self.reps.count(),
            angle_state: self.reps.state(),
            limb_colors: self.limb_colors,
            primary_angle: None,
            violations: Vec::new(),
        }
    }

    /// Return to the freshly constructed state. Idempotent.
    pub fn reset(&mut self) {
        self.debouncer = Debouncer::default();
        self.current_exercise = None;
        self.reps = RepCounter::default();
        self.limb_colors = LimbColors::default();
    }

    pub fn rep_count(&self) -> u32 {
        self.reps.count()
    }

    pub fn remaining_skip_frames(&self) -> u32 {
        self.debouncer.remaining()
    }

    pub fn is_skipping_frames(&self) -> bool {
        self.debouncer.remaining() > 0
    }

    pub fn current_exercise(&self) -> Option<ExerciseKind> {
        self.current_exercise
    }

    pub fn angle_state(&self) -> AngleState {
        self.reps.state()
    }

    pub fn limb_colors(&self) -> LimbColors {
        self.limb_colors
    }

    pub fn phase(&self) -> Phase {
        if self.current_exercise.is_none() {
            Phase::Idle
        } else if self.is_skipping_frames() {
            Phase::Skipping
        } else {
            Phase::Analyzing
        }
    }
}

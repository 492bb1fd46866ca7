//! Squat repetition counting and form feedback from 2D body keypoints.
//!
//! An [`Analyzer`] is fed one frame of keypoints at a time and reports the running
//! repetition count, a feedback sentence and the limb colors the skeleton renderer
//! should use.

pub mod analyzer;
pub mod config;
pub mod debounce;
pub mod error;
pub mod exercise;
pub mod form;
pub mod geometry;
pub mod pose;
pub mod reps;

pub use analyzer::{AnalysisResult, Analyzer, FrameStatus, Phase};
pub use config::{AnalyzerConfig, SquatConfig};
pub use error::Error;
pub use exercise::ExerciseKind;
pub use geometry::Point;

use crate::pose::Joint;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected at least {expected} keypoints, got {got}")]
    TooFewKeypoints { expected: usize, got: usize },

    #[error("keypoint for joint {0:?} was not detected")]
    MissingJoint(Joint),

    #[error("failed to convert joint variant to usize: {0:?}")]
    JointVariantToUSize(Joint),

    #[error("failed to convert limb variant to usize: {0:?}")]
    LimbVariantToUSize(crate::pose::Limb),

    #[error("failed to convert violation variant to usize: {0:?}")]
    ViolationVariantToUSize(crate::form::Violation),

    #[error("failed to convert angle kind variant to usize: {0:?}")]
    AngleKindVariantToUSize(crate::exercise::AngleKind),

    #[error("cannot compute an angle from a zero-length segment starting at {0:?}")]
    DegenerateSegment(crate::geometry::Point),

    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("keypoint coordinate is not finite: {0}")]
    NonFiniteCoordinate(f32),

    #[error("failed to convert value to u32")]
    ConvertToU32,

    #[error("unknown exercise: {0:?}")]
    ParseExerciseKind(String),
}

impl Error {
    /// Whether this error means the frame did not carry enough usable keypoints.
    pub(crate) fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Self::TooFewKeypoints { .. } | Self::MissingJoint(_) | Self::DegenerateSegment(_)
        )
    }
}

use crate::{
    config::SquatConfig,
    error::Error,
    exercise::{AngleKind, Exercise, ExerciseKind, JointAngles, Measurements},
    form::{Bound, FormCheck, Violation},
    geometry::{angle_at_vertex, angle_with_horizontal, angle_with_vertical},
    pose::{Joint, Keypoints, Limb},
    reps::RepThresholds,
};

/// Side-view squat, measured on the left leg.
#[derive(Debug, Clone)]
pub struct Squat {
    thresholds: RepThresholds,
    checks: [FormCheck; 3],
}

impl Squat {
    pub fn new(config: &SquatConfig) -> Self {
        Self {
            thresholds: RepThresholds {
                deep_bend_below: config.deep_bend_below,
                extended_at_or_above: config.extended_at_or_above,
            },
            checks: [
                FormCheck {
                    angle: AngleKind::KneeFlexion,
                    too_low: Some(Bound {
                        limit: config.min_knee_angle,
                        violation: Violation::KneeTooFlexed,
                    }),
                    too_high: None,
                },
                FormCheck {
                    angle: AngleKind::TorsoShinOffset,
                    too_low: Some(Bound {
                        limit: config.min_torso_shin_offset,
                        violation: Violation::BackTooUpright,
                    }),
                    too_high: Some(Bound {
                        limit: config.max_torso_shin_offset,
                        violation: Violation::BackTooBent,
                    }),
                },
                FormCheck {
                    angle: AngleKind::ShinLean,
                    too_low: None,
                    too_high: Some(Bound {
                        limit: config.max_shin_lean,
                        violation: Violation::KneesTooFarForward,
                    }),
                },
            ],
        }
    }
}

impl Exercise for Squat {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn measure(&self, keypoints: Keypoints<'_>) -> Result<Measurements, Error> {
        let hip = keypoints.get(Joint::LeftHip)?;
        let knee = keypoints.get(Joint::LeftKnee)?;
        let ankle = keypoints.get(Joint::LeftAnkle)?;
        let shoulder = keypoints.get(Joint::LeftShoulder)?;

        let knee_flexion = angle_at_vertex(hip, knee, ankle)?;
        let hip_depth = angle_with_horizontal(knee, hip)?;
        let torso_lean = angle_with_vertical(hip, shoulder)?;
        let shin_lean = angle_with_vertical(ankle, knee)?;

        let mut angles = JointAngles::default();
        angles.set(AngleKind::KneeFlexion, knee_flexion)?;
        angles.set(AngleKind::HipDepth, hip_depth)?;
        angles.set(AngleKind::TorsoLean, torso_lean)?;
        angles.set(AngleKind::ShinLean, shin_lean)?;
        angles.set(AngleKind::TorsoShinOffset, torso_lean - shin_lean)?;

        Ok(Measurements {
            primary: knee_flexion,
            secondary: hip_depth,
            angles,
        })
    }

    fn rep_thresholds(&self) -> RepThresholds {
        self.thresholds
    }

    fn form_checks(&self) -> &[FormCheck] {
        &self.checks
    }

    fn feedback_limb(&self) -> Limb {
        Limb::LeftThigh
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Side-view frames of the left leg in image coordinates.

    use crate::{
        geometry::Point,
        pose::{Joint, NUM_JOINTS},
    };

    fn frame(
        shoulder: (f32, f32),
        hip: (f32, f32),
        knee: (f32, f32),
        ankle: (f32, f32),
    ) -> Vec<Option<Point>> {
        let mut points = vec![None; NUM_JOINTS];
        for &(joint, (x, y)) in [
            (Joint::LeftShoulder, shoulder),
            (Joint::LeftHip, hip),
            (Joint::LeftKnee, knee),
            (Joint::LeftAnkle, ankle),
        ]
        .iter()
        {
            points[joint.idx().unwrap()] = Some(Point::new(x, y).unwrap());
        }
        points
    }

    /// Upright, knee at 180 degrees.
    pub(crate) fn standing() -> Vec<Option<Point>> {
        frame((100.0, 100.0), (100.0, 200.0), (100.0, 300.0), (100.0, 400.0))
    }

    /// Knee around 117 degrees with the hip still above the knee.
    pub(crate) fn halfway() -> Vec<Option<Point>> {
        frame((90.0, 150.0), (70.0, 250.0), (130.0, 310.0), (100.0, 400.0))
    }

    /// Hip below the knee, knee around 52 degrees, torso parallel to the shin.
    pub(crate) fn deep() -> Vec<Option<Point>> {
        frame((118.0, 248.0), (60.0, 330.0), (150.0, 320.0), (100.0, 400.0))
    }

    /// Hip level with the knee.
    pub(crate) fn parallel() -> Vec<Option<Point>> {
        frame((118.0, 238.0), (60.0, 320.0), (150.0, 320.0), (100.0, 400.0))
    }

    /// Knee around 42 degrees with a vertical torso.
    pub(crate) fn deep_and_upright() -> Vec<Option<Point>> {
        frame((80.0, 240.0), (80.0, 340.0), (150.0, 320.0), (100.0, 400.0))
    }

    /// Knee around 33 degrees, torso folded, knees past the toes.
    pub(crate) fn collapsed() -> Vec<Option<Point>> {
        frame((198.0, 328.0), (100.0, 345.0), (170.0, 330.0), (100.0, 400.0))
    }

    pub(crate) fn without(mut points: Vec<Option<Point>>, joint: Joint) -> Vec<Option<Point>> {
        points[joint.idx().unwrap()] = None;
        points
    }
}

use crate::{
    error::Error,
    form::FormCheck,
    pose::{Keypoints, Limb},
    reps::RepThresholds,
};
use num_traits::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

pub(crate) mod squat;

pub use squat::Squat;

/// Exercise selector. The discriminants are the selector integers callers pass.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    num_derive::FromPrimitive,
    num_derive::ToPrimitive,
    serde::Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    Squat = 0,
    PullUp = 1,
    PushUp = 2,
    Deadlift = 3,
    BicepCurl = 4,
}

impl ExerciseKind {
    /// Map a raw selector to an exercise, `None` when the selector is unknown.
    pub fn from_selector(selector: i32) -> Option<Self> {
        Self::from_i32(selector)
    }

    pub fn selector(self) -> Option<i32> {
        self.to_i32()
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "squat" => Ok(Self::Squat),
            "pull-up" => Ok(Self::PullUp),
            "push-up" => Ok(Self::PushUp),
            "deadlift" => Ok(Self::Deadlift),
            "bicep-curl" => Ok(Self::BicepCurl),
            other => other
                .parse::<i32>()
                .ok()
                .and_then(Self::from_selector)
                .ok_or_else(|| Error::ParseExerciseKind(s.to_owned())),
        }
    }
}

/// Named angles an exercise may measure on a frame.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub enum AngleKind {
    /// Hip-knee-ankle angle at the knee.
    KneeFlexion,
    /// Signed angle of knee -> hip against the horizontal, negative below the knee.
    HipDepth,
    /// Hip -> shoulder against the vertical.
    TorsoLean,
    /// Ankle -> knee against the vertical.
    ShinLean,
    /// Torso lean minus shin lean.
    TorsoShinOffset,
}

impl AngleKind {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::AngleKindVariantToUSize(self))
    }
}

pub const NUM_ANGLE_KINDS: usize = 5;

/// Angles measured on one frame, in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct JointAngles([Option<f32>; NUM_ANGLE_KINDS]);

impl JointAngles {
    pub fn get(&self, kind: AngleKind) -> Result<Option<f32>, Error> {
        Ok(self.0[kind.idx()?])
    }

    pub fn set(&mut self, kind: AngleKind, degrees: f32) -> Result<(), Error> {
        self.0[kind.idx()?] = Some(degrees);
        Ok(())
    }
}

/// Everything an exercise extracts from a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurements {
    /// Flexion angle compared against [`RepThresholds::extended_at_or_above`].
    pub primary: f32,
    /// Position signal compared against [`RepThresholds::deep_bend_below`].
    pub secondary: f32,
    /// Angles fed to the form checks.
    pub angles: JointAngles,
}

/// Geometry, rep thresholds and form checks of one exercise.
pub trait Exercise {
    fn kind(&self) -> ExerciseKind;

    /// Extract the decision signals and form angles from a frame.
    ///
    /// Fails when a required joint is missing or a segment is degenerate.
    fn measure(&self, keypoints: Keypoints<'_>) -> Result<Measurements, Error>;

    fn rep_thresholds(&self) -> RepThresholds;

    /// Checks in the order their violations should be reported.
    fn form_checks(&self) -> &[FormCheck];

    /// The limb recolored on state transitions.
    fn feedback_limb(&self) -> Limb;
}

/// Exercises available to an analyzer, keyed by selector.
pub struct Registry {
    exercises: Vec<Box<dyn Exercise + Send + Sync>>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            exercises: Vec::new(),
        }
    }

    /// Add an exercise, replacing any previous one of the same kind.
    pub fn register(&mut self, exercise: Box<dyn Exercise + Send + Sync>) {
        let kind = exercise.kind();
        self.exercises.retain(|existing| existing.kind() != kind);
        self.exercises.push(exercise);
    }

    pub fn get(&self, kind: ExerciseKind) -> Option<&(dyn Exercise + Send + Sync)> {
        self.exercises
            .iter()
            .find(|exercise| exercise.kind() == kind)
            .map(|exercise| exercise.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ExerciseKind> + '_ {
        self.exercises.iter().map(|exercise| exercise.kind())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod exercise_kind_tests {
        use super::*;

        #[test]
        fn selectors() {
            assert_eq!(ExerciseKind::from_selector(0), Some(ExerciseKind::Squat));
            assert_eq!(ExerciseKind::from_selector(4), Some(ExerciseKind::BicepCurl));
            assert_eq!(ExerciseKind::from_selector(5), None);
            assert_eq!(ExerciseKind::from_selector(-1), None);
            assert_eq!(ExerciseKind::PushUp.selector(), Some(2));
        }

        #[test]
        fn parse() {
            assert_eq!("squat".parse::<ExerciseKind>().unwrap(), ExerciseKind::Squat);
            assert_eq!("Pull_Up".parse::<ExerciseKind>().unwrap(), ExerciseKind::PullUp);
            assert_eq!("3".parse::<ExerciseKind>().unwrap(), ExerciseKind::Deadlift);
            assert!(matches!(
                "lunge".parse::<ExerciseKind>(),
                Err(Error::ParseExerciseKind(_))
            ));
            assert!("9".parse::<ExerciseKind>().is_err());
        }
    }

    mod joint_angles_tests {
        use super::*;

        #[test]
        fn unset_is_none() {
            let mut angles = JointAngles::default();
            assert_eq!(angles.get(AngleKind::ShinLean).unwrap(), None);
            angles.set(AngleKind::ShinLean, 12.5).unwrap();
            assert_eq!(angles.get(AngleKind::ShinLean).unwrap(), Some(12.5));
            assert_eq!(angles.get(AngleKind::TorsoLean).unwrap(), None);
        }

        #[test]
        fn every_kind_fits() {
            for index in 0..NUM_ANGLE_KINDS {
                assert_eq!(AngleKind::from_usize(index).unwrap().idx().unwrap(), index);
            }
            assert!(AngleKind::from_usize(NUM_ANGLE_KINDS).is_none());
        }
    }

    mod registry_tests {
        use super::*;
        use crate::config::SquatConfig;

        #[test]
        fn lookup() {
            let mut registry = Registry::empty();
            assert!(registry.get(ExerciseKind::Squat).is_none());
            registry.register(Box::new(Squat::new(&SquatConfig::default())));
            assert_eq!(
                registry.get(ExerciseKind::Squat).map(|e| e.kind()),
                Some(ExerciseKind::Squat)
            );
            assert!(registry.get(ExerciseKind::PushUp).is_none());
        }

        #[test]
        fn register_replaces_same_kind() {
            let mut registry = Registry::empty();
            registry.register(Box::new(Squat::new(&SquatConfig::default())));
            let stricter = SquatConfig {
                extended_at_or_above: 165.0,
                ..SquatConfig::default()
            };
            registry.register(Box::new(Squat::new(&stricter)));
            assert_eq!(registry.kinds().count(), 1);
            assert_eq!(
                registry
                    .get(ExerciseKind::Squat)
                    .unwrap()
                    .rep_thresholds()
                    .extended_at_or_above,
                165.0
            );
        }
    }
}

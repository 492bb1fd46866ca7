use crate::{
    error::Error,
    exercise::{AngleKind, JointAngles},
};
use bitvec::{bitvec, prelude::BitVec};
use num_traits::{FromPrimitive, ToPrimitive};
use tracing::trace;

pub const AFFIRMATION: &str = "Great form, keep it up!";
const PAIR_CONNECTOR: &str = ", and also ";
const MANY_PREAMBLE: &str = "Fix your form: ";

/// Ways a measured angle can leave its acceptable range.
///
/// Declaration order is the order in which feedback mentions violations.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    KneeTooFlexed,
    BackTooUpright,
    BackTooBent,
    KneesTooFarForward,
}

pub const NUM_VIOLATIONS: usize = 4;

impl Violation {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::ViolationVariantToUSize(self))
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Self::KneeTooFlexed => "Don't squat so deep!",
            Self::BackTooUpright => "Lean your chest slightly forward!",
            Self::BackTooBent => "Keep your chest up!",
            Self::KneesTooFarForward => "Keep your knees behind your toes!",
        }
    }
}

/// Distinct violations, iterated in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationSet {
    bits: BitVec,
}

impl Default for ViolationSet {
    fn default() -> Self {
        Self {
            bits: bitvec![0; NUM_VIOLATIONS],
        }
    }
}

impl ViolationSet {
    pub fn insert(&mut self, violation: Violation) -> Result<(), Error> {
        self.bits.set(violation.idx()?, true);
        Ok(())
    }

    pub fn contains(&self, violation: Violation) -> Result<bool, Error> {
        Ok(self.bits[violation.idx()?])
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Violation> + '_ {
        (0..self.bits.len())
            .filter(move |&index| self.bits[index])
            .filter_map(Violation::from_usize)
    }
}

/// One side of an acceptable range and what crossing it means.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bound {
    pub limit: f32,
    pub violation: Violation,
}

/// A closed acceptable range for one measured angle. A missing side is unbounded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FormCheck {
    pub angle: AngleKind,
    pub too_low: Option<Bound>,
    pub too_high: Option<Bound>,
}

impl FormCheck {
    fn violation(&self, value: f32) -> Option<Violation> {
        match (self.too_low, self.too_high) {
            (Some(Bound { limit, violation }), _) if value < limit => Some(violation),
            (_, Some(Bound { limit, violation })) if value > limit => Some(violation),
            _ => None,
        }
    }
}

/// Run every check against the measured angles and phrase the outcome.
pub fn evaluate(
    checks: &[FormCheck],
    angles: &JointAngles,
) -> Result<(ViolationSet, String), Error> {
    let mut violations = ViolationSet::default();
    for check in checks {
        match angles.get(check.angle)? {
            Some(value) => {
                if let Some(violation) = check.violation(value) {
                    trace!(?violation, angle = ?check.angle, value);
                    violations.insert(violation)?;
                }
            }
            None => trace!(message = "angle not measured", angle = ?check.angle),
        }
    }
    let feedback = synthesize_feedback(&violations);
    Ok((violations, feedback))
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn without_bang(phrase: &str) -> &str {
    phrase.strip_suffix('!').unwrap_or(phrase)
}

/// Turn a set of violations into a single sentence.
pub fn synthesize_feedback(violations: &ViolationSet) -> String {
    let phrases = violations.iter().map(Violation::phrase).collect::<Vec<_>>();
    match phrases.as_slice() {
        [] => AFFIRMATION.to_owned(),
        [only] => (*only).to_owned(),
        [first, second] => format!(
            "{}{}{}",
            without_bang(first),
            PAIR_CONNECTOR,
            lowercase_first(second)
        ),
        many => {
            let joined = many
                .iter()
                .map(|phrase| without_bang(phrase))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}{}!", MANY_PREAMBLE, lowercase_first(&joined))
        }
    }
}

use crate::{error::Error, geometry::Point};
use num_traits::ToPrimitive;

/// Body joints in the order the upstream keypoint detector emits them.
///
/// The discriminants are the keypoint indices and must not change.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub enum Joint {
    RightAnkle = 0,
    RightKnee = 1,
    RightHip = 2,
    LeftHip = 3,
    LeftKnee = 4,
    LeftAnkle = 5,
    RightWrist = 6,
    RightElbow = 7,
    RightShoulder = 8,
    LeftShoulder = 9,
    LeftElbow = 10,
    LeftWrist = 11,
    Neck = 12,
    HeadTop = 13,
}

impl Joint {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::JointVariantToUSize(self))
    }

    /// Palette index the renderer uses for this joint's marker.
    pub fn default_color(self) -> Result<PaletteColor, Error> {
        Ok(constants::DEFAULT_JOINT_COLORS[self.idx()?])
    }
}

pub const NUM_JOINTS: usize = 14;

/// Skeleton segments, in the order the renderer draws them.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub enum Limb {
    RightShin = 0,
    RightThigh = 1,
    Pelvis = 2,
    LeftThigh = 3,
    LeftShin = 4,
    LeftFlank = 5,
    RightFlank = 6,
    LeftUpperArm = 7,
    LeftForearm = 8,
    RightUpperArm = 9,
    RightForearm = 10,
    RightClavicle = 11,
    LeftClavicle = 12,
    Head = 13,
}

impl Limb {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::LimbVariantToUSize(self))
    }

    /// The two joints this limb connects.
    pub fn joints(self) -> (Joint, Joint) {
        use Joint::*;
        match self {
            Self::RightShin => (RightAnkle, RightKnee),
            Self::RightThigh => (RightKnee, RightHip),
            Self::Pelvis => (RightHip, LeftHip),
            Self::LeftThigh => (LeftHip, LeftKnee),
            Self::LeftShin => (LeftKnee, LeftAnkle),
            Self::LeftFlank => (LeftHip, LeftShoulder),
            Self::RightFlank => (RightHip, RightShoulder),
            Self::LeftUpperArm => (LeftShoulder, LeftElbow),
            Self::LeftForearm => (LeftElbow, LeftWrist),
            Self::RightUpperArm => (RightShoulder, RightElbow),
            Self::RightForearm => (RightElbow, RightWrist),
            Self::RightClavicle => (RightShoulder, Neck),
            Self::LeftClavicle => (LeftShoulder, Neck),
            Self::Head => (Neck, HeadTop),
        }
    }
}

pub const NUM_LIMBS: usize = 14;

/// Indices into the renderer's pose palette. The renderer owns the RGB values.
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
#[serde(into = "u8")]
pub enum PaletteColor {
    Orange = 0,
    LightOrange = 1,
    Peach = 2,
    Yellow = 3,
    Pink = 4,
    SkyBlue = 5,
    Magenta = 6,
    Purple = 7,
    LightBlue = 8,
    BlueLight = 9,
    LightRed = 10,
    RedOrange = 11,
    RedDeep = 12,
    LightGreen = 13,
    Mint = 14,
    BrightGreen = 15,
    Green = 16,
    Blue = 17,
    Red = 18,
    White = 19,
}

impl From<PaletteColor> for u8 {
    fn from(color: PaletteColor) -> Self {
        color as u8
    }
}

/// Limb color index per limb, as handed to the skeleton renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct LimbColors([PaletteColor; NUM_LIMBS]);

impl LimbColors {
    pub fn get(&self, limb: Limb) -> Result<PaletteColor, Error> {
        Ok(self.0[limb.idx()?])
    }

    pub(crate) fn set(&mut self, limb: Limb, color: PaletteColor) -> Result<(), Error> {
        self.0[limb.idx()?] = color;
        Ok(())
    }

    pub fn as_slice(&self) -> &[PaletteColor] {
        &self.0
    }
}

impl Default for LimbColors {
    fn default() -> Self {
        constants::DEFAULT_LIMB_COLORS
    }
}

/// Read-only view over one frame's keypoints, indexed by [`Joint`].
#[derive(Debug, Copy, Clone)]
pub struct Keypoints<'a>(&'a [Option<Point>]);

impl<'a> Keypoints<'a> {
    pub fn new(points: &'a [Option<Point>]) -> Self {
        Self(points)
    }

    pub fn get(&self, joint: Joint) -> Result<Point, Error> {
        let index = joint.idx()?;
        self.0
            .get(index)
            .copied()
            .ok_or(Error::TooFewKeypoints {
                expected: index + 1,
                got: self.0.len(),
            })?
            .ok_or(Error::MissingJoint(joint))
    }
}

pub mod constants {
    use super::{LimbColors, PaletteColor, PaletteColor::*, NUM_JOINTS};

    pub const DEFAULT_JOINT_COLORS: [PaletteColor; NUM_JOINTS] = [
        // hips down
        BlueLight, BlueLight, BlueLight, BlueLight, BlueLight, BlueLight,
        // arms and shoulders
        Orange, Orange, Orange, Orange, Orange, Orange,
        // neck and head
        Green, Green,
    ];

    pub const DEFAULT_LIMB_COLORS: LimbColors = LimbColors([
        // shoulders down
        BlueLight, BlueLight, BlueLight, BlueLight, BlueLight, BlueLight, BlueLight,
        // arms
        Orange, Orange, Orange, Orange,
        // clavicles and neck
        Green, Green, Green,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn joint_indices_match_detector_layout() {
        assert_eq!(Joint::LeftHip.idx().unwrap(), 3);
        assert_eq!(Joint::LeftKnee.idx().unwrap(), 4);
        assert_eq!(Joint::LeftAnkle.idx().unwrap(), 5);
        assert_eq!(Joint::LeftShoulder.idx().unwrap(), 9);
        assert_eq!(Joint::HeadTop.idx().unwrap(), NUM_JOINTS - 1);
        assert!(Joint::from_usize(NUM_JOINTS).is_none());
    }

    #[test]
    fn limb_indices_are_contiguous() {
        for index in 0..NUM_LIMBS {
            let limb = Limb::from_usize(index).unwrap();
            assert_eq!(limb.idx().unwrap(), index);
        }
        assert!(Limb::from_usize(NUM_LIMBS).is_none());
        assert_eq!(Limb::LeftThigh.joints(), (Joint::LeftHip, Joint::LeftKnee));
    }

    #[test]
    fn default_limb_colors() {
        let colors = LimbColors::default();
        assert_eq!(colors.get(Limb::LeftThigh).unwrap(), PaletteColor::BlueLight);
        assert_eq!(colors.get(Limb::RightForearm).unwrap(), PaletteColor::Orange);
        assert_eq!(colors.get(Limb::Head).unwrap(), PaletteColor::Green);
    }

    #[test]
    fn default_joint_colors() {
        assert_eq!(Joint::RightAnkle.default_color().unwrap(), PaletteColor::BlueLight);
        assert_eq!(Joint::LeftAnkle.default_color().unwrap(), PaletteColor::BlueLight);
        assert_eq!(Joint::RightWrist.default_color().unwrap(), PaletteColor::Orange);
        assert_eq!(Joint::LeftShoulder.default_color().unwrap(), PaletteColor::Orange);
        assert_eq!(Joint::Neck.default_color().unwrap(), PaletteColor::Green);
        assert_eq!(Joint::HeadTop.default_color().unwrap(), PaletteColor::Green);
    }

    #[test]
    fn set_touches_a_single_limb() {
        let mut colors = LimbColors::default();
        colors.set(Limb::LeftThigh, PaletteColor::Yellow).unwrap();
        for (index, &color) in colors.as_slice().iter().enumerate() {
            let expected = if index == Limb::LeftThigh.idx().unwrap() {
                PaletteColor::Yellow
            } else {
                LimbColors::default().as_slice()[index]
            };
            assert_eq!(color, expected);
        }
    }

    #[test]
    fn palette_serializes_as_index() {
        let json = serde_json::to_string(&LimbColors::default()).unwrap();
        assert_eq!(json, "[9,9,9,9,9,9,9,0,0,0,0,16,16,16]");
    }

    mod keypoints_tests {
        use super::*;

        #[test]
        fn missing_joint() {
            let points = vec![None; NUM_JOINTS];
            assert!(matches!(
                Keypoints::new(&points).get(Joint::LeftAnkle),
                Err(Error::MissingJoint(Joint::LeftAnkle))
            ));
        }

        #[test]
        fn too_short() {
            let points = vec![Some(Point::default()); 4];
            assert!(matches!(
                Keypoints::new(&points).get(Joint::LeftAnkle),
                Err(Error::TooFewKeypoints {
                    expected: 6,
                    got: 4
                })
            ));
            assert!(Keypoints::new(&points).get(Joint::LeftHip).is_ok());
        }
    }
}

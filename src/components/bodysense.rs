//! Environmental sense flags carried by a [`Body`](super::body::Body).
//!
//! All flags here are level-triggered: the world system clears them at the
//! start of every step and contact rules re-assert them from that step's
//! begin and continue contacts. End contacts never touch them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodySense {
    FeetOnGround,
    FeetOnIce,
    SideTouchingBlockLeft,
    SideTouchingBlockRight,
    SideTouchingIceLeft,
    SideTouchingIceRight,
    HeadTouchingBlock,
    InWater,
    HeadTouchingLadder,
    FeetTouchingLadder,
    ForceApplied,
    BodyTouchingBlock,
}

impl BodySense {
    pub const ALL: [BodySense; 12] = [
        BodySense::FeetOnGround,
        BodySense::FeetOnIce,
        BodySense::SideTouchingBlockLeft,
        BodySense::SideTouchingBlockRight,
        BodySense::SideTouchingIceLeft,
        BodySense::SideTouchingIceRight,
        BodySense::HeadTouchingBlock,
        BodySense::InWater,
        BodySense::HeadTouchingLadder,
        BodySense::FeetTouchingLadder,
        BodySense::ForceApplied,
        BodySense::BodyTouchingBlock,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Bit set of [`BodySense`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenseFlags(u16);

impl SenseFlags {
    pub fn set(&mut self, sense: BodySense, on: bool) {
        if on {
            self.0 |= sense.bit();
        } else {
            self.0 &= !sense.bit();
        }
    }

    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.0 & sense.bit() != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = BodySense> + '_ {
        BodySense::ALL
            .into_iter()
            .filter(|sense| self.is_sensing(*sense))
    }
}

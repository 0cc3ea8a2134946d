//! Platform-agnostic input and display events.
//!
//! The host maps its native touch and display callbacks to these types. The
//! strip never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A touch event delivered to the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    /// Finger down at absolute position.
    Down { x: i32, y: i32 },
    /// Finger moved.
    Move { x: i32, y: i32 },
    /// Finger lifted.
    Up { x: i32, y: i32 },
    /// A touch landed outside the strip window.
    Outside,
    /// The gesture was aborted by the system.
    Cancel,
}

/// Where inside the strip a touch landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTarget {
    /// The button row (keys and the empty space between them).
    ButtonRow,
    /// Anywhere else on the strip window.
    Strip,
}

/// Display rotation, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// All rotations in quarter-turn order.
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Decode a platform rotation index (`0..=3`). Out-of-range values wrap.
    pub fn from_index(index: u32) -> Self {
        match index % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    /// Degrees clockwise.
    pub fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

/// Text/layout direction of the current locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl LayoutDirection {
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

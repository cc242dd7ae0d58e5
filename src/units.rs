use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;

/// A length in millimetres. All page geometry and every placement the engine
/// computes is expressed in millimetres.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}mm")]
#[serde(transparent)]
pub struct Mm(pub f32);

/// A length in typographic points (1/72 of an inch). Only font sizes are given
/// in points; convert to [Mm] before mixing with page geometry.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
#[serde(transparent)]
pub struct Pt(pub f32);

impl Mm {
    pub const ZERO: Mm = Mm(0.0);

    pub fn max(self, other: Mm) -> Mm {
        Mm(self.0.max(other.0))
    }

    pub fn min(self, other: Mm) -> Mm {
        Mm(self.0.min(other.0))
    }

    pub fn abs(self) -> Mm {
        Mm(self.0.abs())
    }

    /// Whether two lengths are equal to within `epsilon` millimetres
    pub fn approx_eq(self, other: Mm, epsilon: f32) -> bool {
        (self.0 - other.0).abs() <= epsilon
    }

    /// Convert to PDF user space units
    pub fn to_pt(self) -> Pt {
        Pt(self.0 * PT_PER_INCH / MM_PER_INCH)
    }
}

impl Pt {
    pub fn to_mm(self) -> Mm {
        Mm(self.0 * MM_PER_INCH / PT_PER_INCH)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        pt.to_mm()
    }
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        mm.to_pt()
    }
}

impl Mul<f32> for Mm {
    type Output = Mm;

    fn mul(self, rhs: f32) -> Mm {
        Mm(self.0 * rhs)
    }
}

impl Div<f32> for Mm {
    type Output = Mm;

    fn div(self, rhs: f32) -> Mm {
        Mm(self.0 / rhs)
    }
}

impl Div<Mm> for Mm {
    type Output = f32;

    fn div(self, rhs: Mm) -> f32 {
        self.0 / rhs.0
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

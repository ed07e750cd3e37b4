//! Real-world lengths (metres) and page-physical lengths (PDF points).
//!
//! The only way from one to the other is a [`UnitConverter`], built once per
//! document from the scale ratio and shared by reference afterwards.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// PDF user space unit: 1/72 inch.
pub const POINTS_PER_INCH: f64 = 72.0;
pub const CM_PER_INCH: f64 = 2.54;
pub const CM_PER_METRE: f64 = 100.0;
pub const POINTS_PER_CM: f64 = POINTS_PER_INCH / CM_PER_INCH;
pub const POINTS_PER_MM: f64 = POINTS_PER_CM / 10.0;

macro_rules! length_ops {
    ($t:ident) => {
        impl Add for $t {
            type Output = $t;
            fn add(self, rhs: $t) -> $t {
                $t(self.0 + rhs.0)
            }
        }
        impl Sub for $t {
            type Output = $t;
            fn sub(self, rhs: $t) -> $t {
                $t(self.0 - rhs.0)
            }
        }
        impl Mul<f64> for $t {
            type Output = $t;
            fn mul(self, rhs: f64) -> $t {
                $t(self.0 * rhs)
            }
        }
        impl Div<f64> for $t {
            type Output = $t;
            fn div(self, rhs: f64) -> $t {
                $t(self.0 / rhs)
            }
        }
        impl Neg for $t {
            type Output = $t;
            fn neg(self) -> $t {
                $t(-self.0)
            }
        }
        impl $t {
            pub const ZERO: $t = $t(0.0);

            #[inline]
            pub fn raw(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

/// Length in the real world, in metres.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

length_ops!(Metres);

impl fmt::Display for Metres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

/// Length on the page, in points.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(pub f64);

length_ops!(Points);

impl Points {
    pub fn from_mm(mm: f64) -> Points {
        Points(mm * POINTS_PER_MM)
    }

    pub fn to_mm(self) -> f64 {
        self.0 / POINTS_PER_MM
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pt", self.0)
    }
}

/// Drawing scale `1 : denominator`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRatio(f64);

impl ScaleRatio {
    pub const ARCHITECTURAL: ScaleRatio = ScaleRatio(100.0);

    /// Rejects zero, negative and non-finite denominators.
    pub fn new(denominator: f64) -> Option<ScaleRatio> {
        (denominator.is_finite() && denominator > 0.0).then_some(ScaleRatio(denominator))
    }

    pub fn denominator(self) -> f64 {
        self.0
    }
}

impl Default for ScaleRatio {
    fn default() -> Self {
        ScaleRatio::ARCHITECTURAL
    }
}

impl fmt::Display for ScaleRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", fmt_number(self.0))
    }
}

/// Formats integers without a fractional part and trims trailing zeros otherwise.
pub fn fmt_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.3}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Maps metres to points at a fixed scale and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConverter {
    scale: ScaleRatio,
    points_per_metre: f64,
}

impl UnitConverter {
    pub fn new(scale: ScaleRatio) -> Self {
        // 1:100 puts one real metre on one paper centimetre.
        let paper_cm_per_metre = CM_PER_METRE / scale.denominator();
        Self {
            scale,
            points_per_metre: paper_cm_per_metre * POINTS_PER_CM,
        }
    }

    pub fn scale(&self) -> ScaleRatio {
        self.scale
    }

    pub fn points_per_metre(&self) -> f64 {
        self.points_per_metre
    }

    #[inline]
    pub fn to_page(&self, length: Metres) -> Points {
        Points(length.0 * self.points_per_metre)
    }

    #[inline]
    pub fn to_real(&self, length: Points) -> Metres {
        Metres(length.0 / self.points_per_metre)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        UnitConverter::new(ScaleRatio::default())
    }
}

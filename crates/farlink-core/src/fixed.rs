use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only for initialization and config.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and logging.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// A position or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vec3 {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
        z: Fixed64::ZERO,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: f64_to_fixed64(x),
            y: f64_to_fixed64(y),
            z: f64_to_fixed64(z),
        }
    }

    /// Component-wise scale. Saturates instead of overflowing.
    pub fn scale(self, factor: Fixed64) -> Self {
        Self {
            x: self.x.saturating_mul(factor),
            y: self.y.saturating_mul(factor),
            z: self.z.saturating_mul(factor),
        }
    }

    /// Component-wise sum. Saturates instead of overflowing.
    pub fn offset(self, other: Vec3) -> Self {
        Self {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
            z: self.z.saturating_add(other.z),
        }
    }
}

/// A bounded ray cast from a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit-length forward direction.
    pub direction: Vec3,
    pub max_distance: Fixed64,
}

impl Ray {
    /// The far end of the ray segment.
    pub fn end(&self) -> Vec3 {
        self.origin.offset(self.direction.scale(self.max_distance))
    }
}

use crate::error::{VitrineError, VitrineResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> VitrineResult<Self> {
        if den == 0 {
            return Err(VitrineError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(VitrineError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Frame count for a duration that must take at least one frame.
    pub fn secs_to_frames_min1(self, secs: f64) -> u64 {
        self.secs_to_frames_floor(secs).max(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Straight-alpha RGBA8 (not premultiplied).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Recover straight color from premultiplied channels; fully transparent
    /// pixels come back as `TRANSPARENT`.
    pub fn from_premul(r: u8, g: u8, b: u8, a: u8) -> Self {
        if a == 0 {
            return Self::TRANSPARENT;
        }
        let un = |c: u8| -> u8 {
            let c = u32::from(c);
            let a = u32::from(a);
            ((c * 255 + a / 2) / a).min(255) as u8
        };
        Self {
            r: un(r),
            g: un(g),
            b: un(b),
            a,
        }
    }
}

/// FNV-1a 64, seeded. Used to derive per-component rng streams from the
/// stage seed so components stay decorrelated but reproducible.
pub fn stable_hash64(seed: u64, s: &str) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325u64 ^ seed;
    for &b in s.as_bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_frames_secs_roundtrip_floor() {
        let fps = Fps::new(30000, 1001).unwrap();
        let secs = fps.frames_to_secs(123);
        assert_eq!(fps.secs_to_frames_floor(secs), 123);
    }

    #[test]
    fn fps_min1_never_returns_zero() {
        let fps = Fps::new(60, 1).unwrap();
        assert_eq!(fps.secs_to_frames_min1(0.0), 1);
        assert_eq!(fps.secs_to_frames_min1(0.4), 24);
    }

    #[test]
    fn viewport_emptiness() {
        assert!(Viewport::new(0, 600).is_empty());
        assert!(Viewport::new(800, 0).is_empty());
        assert!(!Viewport::new(800, 600).is_empty());
    }

    #[test]
    fn unpremultiply_inverts_opaque_and_half_alpha() {
        let c = Rgba8::from_premul(128, 64, 32, 255);
        assert_eq!(c, Rgba8::new(128, 64, 32, 255));

        // 50% alpha premul of (200, 100, 40).
        let c = Rgba8::from_premul(100, 50, 20, 128);
        assert!((i16::from(c.r) - 200).abs() <= 1);
        assert!((i16::from(c.g) - 100).abs() <= 1);
        assert!((i16::from(c.b) - 40).abs() <= 1);
    }

    #[test]
    fn stable_hash_differs_by_seed_and_name() {
        assert_ne!(stable_hash64(1, "ambient"), stable_hash64(2, "ambient"));
        assert_ne!(stable_hash64(1, "ambient"), stable_hash64(1, "dissolve"));
        assert_eq!(stable_hash64(7, "cursor"), stable_hash64(7, "cursor"));
    }
}

use std::f64::consts::TAU;

use rand::{Rng, rngs::StdRng};

use crate::{
    core::{Rgba8, Vec2},
    error::{VitrineError, VitrineResult},
};

pub const GRAVITY_PER_FRAME: f64 = 0.1;
/// Pixel stride when sampling a title raster into particles.
pub const SAMPLE_STRIDE: usize = 3;
/// Minimum source alpha for a pixel to become a particle.
pub const ALPHA_CUTOFF: u8 = 128;

/// One square fragment of the dissolving title. Ballistic with constant
/// downward acceleration; shrinks and fades linearly with remaining life.
#[derive(Clone, Copy, Debug)]
pub struct DissolveParticle {
    pos: Vec2,
    vel: Vec2,
    size: f64,
    initial_size: f64,
    life: f64,
    initial_life: f64,
    rotation: f64,
    spin: f64,
    color: Rgba8,
}

impl DissolveParticle {
    pub fn spawn(rng: &mut StdRng, pos: Vec2, color: Rgba8) -> Self {
        let size = rng.random_range(1.0..4.0);
        let vel = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-4.0..0.0));
        let life = rng.random_range(80.0..200.0);
        let rotation = rng.random_range(0.0..TAU);
        let spin = rng.random_range(-0.05..0.05);
        Self {
            pos,
            vel,
            size,
            initial_size: size,
            life,
            initial_life: life,
            rotation,
            spin,
            color,
        }
    }

    /// Advance one frame; returns false once the particle has expired.
    pub fn step(&mut self) -> bool {
        self.vel.y += GRAVITY_PER_FRAME;
        self.pos += self.vel;
        self.rotation += self.spin;
        self.life -= 1.0;
        self.size = self.initial_size * self.life_frac();
        self.life > 0.0
    }

    fn life_frac(&self) -> f64 {
        (self.life / self.initial_life).max(0.0)
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Fill opacity: the linear remaining-life fraction.
    pub fn fill_alpha(&self) -> f64 {
        self.life_frac()
    }

    /// Glow opacity: a single sine hump over the particle's life, so the halo
    /// swells mid-flight and vanishes at both ends.
    pub fn glow_alpha(&self) -> f64 {
        (self.life_frac() * std::f64::consts::PI).sin() * 0.5
    }
}

/// The full batch of particles spawned from one title raster. Steps until
/// empty and then goes inert.
#[derive(Debug, Default)]
pub struct DissolveField {
    particles: Vec<DissolveParticle>,
}

impl DissolveField {
    /// Walk a premultiplied RGBA8 raster on a fixed stride and spawn one
    /// particle per sufficiently opaque pixel, carrying the pixel's straight
    /// color. Row-major order keeps the rng stream reproducible.
    pub fn sample_raster(
        rgba8_premul: &[u8],
        width: u32,
        height: u32,
        rng: &mut StdRng,
    ) -> VitrineResult<Self> {
        let (w, h) = (width as usize, height as usize);
        if rgba8_premul.len() != w * h * 4 {
            return Err(VitrineError::raster("raster byte length mismatch"));
        }

        let mut particles = Vec::new();
        for y in (0..h).step_by(SAMPLE_STRIDE) {
            for x in (0..w).step_by(SAMPLE_STRIDE) {
                let i = (y * w + x) * 4;
                let a = rgba8_premul[i + 3];
                if a > ALPHA_CUTOFF {
                    let color = Rgba8::from_premul(
                        rgba8_premul[i],
                        rgba8_premul[i + 1],
                        rgba8_premul[i + 2],
                        a,
                    );
                    particles.push(DissolveParticle::spawn(
                        rng,
                        Vec2::new(x as f64, y as f64),
                        color,
                    ));
                }
            }
        }
        Ok(Self { particles })
    }

    pub fn step(&mut self) {
        self.particles.retain_mut(|p| p.step());
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[DissolveParticle] {
        &self.particles
    }
}

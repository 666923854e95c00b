use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::core::{Vec2, Viewport, stable_hash64};

pub const POOL_SIZE: usize = 50;

#[derive(Clone, Copy, Debug)]
pub struct AmbientParticle {
    pub pos: Vec2,
    pub size: f64,
    pub drift: Vec2,
    pub opacity: f64,
}

/// Looping background drift field. The pool size is fixed for the field's
/// lifetime: particles that fall past the bottom edge respawn at the top
/// with a fresh horizontal position, and horizontal exits wrap to the
/// opposite edge. Resizing moves the field bounds only; live particles keep
/// their positions.
#[derive(Debug)]
pub struct AmbientField {
    bounds: Viewport,
    rng: StdRng,
    particles: Vec<AmbientParticle>,
}

impl AmbientField {
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self::with_pool(viewport, seed, POOL_SIZE)
    }

    pub fn with_pool(viewport: Viewport, seed: u64, pool: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(stable_hash64(seed, "ambient"));
        let particles = (0..pool)
            .map(|_| Self::spawn(&mut rng, viewport))
            .collect();
        Self {
            bounds: viewport,
            rng,
            particles,
        }
    }

    fn spawn(rng: &mut StdRng, bounds: Viewport) -> AmbientParticle {
        AmbientParticle {
            pos: Vec2::new(range_or_zero(rng, bounds.w()), range_or_zero(rng, bounds.h())),
            size: rng.random_range(1.0..3.0),
            drift: Vec2::new(rng.random_range(-0.1..0.1), rng.random_range(0.2..0.6)),
            opacity: rng.random_range(0.3..0.8),
        }
    }

    pub fn step(&mut self) {
        let w = self.bounds.w();
        let h = self.bounds.h();
        for p in &mut self.particles {
            p.pos += p.drift;
            if p.pos.y > h {
                p.pos.y = 0.0;
                p.pos.x = range_or_zero(&mut self.rng, w);
            }
            if p.pos.x > w {
                p.pos.x = 0.0;
            } else if p.pos.x < 0.0 {
                p.pos.x = w;
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = viewport;
    }

    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn range_or_zero(rng: &mut StdRng, hi: f64) -> f64 {
    if hi > 0.0 { rng.random_range(0.0..hi) } else { 0.0 }
}

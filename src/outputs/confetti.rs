use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;

use super::ParticleEmitter;
use crate::kernel::scheduler::BurstSpec;

/// Bursts are specified for a full screen; a terminal holds far fewer cells.
const PARTICLE_SCALE: u32 = 3;
const MAX_PARTICLES: usize = 400;
const GRAVITY: f32 = 0.0012;
const DRAG: f32 = 0.97;
const SPEED: std::ops::Range<f32> = 0.015..0.035;
const LIFETIME: std::ops::Range<u32> = 60..110;

pub const GLYPHS: [char; 5] = ['*', '•', '✦', '▪', '+'];
pub const COLOR_SLOTS: u8 = 6;

/// Position is normalized to the play area: (0,0) top-left, (1,1) bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    age: u32,
    lifetime: u32,
    pub color: u8,
    pub glyph: char,
}

impl Particle {
    fn is_alive(&self) -> bool {
        self.age < self.lifetime && self.y <= 1.1 && (-0.1..=1.1).contains(&self.x)
    }
}

#[derive(Debug, Default)]
pub struct ConfettiField {
    particles: Vec<Particle>,
}

impl ConfettiField {
    pub fn spawn<R: Rng>(&mut self, spec: &BurstSpec, rng: &mut R) {
        let count = (spec.particle_count / PARTICLE_SCALE).max(1);
        let half_spread = spec.spread_deg / 2.0;

        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let angle = if half_spread > 0.0 {
                spec.angle_deg + rng.random_range(-half_spread..half_spread)
            } else {
                spec.angle_deg
            };
            let speed = rng.random_range(SPEED);
            let radians = angle.to_radians();
            self.particles.push(Particle {
                x: spec.origin_x,
                y: spec.origin_y,
                vx: radians.cos() * speed,
                // Screen y grows downward.
                vy: -radians.sin() * speed,
                age: 0,
                lifetime: rng.random_range(LIFETIME),
                color: rng.random_range(0..COLOR_SLOTS),
                glyph: GLYPHS[rng.random_range(0..GLYPHS.len())],
            });
        }
    }

    /// One frame of motion.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DRAG;
            p.vy = p.vy * DRAG + GRAVITY;
            p.age += 1;
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Shared handle: the driver bursts into it, the renderer draws from it.
#[derive(Debug, Clone, Default)]
pub struct Confetti {
    field: Arc<Mutex<ConfettiField>>,
}

impl Confetti {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ConfettiField> {
        self.field.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn step(&self) {
        self.lock().step();
    }

    pub fn snapshot(&self) -> Vec<Particle> {
        self.lock().particles().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ParticleEmitter for Confetti {
    fn burst(&mut self, spec: &BurstSpec) {
        let mut rng = rand::rng();
        self.lock().spawn(spec, &mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_scales_particle_count() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(7);
        field.spawn(&BurstSpec::new(150, 70.0), &mut rng);
        assert_eq!(field.len(), 50);
    }

    #[test]
    fn upward_burst_rises_then_expires() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(11);
        field.spawn(&BurstSpec::new(30, 0.0).origin(0.5, 0.9), &mut rng);

        field.step();
        assert!(field.particles().iter().all(|p| p.y < 0.9), "straight-up burst should rise");

        for _ in 0..LIFETIME.end {
            field.step();
        }
        assert!(field.is_empty(), "every particle expires within its lifetime");
    }

    #[test]
    fn field_is_bounded() {
        let mut field = ConfettiField::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            field.spawn(&BurstSpec::new(300, 200.0), &mut rng);
        }
        assert!(field.len() <= MAX_PARTICLES);
    }
}

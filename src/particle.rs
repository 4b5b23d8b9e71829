use std::time::{SystemTime, UNIX_EPOCH};

use glam::{Vec2, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::types::Color;

/// Size of the particle store for both demos
pub const NUM_PARTICLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle2d {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle3d {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Seed from the wall clock, one value per process start
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn generate_particles_2d<R: Rng>(rng: &mut R, num_particles: usize) -> Vec<Particle2d> {
    (0..num_particles)
        .map(|_| {
            let position = Vec2::new(grid_coordinate(rng), grid_coordinate(rng));
            let color = Color::new(channel(rng), channel(rng), channel(rng));

            Particle2d {
                position,
                velocity: Vec2::new(0.0, -0.002),
                color,
            }
        })
        .collect()
}

/// A coordinate on a 0.02 grid over [-1, 0.98]
fn grid_coordinate<R: Rng>(rng: &mut R) -> f32 {
    (rng.gen_range(0..100) - 50) as f32 / 50.0
}

fn channel<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(0..=255u8) as f32 / 255.0
}

pub fn generate_particles_3d<R: Rng>(rng: &mut R, num_particles: usize) -> Vec<Particle3d> {
    (0..num_particles)
        .map(|_| Particle3d {
            position: Vec3::new(
                rng.gen_range(-1f32..=1f32),
                rng.gen_range(0.5f32..=1.5f32),
                rng.gen_range(-1f32..=1f32),
            ),
            velocity: Vec3::new(0.0, -0.01, 0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_a_full_2d_store_within_range() {
        let mut rng = seeded_rng(7);
        let particles = generate_particles_2d(&mut rng, NUM_PARTICLES);

        assert_eq!(particles.len(), NUM_PARTICLES);
        for p in &particles {
            assert!((-1.0..=0.98).contains(&p.position.x));
            assert!((-1.0..=0.98).contains(&p.position.y));
            assert_eq!(p.velocity, Vec2::new(0.0, -0.002));
            for channel in p.color.to_array() {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn generates_a_full_3d_store_within_range() {
        let mut rng = seeded_rng(7);
        let particles = generate_particles_3d(&mut rng, NUM_PARTICLES);

        assert_eq!(particles.len(), NUM_PARTICLES);
        for p in &particles {
            assert!((-1.0..=1.0).contains(&p.position.x));
            assert!((0.5..=1.5).contains(&p.position.y));
            assert!((-1.0..=1.0).contains(&p.position.z));
            assert!(p.velocity.y < 0.0);
        }
    }

    #[test]
    fn same_seed_same_store() {
        let a = generate_particles_2d(&mut seeded_rng(42), NUM_PARTICLES);
        let b = generate_particles_2d(&mut seeded_rng(42), NUM_PARTICLES);
        assert_eq!(a, b);
    }
}

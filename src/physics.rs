//! CPU particle integration for both demos
//!
//! Nothing in here touches the GPU. The render module only ever sees the flat
//! attribute slices returned by [`Simulation::flatten`].

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng};

use crate::{
    particle::{self, Particle2d, Particle3d, NUM_PARTICLES},
    types::Dimension,
};

/// Lower bound on every axis in 2D and on `y` in 3D
pub const FLOOR: f32 = -1.0;
/// Upper bound of both axes in 2D
pub const WALL: f32 = 1.0;
/// Upper bound of `y` in 3D
pub const CEILING: f32 = 0.6;

/// Velocity factor applied when a 3D particle hits the floor
pub const FLOOR_RESTITUTION: f32 = -0.6;
/// Velocity factor applied when a 3D particle hits the ceiling
pub const CEILING_RESTITUTION: f32 = -1.0;

/// Largest horizontal speed the 2D kick can assign
pub const KICK_SCALE: f32 = 1.0 / 1000.0;

/// Densely packed per-particle attributes, ordered by particle index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes<'a> {
    pub positions: &'a [f32],
    pub colors: Option<&'a [f32]>,
}

pub trait Simulation {
    fn dimension(&self) -> Dimension;

    fn num_particles(&self) -> usize;

    /// Advance every particle by one frame
    fn step(&mut self);

    /// Refill the flat attribute buffers from the current store
    fn flatten(&mut self) -> Attributes<'_>;
}

pub fn new_simulation(dimension: Dimension, mut rng: StdRng) -> Box<dyn Simulation> {
    match dimension {
        Dimension::Two => {
            let particles = particle::generate_particles_2d(&mut rng, NUM_PARTICLES);
            Box::new(Physics2d::new(particles, rng))
        }
        Dimension::Three => {
            let particles = particle::generate_particles_3d(&mut rng, NUM_PARTICLES);
            Box::new(Physics3d::new(particles))
        }
    }
}

pub struct Physics2d {
    pub particles: Vec<Particle2d>,
    rng: StdRng,

    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl Physics2d {
    pub fn new(particles: Vec<Particle2d>, rng: StdRng) -> Self {
        let positions = vec![0.0; particles.len() * Dimension::Two.position_components()];
        let colors = vec![0.0; particles.len() * 3];

        Self {
            particles,
            rng,
            positions,
            colors,
        }
    }
}

impl Simulation for Physics2d {
    fn dimension(&self) -> Dimension {
        Dimension::Two
    }

    fn num_particles(&self) -> usize {
        self.particles.len()
    }

    fn step(&mut self) {
        for particle in self.particles.iter_mut() {
            step_particle_2d(particle, &mut self.rng);
        }
    }

    fn flatten(&mut self) -> Attributes<'_> {
        for (dst, particle) in self.positions.chunks_exact_mut(2).zip(&self.particles) {
            dst.copy_from_slice(&particle.position.to_array());
        }
        for (dst, particle) in self.colors.chunks_exact_mut(3).zip(&self.particles) {
            dst.copy_from_slice(&particle.color.to_array());
        }

        Attributes {
            positions: &self.positions,
            colors: Some(&self.colors),
        }
    }
}

pub struct Physics3d {
    pub particles: Vec<Particle3d>,

    positions: Vec<f32>,
}

impl Physics3d {
    pub fn new(particles: Vec<Particle3d>) -> Self {
        let positions = vec![0.0; particles.len() * Dimension::Three.position_components()];

        Self {
            particles,
            positions,
        }
    }
}

impl Simulation for Physics3d {
    fn dimension(&self) -> Dimension {
        Dimension::Three
    }

    fn num_particles(&self) -> usize {
        self.particles.len()
    }

    fn step(&mut self) {
        self.particles.iter_mut().for_each(step_particle_3d);
    }

    fn flatten(&mut self) -> Attributes<'_> {
        for (dst, particle) in self.positions.chunks_exact_mut(3).zip(&self.particles) {
            dst.copy_from_slice(&particle.position.to_array());
        }

        Attributes {
            positions: &self.positions,
            colors: None,
        }
    }
}

/// Euler step, zero-velocity kick, then reflect off the [-1, 1] box
pub fn step_particle_2d<R: Rng>(particle: &mut Particle2d, rng: &mut R) {
    particle.position += particle.velocity;

    // Exact comparison: only a particle that never moved sideways gets kicked
    if particle.velocity.x == 0.0 {
        let angle = rng.gen_range(0.0..TAU);
        particle.velocity.x = angle.sin() * KICK_SCALE;
    }

    for axis in 0..2 {
        if particle.position[axis] < FLOOR {
            particle.position[axis] = FLOOR;
            particle.velocity[axis] *= -1.0;
        }

        if particle.position[axis] > WALL {
            particle.position[axis] = WALL;
            particle.velocity[axis] *= -1.0;
        }
    }
}

/// Euler step with a damped floor and an elastic ceiling on `y`
pub fn step_particle_3d(particle: &mut Particle3d) {
    particle.position += particle.velocity;

    if particle.position.y < FLOOR {
        particle.position.y = FLOOR;
        particle.velocity.y *= FLOOR_RESTITUTION;
    }

    if particle.position.y > CEILING {
        particle.position.y = CEILING;
        particle.velocity.y *= CEILING_RESTITUTION;
    }
}

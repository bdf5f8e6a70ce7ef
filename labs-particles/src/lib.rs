//! Decorative particle-field simulation for the site background.
//!
//! The simulation is host-agnostic: a canvas (or any other render surface)
//! owns an [`Animation`] handle, drives it with `tick` once per frame and
//! calls `stop` on teardown. Nothing here schedules frames or touches a DOM.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    pub count: usize,
    /// Speed cap in units per second.
    pub max_speed: f32,
    /// Particles (and the pointer) closer than this are joined by a line.
    pub link_distance: f32,
    /// Pointer influence radius.
    pub pointer_radius: f32,
    /// Acceleration applied at the pointer's center, fading to zero at the
    /// radius edge.
    pub repel_strength: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            count: 80,
            max_speed: 60.0,
            link_distance: 120.0,
            pointer_radius: 100.0,
            repel_strength: 180.0,
        }
    }
}

/// A line segment the host should draw, with alpha falling off as the two
/// endpoints drift apart.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub alpha: f32,
}

pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Self {
        let rng = StdRng::from_os_rng();
        Self::from_rng(config, rng)
    }

    /// Deterministic construction; the same seed always yields the same
    /// initial layout.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Starts from an explicit particle set, e.g. state restored by a host.
    pub fn with_particles(config: FieldConfig, particles: Vec<Particle>) -> Self {
        Self { config, particles }
    }

    fn from_rng(config: FieldConfig, mut rng: StdRng) -> Self {
        let particles = (0..config.count)
            .map(|_| Particle {
                x: rng.random_range(0.0..config.width),
                y: rng.random_range(0.0..config.height),
                vx: rng.random_range(-0.5..0.5) * config.max_speed,
                vy: rng.random_range(-0.5..0.5) * config.max_speed,
                alpha: rng.random_range(0.2..0.9),
            })
            .collect();
        Self { config, particles }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        for p in &mut self.particles {
            p.x = p.x.clamp(0.0, width);
            p.y = p.y.clamp(0.0, height);
        }
    }

    /// Advances the simulation by `dt` seconds. Particles drift, get pushed
    /// away from the pointer inside its radius and reflect off the bounds.
    pub fn step(&mut self, dt: f32, pointer: Option<(f32, f32)>) {
        let config = &self.config;
        for p in &mut self.particles {
            if let Some((px, py)) = pointer {
                let dx = p.x - px;
                let dy = p.y - py;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > f32::EPSILON && dist < config.pointer_radius {
                    let push = config.repel_strength * (1.0 - dist / config.pointer_radius) * dt;
                    p.vx += dx / dist * push;
                    p.vy += dy / dist * push;
                }
            }

            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            if speed > config.max_speed {
                let scale = config.max_speed / speed;
                p.vx *= scale;
                p.vy *= scale;
            }

            p.x += p.vx * dt;
            p.y += p.vy * dt;

            if p.x < 0.0 {
                p.x = -p.x;
                p.vx = -p.vx;
            } else if p.x > config.width {
                p.x = 2.0 * config.width - p.x;
                p.vx = -p.vx;
            }
            if p.y < 0.0 {
                p.y = -p.y;
                p.vy = -p.vy;
            } else if p.y > config.height {
                p.y = 2.0 * config.height - p.y;
                p.vy = -p.vy;
            }

            // reflection overshoot on extreme dt
            p.x = p.x.clamp(0.0, config.width);
            p.y = p.y.clamp(0.0, config.height);
        }
    }

    /// Segments to draw this frame: particle pairs within the link distance,
    /// plus a segment from each nearby particle to the pointer.
    pub fn links(&self, pointer: Option<(f32, f32)>) -> Vec<Link> {
        let max = self.config.link_distance;
        let mut links = Vec::new();

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                if dist < max {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        alpha: 1.0 - dist / max,
                    });
                }
            }
            if let Some((px, py)) = pointer {
                let dist = ((a.x - px).powi(2) + (a.y - py).powi(2)).sqrt();
                if dist < max {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (px, py),
                        alpha: 1.0 - dist / max,
                    });
                }
            }
        }
        links
    }
}

/// Snapshot handed to the host each frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub particles: Vec<Particle>,
    pub links: Vec<Link>,
}

/// Explicit lifecycle handle. `tick` yields frames while running and nothing
/// after `stop`; stopping twice is fine.
pub struct Animation {
    field: ParticleField,
    running: bool,
    frames: u64,
}

impl Animation {
    pub fn start(config: FieldConfig) -> Self {
        Self::from_field(ParticleField::new(config))
    }

    pub fn start_seeded(config: FieldConfig, seed: u64) -> Self {
        Self::from_field(ParticleField::with_seed(config, seed))
    }

    fn from_field(field: ParticleField) -> Self {
        Self {
            field,
            running: true,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn tick(&mut self, dt: f32, pointer: Option<(f32, f32)>) -> Option<Frame> {
        if !self.running {
            return None;
        }
        self.field.step(dt, pointer);
        let frame = Frame {
            index: self.frames,
            particles: self.field.particles().to_vec(),
            links: self.field.links(pointer),
        };
        self.frames += 1;
        Some(frame)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

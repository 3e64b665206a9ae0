//! Projectile cadence
//!
//! The runner fires straight ahead on a fixed interval. Projectiles are dumb
//! tracers: the environment does the collision work and reports hits back
//! through [`super::TickInput`]; here they only fly and age out.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

#[derive(Debug)]
pub struct ProjectileLauncher {
    projectiles: Vec<Projectile>,
    cooldown: f32,
    next_id: u32,
    interval: f32,
    speed: f32,
    lifetime: f32,
}

impl ProjectileLauncher {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            projectiles: Vec::new(),
            cooldown: 0.0,
            next_id: 1,
            interval: config.shoot_interval,
            speed: config.projectile_speed,
            lifetime: config.projectile_lifetime,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Fire on cadence, advance everything in flight, retire the expired.
    pub fn tick(&mut self, dt: f32, head: Vec3, forward: Vec3) {
        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            self.cooldown += self.interval;
            let id = self.next_id;
            self.next_id += 1;
            self.projectiles.push(Projectile {
                id,
                position: head + forward * 0.5,
                velocity: forward * self.speed,
                age: 0.0,
            });
        }
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity * dt;
            projectile.age += dt;
        }
        let lifetime = self.lifetime;
        self.projectiles.retain(|p| p.age < lifetime);
    }

    /// Remove a projectile the environment reported as hitting something.
    pub fn retire(&mut self, id: u32) {
        self.projectiles.retain(|p| p.id != id);
    }
}

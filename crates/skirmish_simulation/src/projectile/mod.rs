//! Pooled projectiles
//!
//! Lifecycle: pool.acquire (Inactive) → configure → launch (InFlight) →
//! release (Inactive, обратно в free list) по expiry или по попаданию.
//!
//! Projectiles существуют только на authoritative стороне: observers
//! видят атаку через `AttackFeedback`, а не через реплику снаряда.

use bevy::prelude::*;

pub mod flight;
pub mod pool;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod flight_tests;

pub use flight::advance_projectiles;
pub use pool::{ArmedProjectile, ProjectileHandle, ProjectilePool};

/// Параметры одного выстрела
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileConfig {
    pub owner: Entity,
    pub damage: f32,
    /// Нормализованное направление полёта
    pub direction: Vec3,
    pub speed: f32,
    pub range: f32,
    /// Смещение цели при попадании
    pub knockback: Vec3,
    pub piercing: bool,
    /// Секунды до начала движения
    pub startup_delay: f32,
    pub hit_radius: f32,
}

/// Состояние полёта (есть только у launched projectile)
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub config: ProjectileConfig,
    pub traveled: f32,
    pub startup_remaining: f32,
    /// Уже поражённые цели (piercing не бьёт одну цель дважды)
    pub struck: Vec<Entity>,
}

impl Flight {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            startup_remaining: config.startup_delay.max(0.0),
            config,
            traveled: 0.0,
            struck: Vec::new(),
        }
    }
}

/// Projectile entity
///
/// "Active без конфигурации" непредставимо: `InFlight` всегда несёт config.
#[derive(Component, Debug, Clone, Default, PartialEq)]
#[require(Transform)]
pub enum Projectile {
    #[default]
    Inactive,
    InFlight(Flight),
}

impl Projectile {
    pub fn is_active(&self) -> bool {
        matches!(self, Projectile::InFlight(_))
    }
}

/// Событие: projectile попал в цель
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub owner: Entity,
    pub target: Entity,
    pub damage: f32,
}

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileHit>()
            .init_resource::<ProjectilePool>();

        app.add_systems(
            FixedUpdate,
            advance_projectiles.in_set(crate::SimulationSet::Projectiles),
        );
    }
}

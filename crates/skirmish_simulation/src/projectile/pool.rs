//! ProjectilePool: переиспользуемые projectile entities
//!
//! Растёт без ограничений, не сжимается. Resource, не глобальный static.

use bevy::prelude::*;
use std::collections::HashSet;

use super::{Flight, Projectile, ProjectileConfig};

#[derive(Resource, Debug, Default)]
pub struct ProjectilePool {
    free: Vec<Entity>,
    checked_out: HashSet<Entity>,
    total_created: usize,
}

impl ProjectilePool {
    /// Заранее создать `count` неактивных projectiles
    pub fn prewarm(&mut self, commands: &mut Commands, count: usize) {
        for _ in 0..count {
            let entity = commands.spawn(Projectile::Inactive).id();
            self.total_created += 1;
            self.free.push(entity);
        }
    }

    /// Выдать неактивный projectile в заданной позиции
    pub fn acquire(&mut self, commands: &mut Commands, origin: Transform) -> ProjectileHandle {
        let entity = match self.free.pop() {
            Some(entity) => {
                commands.entity(entity).insert((Projectile::Inactive, origin));
                entity
            }
            None => {
                self.total_created += 1;
                commands.spawn((Projectile::Inactive, origin)).id()
            }
        };

        self.checked_out.insert(entity);
        ProjectileHandle { entity }
    }

    /// Вернуть projectile в pool. Повторный release: no-op (false).
    pub fn release(&mut self, commands: &mut Commands, entity: Entity) -> bool {
        if !self.checked_out.remove(&entity) {
            return false;
        }

        commands.entity(entity).try_insert(Projectile::Inactive);
        self.free.push(entity);
        true
    }

    /// Вернуть выданный, но не запущенный projectile
    ///
    /// Handle, выброшенный без `configure().launch()` или `cancel`, держит
    /// entity в checked_out навсегда.
    pub fn cancel(&mut self, commands: &mut Commands, handle: ProjectileHandle) -> bool {
        self.release(commands, handle.entity)
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn checked_out(&self) -> usize {
        self.checked_out.len()
    }

    pub fn total_created(&self) -> usize {
        self.total_created
    }
}

/// Выданный, но ещё не сконфигурированный projectile
///
/// Дальше только `configure(..).launch(..)` или `ProjectilePool::cancel`.
#[must_use = "acquired projectile stays checked out until launched or cancelled"]
#[derive(Debug)]
pub struct ProjectileHandle {
    entity: Entity,
}

impl ProjectileHandle {
    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn configure(self, config: ProjectileConfig) -> ArmedProjectile {
        ArmedProjectile {
            entity: self.entity,
            config,
        }
    }
}

/// Сконфигурированный projectile, готовый к запуску
#[must_use]
#[derive(Debug)]
pub struct ArmedProjectile {
    entity: Entity,
    config: ProjectileConfig,
}

impl ArmedProjectile {
    pub fn launch(self, commands: &mut Commands) -> Entity {
        commands
            .entity(self.entity)
            .insert(Projectile::InFlight(Flight::new(self.config)));
        self.entity
    }
}

//! Combat module
//!
//! Поток атаки:
//! 1. input / AI → `AttackRequest`
//! 2. `dispatch_attack_requests` → `AuthorityRole` актора
//! 3. authoritative: cooldown gate → projectile из pool → `AttackFeedback`
//!    observer: `RequestAttack` на server, локально ничего
//! 4. projectile flight (см. `projectile`) → `DamageDealt` → смерть
//!
//! Health/damage/knockback меняет ТОЛЬКО authoritative сторона.

use bevy::prelude::*;

pub mod cooldown;
pub mod death;
pub mod dispatch;
pub mod intent;

pub use cooldown::{tick_animation_locks, tick_attack_cooldowns, AnimationLock, AttackCooldown};
pub use death::despawn_dead_actors;
pub use dispatch::dispatch_attack_requests;
pub use intent::{ai_attack_intent, AttackIntent};

/// Event: актор хочет атаковать в направлении `aim`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackRequest {
    pub actor: Entity,
    /// Направление (не обязательно нормализовано; ноль = forward актора)
    pub aim: Vec3,
}

/// Event: проиграть визуал/звук атаки (cosmetic)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackFeedback {
    pub actor: Entity,
    /// true = пришло по сети от authoritative peer
    pub replayed: bool,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
}

/// Combat Plugin
///
/// Порядок в `SimulationSet::Combat`:
/// 1. cooldown + animation lock таймеры
/// 2. AI intent → AttackRequest
/// 3. dispatch (authority routing)
///
/// `despawn_dead_actors`: после projectile flight (`SimulationSet::Death`).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackRequest>()
            .add_event::<AttackFeedback>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .register_type::<AttackCooldown>();

        app.add_systems(
            FixedUpdate,
            (
                tick_attack_cooldowns,
                tick_animation_locks,
                ai_attack_intent,
                dispatch_attack_requests,
            )
                .chain()
                .in_set(crate::SimulationSet::Combat),
        )
        .add_systems(
            FixedUpdate,
            despawn_dead_actors.in_set(crate::SimulationSet::Death),
        );
    }
}

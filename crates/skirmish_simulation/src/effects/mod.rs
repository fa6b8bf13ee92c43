//! Timed effects (damage amplify, heal, mana restore)
//!
//! Lifecycle одного `apply` (только authoritative сторона актора; observer
//! пересылает `RequestEffect` на server и статы реплики не трогает):
//! 1. exclusive policy check (reject = silent no-op)
//! 2. мутация стата сразу
//! 3. companion (networked или local) + flat recolor broadcast
//! 4. snapshot визуала локально
//! 5. revert запланирован в `TimedEffects` DelayQueue на now + duration
//!
//! Revert срабатывает ровно один раз на apply: его instance id должен всё
//! ещё числиться в `ActiveEffects` актора. Если актора уже нет: стат не
//! трогаем, но companion освобождаем всегда.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod companion;
pub mod manager;
pub mod tint;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod manager_tests;

pub use companion::{follow_companions, spawn_companion, Companion, CompanionKind, CompanionRef, FollowTarget};
pub use manager::{apply_effect_requests, fire_effect_reverts, PendingRevert, StatDelta, TimedEffects};
pub use tint::{Rgba, Tint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum EffectKind {
    /// attack_damage × magnitude на duration
    DamageAmplify,
    /// +magnitude health
    Heal,
    /// +magnitude mana
    ManaRestore,
}

/// Уникальный id конкретного apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct EffectInstanceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ActiveEffect {
    pub instance: EffectInstanceId,
    pub kind: EffectKind,
}

/// Активные эффекты актора
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ActiveEffects {
    entries: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn has_kind(&self, kind: EffectKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn contains(&self, instance: EffectInstanceId) -> bool {
        self.entries.iter().any(|e| e.instance == instance)
    }

    pub fn insert(&mut self, instance: EffectInstanceId, kind: EffectKind) {
        self.entries.push(ActiveEffect { instance, kind });
    }

    /// true если instance был активен (и теперь снят)
    pub fn remove(&mut self, instance: EffectInstanceId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.instance != instance);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Event: использование предмета/способности с timed эффектом
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub actor: Entity,
    pub kind: EffectKind,
    pub magnitude: f32,
    /// Секунды
    pub duration: f32,
}

impl EffectRequest {
    pub fn amplify(actor: Entity, multiplier: f32, duration: f32) -> Self {
        Self {
            actor,
            kind: EffectKind::DamageAmplify,
            magnitude: multiplier,
            duration,
        }
    }

    pub fn heal(actor: Entity, amount: f32, duration: f32) -> Self {
        Self {
            actor,
            kind: EffectKind::Heal,
            magnitude: amount,
            duration,
        }
    }

    pub fn restore_mana(actor: Entity, amount: f32, duration: f32) -> Self {
        Self {
            actor,
            kind: EffectKind::ManaRestore,
            magnitude: amount,
            duration,
        }
    }
}

/// Event: эффект применён
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectApplied {
    pub actor: Entity,
    pub instance: EffectInstanceId,
    pub kind: EffectKind,
}

/// Event: revert эффекта отработал
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectReverted {
    pub actor: Entity,
    pub instance: EffectInstanceId,
    pub kind: EffectKind,
    /// false = актора уже не было, стат не трогали
    pub stat_restored: bool,
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EffectRequest>()
            .add_event::<EffectApplied>()
            .add_event::<EffectReverted>()
            .init_resource::<TimedEffects>();

        app.add_systems(
            FixedUpdate,
            (apply_effect_requests, fire_effect_reverts, follow_companions)
                .chain()
                .in_set(crate::SimulationSet::Effects),
        );
    }
}

//! Attack cooldown state machine + animation lock
//!
//! Ready --try_begin--> Cooling(interval) --tick(dt)...--> Ready
//!
//! Cooldown и визуал атаки: РАЗНЫЕ таймеры, cooldown гейтит следующую
//! атаку, `AnimationLock` только блокирует визуальные реакции актора.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum AttackCooldown {
    #[default]
    Ready,
    Cooling {
        remaining: f32,
    },
}

impl AttackCooldown {
    pub fn is_ready(&self) -> bool {
        matches!(self, AttackCooldown::Ready)
    }

    /// Ready → Cooling(interval). Во время cooling: false, состояние не меняется.
    pub fn try_begin(&mut self, interval: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        if interval > 0.0 {
            *self = AttackCooldown::Cooling { remaining: interval };
        }
        true
    }

    pub fn tick(&mut self, delta: f32) {
        if let AttackCooldown::Cooling { remaining } = self {
            *remaining -= delta;
            if *remaining <= 0.0 {
                *self = AttackCooldown::Ready;
            }
        }
    }

    pub fn remaining(&self) -> f32 {
        match self {
            AttackCooldown::Ready => 0.0,
            AttackCooldown::Cooling { remaining } => *remaining,
        }
    }
}

/// Актор проигрывает атаку (визуал/звук), реакции заблокированы
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationLock {
    pub remaining: f32,
}

impl AnimationLock {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
        }
    }
}

/// System: тикаем cooldown всех акторов
pub fn tick_attack_cooldowns(mut cooldowns: Query<&mut AttackCooldown>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut cooldown in cooldowns.iter_mut() {
        if !cooldown.is_ready() {
            cooldown.tick(delta);
        }
    }
}

/// System: снимаем истёкшие animation locks
pub fn tick_animation_locks(
    mut commands: Commands,
    mut locks: Query<(Entity, &mut AnimationLock)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut lock) in locks.iter_mut() {
        lock.remaining -= delta;
        if lock.remaining <= 0.0 {
            commands.entity(entity).remove::<AnimationLock>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_while_cooling_is_dropped() {
        let mut cooldown = AttackCooldown::default();

        assert!(cooldown.try_begin(0.5));
        assert!(!cooldown.try_begin(0.5));
        assert_eq!(cooldown.remaining(), 0.5);
    }

    #[test]
    fn test_tick_returns_to_ready() {
        let mut cooldown = AttackCooldown::default();
        cooldown.try_begin(0.5);

        cooldown.tick(0.25);
        assert!(!cooldown.is_ready());

        cooldown.tick(0.25);
        assert!(cooldown.is_ready());
        assert!(cooldown.try_begin(0.5));
    }

    #[test]
    fn test_zero_interval_never_cools() {
        let mut cooldown = AttackCooldown::default();

        assert!(cooldown.try_begin(0.0));
        assert!(cooldown.is_ready());
    }

    #[test]
    fn test_animation_lock_clamps_negative() {
        assert_eq!(AnimationLock::new(-1.0).remaining, 0.0);
    }
}

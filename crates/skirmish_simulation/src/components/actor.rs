//! Actor компоненты: всё что умеет атаковать или получать эффекты
//!
//! Архитектура: Required Components (Bevy 0.16)
//! - Actor требует Transform + Health + Mana + CombatStats + AttackCooldown + ActiveEffects
//! - Authority НЕ required: роль выбирается один раз при spawn (см. `ActorSpawn`)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AttackCooldown;
use crate::effects::ActiveEffects;

/// Тип актора: ключ для per-archetype конфигурации (cooldown, projectile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum ActorArchetype {
    /// Игрок
    #[default]
    Fighter,
    /// Наёмник (AI-союзник игрока)
    Mercenary,
    /// Обычный моб
    Mob,
    /// Элитный моб (health скейлится от числа подключений)
    EliteMob,
}

/// Актор (игрок, наёмник, моб)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, Health, Mana, CombatStats, AttackCooldown, ActiveEffects)]
pub struct Actor {
    pub archetype: ActorArchetype,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Возвращает реально снятый урон (не больше текущего HP)
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;
        applied
    }

    /// Возвращает реально восстановленное HP (clamp по max)
    pub fn heal(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.max - self.current);
        self.current += applied;
        applied
    }
}

/// Мана актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Mana {
    pub current: f32,
    pub max: f32,
}

impl Default for Mana {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Mana {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn spend(&mut self, amount: f32) -> bool {
        if self.current >= amount {
            self.current -= amount;
            true
        } else {
            false
        }
    }

    /// Возвращает реально восстановленную ману (clamp по max)
    pub fn restore(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.max - self.current);
        self.current += applied;
        applied
    }
}

/// Боевые характеристики
///
/// - `basic_damage`: базовое значение (без баффов), не меняется эффектами
/// - `attack_damage`: текущий урон атаки (то, что кладётся в projectile)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub basic_damage: f32,
    pub attack_damage: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl CombatStats {
    pub fn new(basic_damage: f32) -> Self {
        Self {
            basic_damage,
            attack_damage: basic_damage,
        }
    }
}

/// Маркер: entity блокирует навигацию (его появление помечает grid как stale)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct NavObstacle;

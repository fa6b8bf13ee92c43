//! Combat configuration (data-driven)
//!
//! Загружается из embedded RON (`config/combat.ron`), fallback на
//! `CombatConfig::default()` если файл не парсится. Все интервалы заданы
//! per-archetype / per-effect-kind, никаких глобальных констант в системах.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::components::ActorArchetype;
use crate::effects::{CompanionKind, EffectKind, Rgba};
use crate::error::ConfigError;

const EMBEDDED_CONFIG: &str = include_str!("../config/combat.ron");

/// Параметры projectile для атаки архетипа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileProfile {
    /// Смещение точки вылета относительно актора (local space)
    pub origin_offset: [f32; 3],
    /// Дальность полёта (метры)
    pub range: f32,
    /// Скорость (м/с)
    pub speed: f32,
    /// Сила отбрасывания (вдоль направления полёта)
    pub knockback: f32,
    /// Пробивает цели насквозь
    #[serde(default)]
    pub piercing: bool,
    /// Задержка перед началом полёта (секунды)
    #[serde(default)]
    pub startup_delay: f32,
    /// Радиус попадания (метры)
    pub hit_radius: f32,
}

/// Attack profile архетипа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Минимальный интервал между атаками (секунды)
    pub cooldown: f32,
    /// Длительность визуала атаки (блокирует visual reactions, НЕ cooldown)
    pub visual_duration: f32,
    /// Стартовые характеристики при spawn
    pub base_health: f32,
    pub base_mana: f32,
    pub basic_damage: f32,
    pub projectile: ProjectileProfile,
}

impl AttackProfile {
    fn fighter() -> Self {
        Self {
            cooldown: 0.5,
            visual_duration: 0.35,
            base_health: 100.0,
            base_mana: 100.0,
            basic_damage: 10.0,
            projectile: ProjectileProfile {
                origin_offset: [0.0, 1.2, 0.6],
                range: 12.0,
                speed: 24.0,
                knockback: 0.5,
                piercing: false,
                startup_delay: 0.0,
                hit_radius: 0.6,
            },
        }
    }

    fn mercenary() -> Self {
        Self {
            cooldown: 0.8,
            visual_duration: 0.4,
            base_health: 80.0,
            base_mana: 50.0,
            basic_damage: 8.0,
            projectile: ProjectileProfile {
                origin_offset: [0.0, 1.2, 0.6],
                range: 16.0,
                speed: 20.0,
                knockback: 0.25,
                piercing: false,
                startup_delay: 0.1,
                hit_radius: 0.5,
            },
        }
    }

    fn mob() -> Self {
        Self {
            cooldown: 1.2,
            visual_duration: 0.6,
            base_health: 60.0,
            base_mana: 0.0,
            basic_damage: 6.0,
            projectile: ProjectileProfile {
                origin_offset: [0.0, 1.0, 0.8],
                range: 2.5,
                speed: 12.0,
                knockback: 1.0,
                piercing: false,
                startup_delay: 0.25,
                hit_radius: 0.8,
            },
        }
    }

    fn elite_mob() -> Self {
        Self {
            cooldown: 1.5,
            visual_duration: 0.9,
            base_health: 300.0,
            base_mana: 0.0,
            basic_damage: 15.0,
            projectile: ProjectileProfile {
                origin_offset: [0.0, 1.5, 1.0],
                range: 4.0,
                speed: 10.0,
                knockback: 2.5,
                piercing: true,
                startup_delay: 0.4,
                hit_radius: 1.2,
            },
        }
    }
}

/// Визуальная/policy конфигурация вида эффекта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectStyle {
    /// Flat override цвет на время эффекта
    pub color: Rgba,
    /// Companion объект (аура) на время эффекта
    #[serde(default)]
    pub companion: Option<CompanionKind>,
    /// Не больше одного активного экземпляра на актора
    #[serde(default)]
    pub exclusive: bool,
    /// Стат возвращается к исходному значению после duration
    #[serde(default)]
    pub sustained: bool,
}

/// Навигация: debounce пересчёта grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Окно debounce (секунды)
    pub settle_delay: f32,
    /// Размер ячейки grid (метры)
    pub cell_size: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            settle_delay: 0.3,
            cell_size: 0.5,
        }
    }
}

/// Корневой combat config (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    pub attack_profiles: HashMap<ActorArchetype, AttackProfile>,
    pub effect_styles: HashMap<EffectKind, EffectStyle>,
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Прибавка к max health элиты за каждое подключение (доля от base)
    pub elite_health_per_peer: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        let attack_profiles = HashMap::from([
            (ActorArchetype::Fighter, AttackProfile::fighter()),
            (ActorArchetype::Mercenary, AttackProfile::mercenary()),
            (ActorArchetype::Mob, AttackProfile::mob()),
            (ActorArchetype::EliteMob, AttackProfile::elite_mob()),
        ]);

        let effect_styles = HashMap::from([
            (
                EffectKind::DamageAmplify,
                EffectStyle {
                    color: Rgba::new(1.0, 0.25, 0.2, 1.0),
                    companion: Some(CompanionKind::Aura),
                    exclusive: true,
                    sustained: true,
                },
            ),
            (
                EffectKind::Heal,
                EffectStyle {
                    color: Rgba::new(0.3, 1.0, 0.4, 1.0),
                    companion: None,
                    exclusive: false,
                    sustained: false,
                },
            ),
            (
                EffectKind::ManaRestore,
                EffectStyle {
                    color: Rgba::new(0.3, 0.5, 1.0, 1.0),
                    companion: None,
                    exclusive: false,
                    sustained: false,
                },
            ),
        ]);

        Self {
            attack_profiles,
            effect_styles,
            navigation: NavigationConfig::default(),
            elite_health_per_peer: 0.5,
        }
    }
}

impl CombatConfig {
    /// Парсит RON и валидирует значения
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Загружает embedded `config/combat.ron`
    pub fn load_embedded() -> Result<Self, ConfigError> {
        Self::from_ron_str(EMBEDDED_CONFIG)
    }

    /// Embedded config, при ошибке: default (с логом)
    pub fn load_or_default() -> Self {
        match Self::load_embedded() {
            Ok(config) => config,
            Err(err) => {
                crate::logger::log_error(&format!("⚠️ {}: falling back to defaults", err));
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (archetype, profile) in &self.attack_profiles {
            if profile.cooldown < 0.0 || profile.visual_duration < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{:?}: negative cooldown or visual duration",
                    archetype
                )));
            }
            if profile.projectile.speed <= 0.0 || profile.projectile.range <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{:?}: projectile speed and range must be positive",
                    archetype
                )));
            }
        }

        if self.navigation.settle_delay <= 0.0 || self.navigation.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "navigation settle_delay and cell_size must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Attack profile архетипа (fallback: Fighter defaults)
    pub fn attack_profile(&self, archetype: ActorArchetype) -> AttackProfile {
        self.attack_profiles
            .get(&archetype)
            .cloned()
            .unwrap_or_else(AttackProfile::fighter)
    }

    /// Style вида эффекта (fallback: белый, без companion, не exclusive)
    pub fn effect_style(&self, kind: EffectKind) -> EffectStyle {
        self.effect_styles.get(&kind).cloned().unwrap_or(EffectStyle {
            color: Rgba::WHITE,
            companion: None,
            exclusive: false,
            sustained: kind == EffectKind::DamageAmplify,
        })
    }
}

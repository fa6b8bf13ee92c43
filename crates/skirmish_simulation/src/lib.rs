//! Skirmish Simulation Core
//!
//! Networked action/effect синхронизация на Bevy 0.16 ECS (headless).
//!
//! - combat: cooldown state machine, authority routing атак
//! - projectile: pooled projectiles, flight, hits
//! - effects: timed effects (apply → revert), tint, companions
//! - navigation: debounced rescan navigation grid
//! - net: remote calls, transport seam, session/NetId
//!
//! Рендер, аудио, анимации, pathfinding это внешние collaborators, симуляция
//! только выставляет для них state (Tint, AnimationLock, AttackFeedback).

use bevy::prelude::*;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod effects;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod net;
pub mod projectile;
pub mod schedule;

// Re-export базовых типов для удобства
pub use combat::{AttackFeedback, AttackIntent, AttackRequest, CombatPlugin, DamageDealt, EntityDied};
pub use components::*;
pub use config::CombatConfig;
pub use effects::{EffectKind, EffectRequest, EffectsPlugin};
pub use error::{ConfigError, NetError};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavigationDirty, NavigationPlugin, SectionLoaded};
pub use net::{NetId, NetPlugin, NetSession, SessionRole};
pub use projectile::ProjectilePlugin;

/// Фазы одного fixed tick'а (строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Входящие remote calls
    Receive,
    /// Cooldowns, AI intent, dispatch атак
    Combat,
    /// Полёт projectiles, попадания
    Projectiles,
    /// Смерть акторов
    Death,
    /// Timed effects apply/revert, companions
    Effects,
    /// Debounced navigation rescan
    Navigation,
    /// Отправка `Outbox`
    Send,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// `NetSession` и `CombatConfig` можно вставить до плагина, иначе будут
/// offline сессия и embedded config.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<CombatConfig>() {
            app.insert_resource(CombatConfig::load_or_default());
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Receive,
                SimulationSet::Combat,
                SimulationSet::Projectiles,
                SimulationSet::Death,
                SimulationSet::Effects,
                SimulationSet::Navigation,
                SimulationSet::Send,
            )
                .chain(),
        )
        .add_plugins((
            NetPlugin,
            CombatPlugin,
            ProjectilePlugin,
            EffectsPlugin,
            NavigationPlugin,
        ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(session: NetSession) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(session)
        .add_plugins(SimulationPlugin);

    app
}

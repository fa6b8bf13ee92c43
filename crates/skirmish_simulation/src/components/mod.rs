//! ECS Components для игровых entity
//!
//! - actor: характеристики (health, mana, combat stats, archetype)
//! - spawn: builder актора из конфигурации архетипа

pub mod actor;
pub mod spawn;

// Re-exports для удобного импорта
pub use actor::*;
pub use spawn::ActorSpawn;

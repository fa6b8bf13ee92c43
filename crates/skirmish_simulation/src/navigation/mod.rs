//! Navigation domain: когда пересчитывать AI navigation grid
//!
//! Сам pathfinding (поиск пути, построение grid): внешний collaborator
//! за trait `NavigationGrid`. Здесь только триггеры и debounce:
//! - загрузка секции (`SectionLoaded`)
//! - появление препятствия (`NavObstacle` добавлен)
//!
//! Все триггеры → `NavigationDirty` → `RescanDebouncer` → один scan на окно.

use bevy::prelude::*;

pub mod rescan;

pub use rescan::{
    apply_section_loads, collect_rescan_requests, fire_due_rescans, flag_new_obstacles,
    RescanDebouncer,
};

use crate::config::{CombatConfig, NavigationConfig};

/// Pathfinding collaborator
pub trait NavigationGrid: Send + Sync + 'static {
    /// Перенастроить grid под текущую секцию
    fn configure_grid(&mut self, center: Vec3, size: Vec2, cell_size: f32);

    /// Пересканировать препятствия
    fn scan(&mut self);
}

/// Слот для grid (пустой пока pathfinding не инициализирован)
#[derive(Resource, Default)]
pub struct NavGridSlot(Option<Box<dyn NavigationGrid>>);

impl NavGridSlot {
    pub fn new(grid: impl NavigationGrid) -> Self {
        Self(Some(Box::new(grid)))
    }

    pub fn install(&mut self, grid: impl NavigationGrid) {
        self.0 = Some(Box::new(grid));
    }

    pub fn is_available(&self) -> bool {
        self.0.is_some()
    }

    pub fn grid_mut(&mut self) -> Option<&mut (dyn NavigationGrid + 'static)> {
        self.0.as_deref_mut()
    }
}

/// Текущая активная секция мира (центр + размер по XZ)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ActiveSection {
    pub center: Vec3,
    pub size: Vec2,
}

impl Default for ActiveSection {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec2::splat(32.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyReason {
    SectionLoaded,
    ObstacleSpawned,
}

/// Event: grid устарел
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationDirty {
    pub reason: DirtyReason,
}

/// Event: внешний загрузчик сменил активную секцию
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SectionLoaded {
    pub center: Vec3,
    pub size: Vec2,
}

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        let settle_delay = app
            .world()
            .get_resource::<CombatConfig>()
            .map(|config| config.navigation.settle_delay)
            .unwrap_or_else(|| NavigationConfig::default().settle_delay);

        app.add_event::<NavigationDirty>()
            .add_event::<SectionLoaded>()
            .init_resource::<NavGridSlot>()
            .init_resource::<ActiveSection>()
            .insert_resource(RescanDebouncer::new(settle_delay));

        app.add_systems(
            FixedUpdate,
            (
                apply_section_loads,
                flag_new_obstacles,
                collect_rescan_requests,
                fire_due_rescans,
            )
                .chain()
                .in_set(crate::SimulationSet::Navigation),
        );
    }
}

//! Visual tint model (материалы актора как список цветов)
//!
//! Рендер: внешний collaborator, он читает `Tint::materials`. Эффекты
//! перекрашивают ВСЕ материалы одним flat цветом: по сети уходит один
//! цвет, а не per-material state. Fidelity теряется осознанно.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Linear RGBA цвет
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Цвета материалов актора + snapshot до override
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Tint {
    pub materials: Vec<Rgba>,
    /// Pre-override state (Some пока действует override)
    snapshot: Option<Vec<Rgba>>,
}

impl Tint {
    pub fn new(materials: Vec<Rgba>) -> Self {
        Self {
            materials,
            snapshot: None,
        }
    }

    /// Перекрасить все материалы в `color`
    ///
    /// Snapshot захватывается только при первом override: повторный
    /// (или дублированный сетью) recolor не затирает исходные цвета.
    pub fn apply_flat_override(&mut self, color: Rgba) {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.materials.clone());
        }
        for material in &mut self.materials {
            *material = color;
        }
    }

    /// Вернуть материалы к snapshot'у. false если override не было.
    pub fn restore(&mut self) -> bool {
        match self.snapshot.take() {
            Some(original) => {
                self.materials = original;
                true
            }
            None => false,
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.snapshot.is_some()
    }
}

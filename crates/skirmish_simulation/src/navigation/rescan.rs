//! Debounced navigation grid rescan
//!
//! Окно debounce открывается первым запросом и закрывается через
//! `settle_delay`. Запросы внутри окна ничего не добавляют. Scan читает
//! `ActiveSection` в момент закрытия окна, а не в момент запроса.
//!
//! Grid ещё не инициализирован → весь запрос повторяется через `settle_delay`
//! (один слот retry, повторные запросы его не множат).

use bevy::prelude::*;

use super::{ActiveSection, DirtyReason, NavGridSlot, NavigationDirty, SectionLoaded};
use crate::components::NavObstacle;
use crate::config::CombatConfig;
use crate::logger;

#[derive(Resource, Debug, Clone)]
pub struct RescanDebouncer {
    settle_delay: f32,
    /// Время закрытия текущего окна
    pending_at: Option<f64>,
    /// Время повтора запроса при отсутствии grid
    retry_at: Option<f64>,
    scans_issued: usize,
}

impl RescanDebouncer {
    pub fn new(settle_delay: f32) -> Self {
        Self {
            settle_delay: settle_delay.max(0.0),
            pending_at: None,
            retry_at: None,
            scans_issued: 0,
        }
    }

    pub fn request(&mut self, now: f64, grid_available: bool) {
        if self.pending_at.is_some() {
            return;
        }

        let fire_at = now + f64::from(self.settle_delay);
        if grid_available {
            self.pending_at = Some(fire_at);
        } else if self.retry_at.is_none() {
            self.retry_at = Some(fire_at);
        }
    }

    /// true = пора сканировать (окно закрылось и grid есть)
    pub fn poll(&mut self, now: f64, grid_available: bool) -> bool {
        if self.retry_at.is_some_and(|at| now >= at) {
            self.retry_at = None;
            self.request(now, grid_available);
        }

        match self.pending_at {
            Some(at) if now >= at => {
                self.pending_at = None;
                if grid_available {
                    self.scans_issued += 1;
                    true
                } else {
                    // grid пропал за время окна
                    self.request(now, false);
                    false
                }
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_at.is_some()
    }

    pub fn is_retrying(&self) -> bool {
        self.retry_at.is_some()
    }

    pub fn scans_issued(&self) -> usize {
        self.scans_issued
    }

    pub fn settle_delay(&self) -> f32 {
        self.settle_delay
    }
}

/// System: `SectionLoaded` → `ActiveSection` + dirty
pub fn apply_section_loads(
    mut loads: EventReader<SectionLoaded>,
    mut section: ResMut<ActiveSection>,
    mut dirty: EventWriter<NavigationDirty>,
) {
    for load in loads.read() {
        section.center = load.center;
        section.size = load.size;
        dirty.write(NavigationDirty {
            reason: DirtyReason::SectionLoaded,
        });
    }
}

/// System: новые препятствия помечают grid как устаревший
pub fn flag_new_obstacles(
    obstacles: Query<(), Added<NavObstacle>>,
    mut dirty: EventWriter<NavigationDirty>,
) {
    if !obstacles.is_empty() {
        dirty.write(NavigationDirty {
            reason: DirtyReason::ObstacleSpawned,
        });
    }
}

/// System: dirty events → debouncer
pub fn collect_rescan_requests(
    mut dirty: EventReader<NavigationDirty>,
    mut debouncer: ResMut<RescanDebouncer>,
    slot: Res<NavGridSlot>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    for event in dirty.read() {
        debouncer.request(now, slot.is_available());
        logger::log(&format!("🧭 Navigation dirty: {:?}", event.reason));
    }
}

/// System: закрыть окно debounce и пересканировать
pub fn fire_due_rescans(
    mut debouncer: ResMut<RescanDebouncer>,
    mut slot: ResMut<NavGridSlot>,
    section: Res<ActiveSection>,
    config: Res<CombatConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();
    if !debouncer.poll(now, slot.is_available()) {
        return;
    }

    if let Some(grid) = slot.grid_mut() {
        grid.configure_grid(section.center, section.size, config.navigation.cell_size);
        grid.scan();
        logger::log_info(&format!(
            "🧭 Navigation grid rescanned at {:?} ({}x{})",
            section.center, section.size.x, section.size.y
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_in_window_collapse() {
        let mut debouncer = RescanDebouncer::new(0.25);

        debouncer.request(0.0, true);
        debouncer.request(0.1, true);
        debouncer.request(0.2, true);

        assert!(!debouncer.poll(0.2, true));
        assert!(debouncer.poll(0.25, true));
        assert!(!debouncer.poll(0.5, true));
        assert_eq!(debouncer.scans_issued(), 1);
    }

    #[test]
    fn test_missing_grid_retries_single_slot() {
        let mut debouncer = RescanDebouncer::new(0.25);

        debouncer.request(0.0, false);
        debouncer.request(0.1, false);
        assert!(debouncer.is_retrying());
        assert!(!debouncer.is_pending());

        // retry в 0.25: grid уже есть → новое окно до 0.5
        assert!(!debouncer.poll(0.25, true));
        assert!(debouncer.is_pending());
        assert!(debouncer.poll(0.5, true));
        assert_eq!(debouncer.scans_issued(), 1);
    }

    #[test]
    fn test_grid_lost_during_window_becomes_retry() {
        let mut debouncer = RescanDebouncer::new(0.25);

        debouncer.request(0.0, true);
        assert!(!debouncer.poll(0.25, false));
        assert!(debouncer.is_retrying());

        assert!(!debouncer.poll(0.5, true));
        assert!(debouncer.poll(0.75, true));
    }
}

//! Общие helpers для integration тестов
//!
//! Время двигаем вручную: `Time` + прямой запуск FixedUpdate, без реальных часов.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bevy::prelude::*;
use skirmish_simulation::navigation::NavigationGrid;
use skirmish_simulation::net::{LoopbackTransport, Transport};
use skirmish_simulation::*;

pub const TICK: Duration = Duration::from_millis(100);

/// App со всеми плагинами симуляции, без MinimalPlugins
pub fn test_app(session: NetSession) -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .insert_resource(session)
        .insert_resource(CombatConfig::default())
        .add_plugins(SimulationPlugin);
    app
}

/// Host + client, связанные loopback transport'ом
pub fn linked_pair(duplicate_delivery: bool) -> (App, App) {
    let (host_link, client_link) = LoopbackTransport::pair();
    let host_link = if duplicate_delivery {
        host_link.with_duplicate_delivery()
    } else {
        host_link
    };

    let mut host = test_app(NetSession::host());
    host.insert_resource(Transport::new(host_link));

    let mut client = test_app(NetSession::client(1));
    client.insert_resource(Transport::new(client_link));

    (host, client)
}

pub fn step(app: &mut App, duration: Duration) {
    app.world_mut().resource_mut::<Time>().advance_by(duration);
    app.world_mut().run_schedule(FixedUpdate);
}

pub fn step_n(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        step(app, TICK);
    }
}

/// Один "сетевой" tick: сначала client, потом host
pub fn step_pair(host: &mut App, client: &mut App, ticks: usize) {
    for _ in 0..ticks {
        step(client, TICK);
        step(host, TICK);
    }
}

pub fn spawn_actor(app: &mut App, spawn: ActorSpawn) -> Entity {
    let world = app.world_mut();
    let config = world.resource::<CombatConfig>().clone();
    let session = world.resource::<NetSession>().clone();

    let entity = spawn.spawn(&mut world.commands(), &config, &session);
    world.flush();
    entity
}

/// Fighter (NetId 1) в начале координат + Mob (NetId 2) на 4м впереди
pub fn spawn_duel(app: &mut App) -> (Entity, Entity) {
    let fighter = spawn_actor(app, ActorSpawn::new(ActorArchetype::Fighter).replicated(NetId(1)));
    let mob = spawn_actor(
        app,
        ActorSpawn::new(ActorArchetype::Mob)
            .replicated(NetId(2))
            .at(Transform::from_xyz(0.0, 0.0, -4.0)),
    );
    (fighter, mob)
}

pub fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut().query::<&C>().iter(app.world()).count()
}

pub fn event_count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}

/// Mock pathfinding: записывает configure_grid и scan
#[derive(Clone, Default)]
pub struct RecordingGrid {
    pub configured: Arc<Mutex<Vec<(Vec3, Vec2, f32)>>>,
    pub scans: Arc<Mutex<usize>>,
}

impl RecordingGrid {
    pub fn configured(&self) -> Vec<(Vec3, Vec2, f32)> {
        self.configured.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn scans(&self) -> usize {
        self.scans.lock().map(|s| *s).unwrap_or_default()
    }
}

impl NavigationGrid for RecordingGrid {
    fn configure_grid(&mut self, center: Vec3, size: Vec2, cell_size: f32) {
        if let Ok(mut configured) = self.configured.lock() {
            configured.push((center, size, cell_size));
        }
    }

    fn scan(&mut self) {
        if let Ok(mut scans) = self.scans.lock() {
            *scans += 1;
        }
    }
}

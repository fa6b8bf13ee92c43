//! Headless симуляция Skirmish
//!
//! Host + client в одном процессе через loopback transport:
//! client атакует моба (запрос уходит на host), host баффает своего
//! бойца и пересканирует navigation grid после загрузки секции.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish_simulation::logger::{set_log_level, LogLevel};
use skirmish_simulation::navigation::{NavGridSlot, NavigationGrid};
use skirmish_simulation::net::{LoopbackTransport, Transport};
use skirmish_simulation::{
    create_headless_app, log_info, ActorArchetype, ActorSpawn, AttackRequest, CombatConfig,
    EffectRequest, Health, NetId, NetSession, SectionLoaded,
};

const TICKS: usize = 600;

/// Grid-заглушка: только логирует
struct LoggingGrid;

impl NavigationGrid for LoggingGrid {
    fn configure_grid(&mut self, center: Vec3, size: Vec2, cell_size: f32) {
        log_info(&format!(
            "grid configured: center {:?}, size {}x{}, cell {}",
            center, size.x, size.y, cell_size
        ));
    }

    fn scan(&mut self) {
        log_info("grid scanned");
    }
}

/// Одинаковая сцена на обоих peers (NetId совпадают)
fn spawn_scene(app: &mut App) -> (Entity, Entity) {
    let world = app.world_mut();
    let config = world.resource::<CombatConfig>().clone();
    let session = world.resource::<NetSession>().clone();

    let (fighter, mob) = {
        let mut commands = world.commands();
        let fighter = ActorSpawn::new(ActorArchetype::Fighter)
            .replicated(NetId(1))
            .spawn(&mut commands, &config, &session);
        let mob = ActorSpawn::new(ActorArchetype::Mob)
            .replicated(NetId(2))
            .at(Transform::from_xyz(0.0, 0.0, -4.0))
            .spawn(&mut commands, &config, &session);
        (fighter, mob)
    };
    world.flush();

    (fighter, mob)
}

fn fixed_step(app: &mut App) {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
}

fn main() {
    println!("Starting Skirmish headless simulation (host + client over loopback)");
    // debug от каждого tick'а не нужен
    set_log_level(LogLevel::Info);

    let (host_link, client_link) = LoopbackTransport::pair();

    let mut host = create_headless_app(NetSession::host());
    host.insert_resource(Transport::new(host_link))
        .insert_resource(NavGridSlot::new(LoggingGrid));
    fixed_step(&mut host);

    let mut client = create_headless_app(NetSession::client(1));
    client.insert_resource(Transport::new(client_link));
    fixed_step(&mut client);

    let (host_fighter, host_mob) = spawn_scene(&mut host);
    let (client_fighter, _) = spawn_scene(&mut client);

    host.world_mut().send_event(SectionLoaded {
        center: Vec3::new(0.0, 0.0, -2.0),
        size: Vec2::splat(24.0),
    });
    host.world_mut()
        .send_event(EffectRequest::amplify(host_fighter, 2.0, 5.0));

    for tick in 0..TICKS {
        if tick % 60 == 10 {
            client.world_mut().send_event(AttackRequest {
                actor: client_fighter,
                aim: Vec3::NEG_Z,
            });
        }

        client.update();
        host.update();

        if tick % 100 == 0 {
            let mob_health = host
                .world()
                .get::<Health>(host_mob)
                .map(|h| h.current);
            println!(
                "Tick {}: host entities {}, client entities {}, mob health {:?}",
                tick,
                host.world().entities().len(),
                client.world().entities().len(),
                mob_health
            );
        }
    }

    println!("Simulation complete!");
}

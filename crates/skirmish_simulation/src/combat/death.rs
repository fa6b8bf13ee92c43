//! Смерть акторов (health ≤ 0)

use bevy::prelude::*;

use super::EntityDied;
use crate::components::{Actor, Health};
use crate::logger;
use crate::net::{NetId, NetSession, Outbox, RemoteCall, TargetScope};

/// System: despawn мёртвых акторов
///
/// Решает только сторона с world authority; peers узнают через `Destroy`.
pub fn despawn_dead_actors(
    mut commands: Commands,
    actors: Query<(Entity, &Health, Option<&NetId>), With<Actor>>,
    session: Res<NetSession>,
    mut outbox: ResMut<Outbox>,
    mut died_events: EventWriter<EntityDied>,
) {
    if !session.holds_world_authority() {
        return;
    }

    for (entity, health, net_id) in actors.iter() {
        if health.is_alive() {
            continue;
        }

        logger::log(&format!("💀 {:?} died", entity));
        died_events.write(EntityDied { entity });
        commands.entity(entity).despawn();

        if let Some(object) = net_id {
            outbox.invoke(TargetScope::AllOthers, RemoteCall::Destroy { object: *object });
        }
    }
}

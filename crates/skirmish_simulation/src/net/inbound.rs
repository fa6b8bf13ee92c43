//! Приём и отправка remote calls
//!
//! Любой входящий вызов обрабатывается идемпотентно: доставка at-least-once,
//! дубликаты SpawnCompanion/Destroy/Recolor не должны ничего ломать.
//! Неизвестный NetId: ReplicationMismatch, логируем и пропускаем.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::{resolve_net_id, NetId, NetSession, Outbox, RemoteCall, TargetScope, Transport};
use crate::combat::{AnimationLock, AttackFeedback, AttackRequest};
use crate::effects::{spawn_companion, Companion, EffectRequest, FollowTarget, Tint};
use crate::error::NetError;
use crate::logger;

/// Объекты, созданные/уничтоженные в этом tick'е (Commands ещё не применены)
#[derive(Default)]
struct TickReplication {
    spawned: HashMap<NetId, Entity>,
    destroyed: HashSet<NetId>,
}

impl TickReplication {
    fn lookup(&self, replicated: &Query<(Entity, &NetId)>, id: NetId) -> Result<Entity, NetError> {
        if self.destroyed.contains(&id) {
            return Err(NetError::UnknownNetId(id));
        }
        match self.spawned.get(&id) {
            Some(entity) => Ok(*entity),
            None => resolve_net_id(replicated.iter(), id),
        }
    }
}

/// System: забрать входящие вызовы из transport и применить
#[allow(clippy::too_many_arguments)]
pub fn receive_remote_calls(
    mut commands: Commands,
    transport: Option<ResMut<Transport>>,
    mut session: ResMut<NetSession>,
    mut outbox: ResMut<Outbox>,
    replicated: Query<(Entity, &NetId)>,
    companions: Query<(), With<Companion>>,
    mut tints: Query<&mut Tint>,
    mut attack_requests: EventWriter<AttackRequest>,
    mut effect_requests: EventWriter<EffectRequest>,
    mut feedback_events: EventWriter<AttackFeedback>,
) {
    let Some(mut transport) = transport else {
        return;
    };

    session.connected_peers = transport.0.connected_peers();

    let mut tick = TickReplication::default();

    for payload in transport.0.drain() {
        let call = match RemoteCall::decode(&payload) {
            Ok(call) => call,
            Err(err) => {
                logger::log_error(&format!("Dropping remote call: {}", err));
                continue;
            }
        };

        let result = handle_call(
            &call,
            &mut commands,
            &session,
            &mut outbox,
            &replicated,
            &companions,
            &mut tints,
            &mut tick,
            &mut attack_requests,
            &mut effect_requests,
            &mut feedback_events,
        );

        if let Err(err) = result {
            logger::log_warning(&format!("{} ignored: {}", call.method_name(), err));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_call(
    call: &RemoteCall,
    commands: &mut Commands,
    session: &NetSession,
    outbox: &mut Outbox,
    replicated: &Query<(Entity, &NetId)>,
    companions: &Query<(), With<Companion>>,
    tints: &mut Query<&mut Tint>,
    tick: &mut TickReplication,
    attack_requests: &mut EventWriter<AttackRequest>,
    effect_requests: &mut EventWriter<EffectRequest>,
    feedback_events: &mut EventWriter<AttackFeedback>,
) -> Result<(), NetError> {
    match *call {
        RemoteCall::RequestAttack { actor, aim } => {
            if !session.holds_world_authority() {
                logger::log_warning("RequestAttack received by a non-server peer, ignored");
                return Ok(());
            }
            let actor = tick.lookup(replicated, actor)?;
            attack_requests.write(AttackRequest {
                actor,
                aim: Vec3::from_array(aim),
            });
        }
        RemoteCall::RequestEffect { actor, kind, magnitude, duration } => {
            if !session.holds_world_authority() {
                logger::log_warning("RequestEffect received by a non-server peer, ignored");
                return Ok(());
            }
            let actor = tick.lookup(replicated, actor)?;
            effect_requests.write(EffectRequest {
                actor,
                kind,
                magnitude,
                duration,
            });
        }
        RemoteCall::AttackFeedback { actor, visual_duration } => {
            let actor = tick.lookup(replicated, actor)?;
            commands.entity(actor).try_insert(AnimationLock::new(visual_duration));
            feedback_events.write(AttackFeedback {
                actor,
                replayed: true,
            });
        }
        RemoteCall::Recolor { actor, color } => {
            let actor = tick.lookup(replicated, actor)?;
            if let Ok(mut tint) = tints.get_mut(actor) {
                tint.apply_flat_override(color);
            }
        }
        RemoteCall::RestoreColor { actor } => {
            let actor = tick.lookup(replicated, actor)?;
            if let Ok(mut tint) = tints.get_mut(actor) {
                tint.restore();
            }
        }
        RemoteCall::RequestCompanion { companion, follow, kind } => {
            if !session.holds_world_authority() {
                return Ok(());
            }
            if tick.lookup(replicated, companion).is_ok() {
                // дубликат запроса
                return Ok(());
            }
            let follow_entity = tick.lookup(replicated, follow).ok();
            let entity = spawn_companion(commands, kind, Some(companion), follow_entity);
            tick.spawned.insert(companion, entity);

            outbox.invoke(TargetScope::AllOthers, RemoteCall::SpawnCompanion { companion, kind });
            outbox.invoke(TargetScope::AllOthers, RemoteCall::ParentCompanion { companion, follow });
        }
        RemoteCall::SpawnCompanion { companion, kind } => {
            if tick.lookup(replicated, companion).is_ok() {
                return Ok(());
            }
            let entity = spawn_companion(commands, kind, Some(companion), None);
            tick.spawned.insert(companion, entity);
        }
        RemoteCall::ParentCompanion { companion, follow } => {
            let companion = tick.lookup(replicated, companion)?;
            let follow = tick.lookup(replicated, follow)?;
            commands.entity(companion).try_insert(FollowTarget(follow));
        }
        RemoteCall::RequestDestroy { object } => {
            if !session.holds_world_authority() {
                return Ok(());
            }
            let entity = tick.lookup(replicated, object)?;
            // Client может освобождать только companions, не gameplay акторов
            if !tick.spawned.contains_key(&object) && !companions.contains(entity) {
                logger::log_warning(&format!("RequestDestroy for non-companion {:?}, ignored", object));
                return Ok(());
            }
            commands.entity(entity).try_despawn();
            tick.destroyed.insert(object);
            outbox.invoke(TargetScope::AllOthers, RemoteCall::Destroy { object });
        }
        RemoteCall::Destroy { object } => {
            let entity = tick.lookup(replicated, object)?;
            commands.entity(entity).try_despawn();
            tick.destroyed.insert(object);
        }
    }

    Ok(())
}

/// System: отправить всё накопленное в `Outbox`
///
/// Без transport (offline) очередь просто очищается.
pub fn flush_outbox(mut outbox: ResMut<Outbox>, transport: Option<ResMut<Transport>>) {
    let calls = outbox.take();
    let Some(mut transport) = transport else {
        return;
    };

    for (scope, call) in calls {
        match call.encode() {
            Ok(bytes) => transport.0.send(scope, bytes),
            Err(err) => logger::log_error(&format!("{}: {}", call.method_name(), err)),
        }
    }
}

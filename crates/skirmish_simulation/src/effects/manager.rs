//! TimedEffectManager: apply / revert systems

use bevy::prelude::*;

use super::{
    spawn_companion, ActiveEffects, CompanionRef, EffectApplied, EffectInstanceId, EffectKind,
    EffectRequest, EffectReverted, Tint,
};
use crate::components::{CombatStats, Health, Mana};
use crate::config::CombatConfig;
use crate::logger;
use crate::net::{
    resolve_net_id, Authority, NetId, NetSession, Outbox, RemoteCall, SessionRole, TargetScope,
};
use crate::schedule::DelayQueue;

/// Стат, реально изменённый при apply (для точного revert)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatDelta {
    AttackDamage(f32),
    Health(f32),
    Mana(f32),
}

/// Отложенный revert одного apply
#[derive(Debug, Clone)]
pub struct PendingRevert {
    pub actor: Entity,
    pub instance: EffectInstanceId,
    pub kind: EffectKind,
    pub delta: StatDelta,
    /// Вычитать delta при revert
    pub sustained: bool,
    pub companion: Option<CompanionRef>,
}

/// Resource: id эффектов + очередь revert'ов
#[derive(Resource, Default)]
pub struct TimedEffects {
    next_instance: u64,
    reverts: DelayQueue<PendingRevert>,
}

impl TimedEffects {
    fn next_instance_id(&mut self) -> EffectInstanceId {
        self.next_instance += 1;
        EffectInstanceId(self.next_instance)
    }

    /// Сколько revert'ов ещё ждёт
    pub fn pending(&self) -> usize {
        self.reverts.len()
    }

    pub fn next_revert_at(&self) -> Option<f64> {
        self.reverts.next_fire_at()
    }
}

type EffectTargets = (
    &'static mut CombatStats,
    &'static mut Health,
    &'static mut Mana,
    &'static mut ActiveEffects,
    Option<&'static mut Tint>,
    Option<&'static NetId>,
);

/// Observer не трогает статы реплики: запрос уходит на server
fn forward_effect_request(request: &EffectRequest, net_id: Option<NetId>, outbox: &mut Outbox) {
    match net_id {
        Some(actor) => outbox.invoke(
            TargetScope::Server,
            RemoteCall::RequestEffect {
                actor,
                kind: request.kind,
                magnitude: request.magnitude,
                duration: request.duration,
            },
        ),
        None => logger::log_warning(&format!(
            "Observer actor {:?} has no NetId, effect {:?} dropped",
            request.actor, request.kind
        )),
    }
}

/// System: применить `EffectRequest` (stat сразу, revert в очередь)
///
/// Только на authoritative стороне актора. Актор без `Authority`
/// считается authoritative (offline spawn).
#[allow(clippy::too_many_arguments)]
pub fn apply_effect_requests(
    mut commands: Commands,
    mut requests: EventReader<EffectRequest>,
    mut actors: Query<EffectTargets>,
    roles: Query<&Authority>,
    mut timed: ResMut<TimedEffects>,
    mut session: ResMut<NetSession>,
    mut outbox: ResMut<Outbox>,
    config: Res<CombatConfig>,
    time: Res<Time>,
    mut applied_events: EventWriter<EffectApplied>,
) {
    let now = time.elapsed_secs_f64();

    for request in requests.read() {
        let Ok((mut stats, mut health, mut mana, mut active, tint, net_id)) =
            actors.get_mut(request.actor)
        else {
            logger::log_warning(&format!(
                "Effect {:?} requested for missing actor {:?}, ignored",
                request.kind, request.actor
            ));
            continue;
        };

        if roles
            .get(request.actor)
            .is_ok_and(|authority| !authority.holds_authority())
        {
            forward_effect_request(request, net_id.copied(), &mut outbox);
            continue;
        }

        let style = config.effect_style(request.kind);

        // Exclusive policy: второй экземпляр = тихий no-op
        if style.exclusive && active.has_kind(request.kind) {
            logger::log(&format!(
                "Effect {:?} already active on {:?}, rejected",
                request.kind, request.actor
            ));
            continue;
        }

        let delta = match request.kind {
            EffectKind::DamageAmplify => {
                let before = stats.attack_damage;
                stats.attack_damage *= request.magnitude;
                StatDelta::AttackDamage(stats.attack_damage - before)
            }
            EffectKind::Heal => StatDelta::Health(health.heal(request.magnitude)),
            EffectKind::ManaRestore => StatDelta::Mana(mana.restore(request.magnitude)),
        };

        let instance = timed.next_instance_id();
        active.insert(instance, request.kind);

        let networked = session.is_networked();
        let actor_net_id = net_id.copied();

        let companion = style.companion.map(|kind| match (networked, actor_net_id) {
            (true, Some(follow)) => {
                let companion_id = session.allocate_net_id();
                if session.role == SessionRole::Client {
                    outbox.invoke(
                        TargetScope::Server,
                        RemoteCall::RequestCompanion {
                            companion: companion_id,
                            follow,
                            kind,
                        },
                    );
                } else {
                    spawn_companion(&mut commands, kind, Some(companion_id), Some(request.actor));
                    outbox.invoke(
                        TargetScope::AllOthers,
                        RemoteCall::SpawnCompanion {
                            companion: companion_id,
                            kind,
                        },
                    );
                    outbox.invoke(
                        TargetScope::AllOthers,
                        RemoteCall::ParentCompanion {
                            companion: companion_id,
                            follow,
                        },
                    );
                }
                CompanionRef::Replicated(companion_id)
            }
            _ => CompanionRef::Local(spawn_companion(&mut commands, kind, None, Some(request.actor))),
        });

        if let Some(mut tint) = tint {
            tint.apply_flat_override(style.color);
        }
        // Реплики красим даже если локально у актора нет Tint
        if let (true, Some(actor)) = (networked, actor_net_id) {
            outbox.invoke(
                TargetScope::AllOthers,
                RemoteCall::Recolor {
                    actor,
                    color: style.color,
                },
            );
        }

        timed.reverts.schedule(
            now,
            request.duration,
            PendingRevert {
                actor: request.actor,
                instance,
                kind: request.kind,
                delta,
                sustained: style.sustained,
                companion,
            },
        );

        logger::log(&format!(
            "✨ {:?} ×{} applied to {:?} for {}s ({:?})",
            request.kind, request.magnitude, request.actor, request.duration, delta
        ));

        applied_events.write(EffectApplied {
            actor: request.actor,
            instance,
            kind: request.kind,
        });
    }
}

/// System: revert созревших эффектов
///
/// Companion освобождается ВСЕГДА, даже если актора уже нет.
#[allow(clippy::too_many_arguments)]
pub fn fire_effect_reverts(
    mut commands: Commands,
    mut timed: ResMut<TimedEffects>,
    mut actors: Query<EffectTargets>,
    replicated: Query<(Entity, &NetId)>,
    session: Res<NetSession>,
    mut outbox: ResMut<Outbox>,
    time: Res<Time>,
    mut reverted_events: EventWriter<EffectReverted>,
) {
    let now = time.elapsed_secs_f64();

    for pending in timed.reverts.drain_due(now) {
        let mut stat_restored = false;

        match actors.get_mut(pending.actor) {
            Ok((mut stats, mut health, mut mana, mut active, tint, net_id)) => {
                if active.remove(pending.instance) {
                    if pending.sustained {
                        match pending.delta {
                            StatDelta::AttackDamage(delta) => stats.attack_damage -= delta,
                            StatDelta::Health(delta) => {
                                health.current = (health.current - delta).clamp(0.0, health.max)
                            }
                            StatDelta::Mana(delta) => {
                                mana.current = (mana.current - delta).clamp(0.0, mana.max)
                            }
                        }
                    }
                    stat_restored = true;

                    // Пока висит другой эффект: цвет остаётся его
                    if active.is_empty() {
                        if let Some(mut tint) = tint {
                            tint.restore();
                        }
                        if let (true, Some(actor)) = (session.is_networked(), net_id) {
                            outbox.invoke(TargetScope::AllOthers, RemoteCall::RestoreColor { actor: *actor });
                        }
                    }
                } else {
                    logger::log_warning(&format!(
                        "Effect instance {:?} no longer active on {:?}, stat untouched",
                        pending.instance, pending.actor
                    ));
                }
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Effect {:?} revert: actor {:?} is gone, releasing companion only",
                    pending.kind, pending.actor
                ));
            }
        }

        match pending.companion {
            Some(CompanionRef::Local(entity)) => {
                if let Ok(mut companion) = commands.get_entity(entity) {
                    companion.despawn();
                }
            }
            Some(CompanionRef::Replicated(id)) => {
                if session.holds_world_authority() {
                    if let Ok(entity) = resolve_net_id(replicated.iter(), id) {
                        commands.entity(entity).despawn();
                    }
                    outbox.invoke(TargetScope::AllOthers, RemoteCall::Destroy { object: id });
                } else {
                    outbox.invoke(TargetScope::Server, RemoteCall::RequestDestroy { object: id });
                }
            }
            None => {}
        }

        reverted_events.write(EffectReverted {
            actor: pending.actor,
            instance: pending.instance,
            kind: pending.kind,
            stat_restored,
        });
    }
}

//! Attack dispatch: AttackRequest → AuthorityRole → (simulate | forward)

use bevy::prelude::*;

use super::{AnimationLock, AttackCooldown, AttackFeedback, AttackRequest};
use crate::components::{Actor, CombatStats};
use crate::config::{AttackProfile, CombatConfig};
use crate::logger;
use crate::net::{AttackExecutor, Authoritative, Authority, AuthorityRole, NetId, NetSession, Outbox, RemoteCall, TargetScope};
use crate::projectile::{ProjectileConfig, ProjectilePool};

/// Executor поверх Commands/pool/outbox для одного актора
struct LocalAttackExecutor<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    pool: &'a mut ProjectilePool,
    outbox: &'a mut Outbox,
    networked: bool,
    actor: Entity,
    net_id: Option<NetId>,
    transform: Transform,
    attack_damage: f32,
    cooldown: &'a mut AttackCooldown,
    profile: AttackProfile,
    played_feedback: bool,
}

impl LocalAttackExecutor<'_, '_, '_> {
    /// Точка вылета: offset в local space актора (x вправо, y вверх, z вперёд)
    fn projectile_origin(&self) -> Vec3 {
        let [x, y, z] = self.profile.projectile.origin_offset;
        self.transform.translation + self.transform.rotation * Vec3::new(x, y, -z)
    }
}

impl AttackExecutor for LocalAttackExecutor<'_, '_, '_> {
    fn simulate(&mut self, request: &AttackRequest) -> bool {
        if !self.cooldown.try_begin(self.profile.cooldown) {
            return false;
        }

        self.commands
            .entity(self.actor)
            .try_insert(AnimationLock::new(self.profile.visual_duration));

        let direction = request
            .aim
            .try_normalize()
            .unwrap_or_else(|| *self.transform.forward());
        let origin = self.projectile_origin();
        let projectile = &self.profile.projectile;

        let handle = self
            .pool
            .acquire(self.commands, Transform::from_translation(origin));
        handle
            .configure(ProjectileConfig {
                owner: self.actor,
                damage: self.attack_damage,
                direction,
                speed: projectile.speed,
                range: projectile.range,
                knockback: direction * projectile.knockback,
                piercing: projectile.piercing,
                startup_delay: projectile.startup_delay,
                hit_radius: projectile.hit_radius,
            })
            .launch(self.commands);

        true
    }

    fn broadcast_feedback(&mut self, _request: &AttackRequest) {
        self.played_feedback = true;

        if let (true, Some(actor)) = (self.networked, self.net_id) {
            self.outbox.invoke(
                TargetScope::AllOthers,
                RemoteCall::AttackFeedback {
                    actor,
                    visual_duration: self.profile.visual_duration,
                },
            );
        }
    }

    fn forward_to_authority(&mut self, request: &AttackRequest) {
        match self.net_id {
            Some(actor) => self.outbox.invoke(
                TargetScope::Server,
                RemoteCall::RequestAttack {
                    actor,
                    aim: request.aim.to_array(),
                },
            ),
            None => logger::log_warning(&format!(
                "Observer actor {:?} has no NetId, attack request dropped",
                self.actor
            )),
        }
    }
}

/// System: роутинг атак через роль актора
///
/// Актор без `Authority` считается authoritative (offline spawn).
#[allow(clippy::too_many_arguments)]
pub fn dispatch_attack_requests(
    mut commands: Commands,
    mut requests: EventReader<AttackRequest>,
    mut actors: Query<(
        &Actor,
        Option<&Authority>,
        &Transform,
        &CombatStats,
        &mut AttackCooldown,
        Option<&NetId>,
    )>,
    mut pool: ResMut<ProjectilePool>,
    mut outbox: ResMut<Outbox>,
    session: Res<NetSession>,
    config: Res<CombatConfig>,
    mut feedback_events: EventWriter<AttackFeedback>,
) {
    for request in requests.read() {
        let Ok((actor, authority, transform, stats, mut cooldown, net_id)) =
            actors.get_mut(request.actor)
        else {
            continue;
        };

        let role: &dyn AuthorityRole = match authority {
            Some(authority) => authority.role(),
            None => &Authoritative,
        };

        let mut executor = LocalAttackExecutor {
            commands: &mut commands,
            pool: &mut *pool,
            outbox: &mut *outbox,
            networked: session.is_networked(),
            actor: request.actor,
            net_id: net_id.copied(),
            transform: *transform,
            attack_damage: stats.attack_damage,
            cooldown: &mut *cooldown,
            profile: config.attack_profile(actor.archetype),
            played_feedback: false,
        };

        role.dispatch_attack(request, &mut executor);

        if executor.played_feedback {
            logger::log(&format!(
                "⚔️ {:?} ({:?}) attacks, damage {}",
                request.actor, actor.archetype, stats.attack_damage
            ));
            feedback_events.write(AttackFeedback {
                actor: request.actor,
                replayed: false,
            });
        }
    }
}

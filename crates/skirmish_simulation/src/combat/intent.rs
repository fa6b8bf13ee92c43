//! AI attack intent (мобы и наёмники)

use bevy::prelude::*;

use super::{AttackCooldown, AttackRequest};
use crate::net::Authority;

/// AI решил атаковать цель (выставляется внешним AI слоем)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AttackIntent {
    pub target: Entity,
}

/// System: AttackIntent → AttackRequest когда cooldown готов
///
/// Только там, где у актора authority: observer-реплики моба решений не принимают.
pub fn ai_attack_intent(
    actors: Query<(Entity, &AttackIntent, &Transform, &AttackCooldown, Option<&Authority>)>,
    targets: Query<&Transform>,
    mut requests: EventWriter<AttackRequest>,
) {
    for (entity, intent, transform, cooldown, authority) in actors.iter() {
        if !cooldown.is_ready() {
            continue;
        }
        if authority.is_some_and(|a| !a.holds_authority()) {
            continue;
        }
        let Ok(target) = targets.get(intent.target) else {
            continue;
        };

        requests.write(AttackRequest {
            actor: entity,
            aim: target.translation - transform.translation,
        });
    }
}

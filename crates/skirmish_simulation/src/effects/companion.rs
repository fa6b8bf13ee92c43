//! Companion objects (аура вокруг актора на время эффекта)
//!
//! Чисто cosmetic entity. НЕ child актора: актор может умереть раньше
//! revert'а эффекта, а companion всё равно должен быть явно освобождён
//! (и network-destroyed), поэтому привязка: через `FollowTarget`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::net::NetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum CompanionKind {
    /// Светящаяся аура (damage buff)
    Aura,
    /// Короткая вспышка (heal / mana)
    Sparkle,
}

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Companion {
    pub kind: CompanionKind,
}

/// Companion повторяет позицию этого актора
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FollowTarget(pub Entity);

/// Как эффект держит свой companion (для release при revert)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionRef {
    /// Local instantiate (offline сессия)
    Local(Entity),
    /// Networked instantiate: живёт у server'а, на peers реплики
    Replicated(NetId),
}

/// Spawn companion entity (local или реплика с NetId)
pub fn spawn_companion(
    commands: &mut Commands,
    kind: CompanionKind,
    net_id: Option<NetId>,
    follow: Option<Entity>,
) -> Entity {
    let mut entity = commands.spawn(Companion { kind });
    if let Some(id) = net_id {
        entity.insert(id);
    }
    if let Some(target) = follow {
        entity.insert(FollowTarget(target));
    }
    entity.id()
}

/// System: companion следует за актором
///
/// Если актор исчез: companion остаётся на месте до release (revert эффекта).
pub fn follow_companions(
    mut companions: Query<(&FollowTarget, &mut Transform), With<Companion>>,
    targets: Query<&Transform, Without<Companion>>,
) {
    for (follow, mut transform) in companions.iter_mut() {
        if let Ok(target) = targets.get(follow.0) {
            transform.translation = target.translation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_companion_with_net_id_and_follow() {
        let mut world = World::new();
        let actor = world.spawn(Transform::from_xyz(3.0, 0.0, 1.0)).id();

        let companion = spawn_companion(
            &mut world.commands(),
            CompanionKind::Aura,
            Some(NetId(42)),
            Some(actor),
        );
        world.flush();

        assert_eq!(world.get::<NetId>(companion), Some(&NetId(42)));
        assert_eq!(world.get::<FollowTarget>(companion).map(|f| f.0), Some(actor));
        assert!(world.get::<Transform>(companion).is_some());
    }

    #[test]
    fn test_follow_moves_companion() {
        let mut world = World::new();
        let actor = world.spawn(Transform::from_xyz(3.0, 0.0, 1.0)).id();
        let companion = world
            .spawn((Companion { kind: CompanionKind::Aura }, FollowTarget(actor)))
            .id();

        let mut schedule = bevy::ecs::schedule::Schedule::default();
        schedule.add_systems(follow_companions);
        schedule.run(&mut world);

        let position = world.get::<Transform>(companion).map(|t| t.translation);
        assert_eq!(position, Some(Vec3::new(3.0, 0.0, 1.0)));
    }
}

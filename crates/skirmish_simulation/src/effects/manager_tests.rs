//! Tests for timed effect apply/revert systems.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::components::{Actor, CombatStats, Health};
    use crate::config::CombatConfig;
    use crate::effects::{
        ActiveEffects, Companion, EffectKind, EffectRequest, EffectReverted, EffectsPlugin, Rgba,
        Tint, TimedEffects,
    };
    use crate::net::{Authority, NetId, NetSession, Outbox, RemoteCall, TargetScope};

    fn effects_app(session: NetSession) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(session)
            .init_resource::<Outbox>()
            .insert_resource(CombatConfig::default())
            .add_plugins(EffectsPlugin);
        app
    }

    fn step(app: &mut App, millis: u64) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(millis));
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn spawn_fighter(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Actor::default(),
                CombatStats::new(10.0),
                Tint::new(vec![Rgba::new(0.5, 0.5, 0.5, 1.0)]),
            ))
            .id()
    }

    fn companions(app: &mut App) -> usize {
        app.world_mut()
            .query::<&Companion>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_amplify_revert_is_identity() {
        let mut app = effects_app(NetSession::offline());
        let actor = spawn_fighter(&mut app);

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 1.0));
        step(&mut app, 0);

        assert_eq!(app.world().get::<CombatStats>(actor).map(|s| s.attack_damage), Some(20.0));
        assert_eq!(companions(&mut app), 1);
        assert!(app.world().get::<Tint>(actor).is_some_and(|t| t.is_overridden()));

        for _ in 0..10 {
            step(&mut app, 100);
        }

        assert_eq!(app.world().get::<CombatStats>(actor).map(|s| s.attack_damage), Some(10.0));
        assert_eq!(companions(&mut app), 0);
        assert!(app.world().get::<Tint>(actor).is_some_and(|t| !t.is_overridden()));
        assert_eq!(app.world().resource::<TimedEffects>().pending(), 0);
    }

    #[test]
    fn test_exclusive_amplify_rejects_second() {
        let mut app = effects_app(NetSession::offline());
        let actor = spawn_fighter(&mut app);

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 1.0));
        step(&mut app, 0);
        let first_revert = app.world().resource::<TimedEffects>().next_revert_at();
        assert!(first_revert.is_some());

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 1.0));
        step(&mut app, 100);

        assert_eq!(app.world().get::<CombatStats>(actor).map(|s| s.attack_damage), Some(20.0));
        assert_eq!(app.world().resource::<TimedEffects>().pending(), 1);
        // второй запрос отклонён, revert не сдвинулся
        assert_eq!(app.world().resource::<TimedEffects>().next_revert_at(), first_revert);
    }

    #[test]
    fn test_heal_is_not_reverted() {
        let mut app = effects_app(NetSession::offline());
        let actor = spawn_fighter(&mut app);
        if let Some(mut health) = app.world_mut().get_mut::<Health>(actor) {
            health.take_damage(50.0);
        }

        app.world_mut().send_event(EffectRequest::heal(actor, 30.0, 0.5));
        step(&mut app, 0);
        for _ in 0..5 {
            step(&mut app, 100);
        }

        assert_eq!(app.world().get::<Health>(actor).map(|h| h.current), Some(80.0));
        assert!(app.world().get::<ActiveEffects>(actor).is_some_and(|a| a.is_empty()));
    }

    #[test]
    fn test_destroyed_actor_still_releases_companion() {
        let mut app = effects_app(NetSession::offline());
        let actor = spawn_fighter(&mut app);

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 0.5));
        step(&mut app, 0);
        assert_eq!(companions(&mut app), 1);

        app.world_mut().despawn(actor);
        for _ in 0..5 {
            step(&mut app, 100);
        }

        assert_eq!(companions(&mut app), 0);
        let events = app.world().resource::<Events<EffectReverted>>();
        let reverted: Vec<_> = events.iter_current_update_events().collect();
        assert_eq!(reverted.len(), 1);
        assert!(!reverted[0].stat_restored);
        assert_eq!(reverted[0].kind, EffectKind::DamageAmplify);
    }

    #[test]
    fn test_networked_host_replicates_companion_and_color() {
        let mut session = NetSession::host();
        session.connected_peers = 1;
        let mut app = effects_app(session);
        let actor = spawn_fighter(&mut app);
        app.world_mut().entity_mut(actor).insert(NetId(1));

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 0.25));
        step(&mut app, 0);

        let sent: Vec<&str> = app
            .world()
            .resource::<Outbox>()
            .queued()
            .iter()
            .map(|(_, call)| call.method_name())
            .collect();
        assert_eq!(sent, vec!["SpawnCompanion", "ParentCompanion", "Recolor"]);

        app.world_mut().resource_mut::<Outbox>().take();
        for _ in 0..3 {
            step(&mut app, 100);
        }

        let calls: Vec<RemoteCall> = app
            .world_mut()
            .resource_mut::<Outbox>()
            .take()
            .into_iter()
            .map(|(_, call)| call)
            .collect();
        assert!(calls.contains(&RemoteCall::RestoreColor { actor: NetId(1) }));
        assert!(calls.iter().any(|c| matches!(c, RemoteCall::Destroy { .. })));
        assert_eq!(companions(&mut app), 0);
    }

    #[test]
    fn test_untinted_actor_still_replicates_color() {
        let mut session = NetSession::host();
        session.connected_peers = 1;
        let mut app = effects_app(session);
        let actor = app
            .world_mut()
            .spawn((Actor::default(), CombatStats::new(10.0), NetId(5)))
            .id();

        app.world_mut().send_event(EffectRequest::heal(actor, 10.0, 0.25));
        step(&mut app, 0);

        let sent: Vec<RemoteCall> = app
            .world_mut()
            .resource_mut::<Outbox>()
            .take()
            .into_iter()
            .map(|(_, call)| call)
            .collect();
        assert!(sent.iter().any(|c| matches!(c, RemoteCall::Recolor { actor: NetId(5), .. })));

        for _ in 0..3 {
            step(&mut app, 100);
        }

        let restored = app.world_mut().resource_mut::<Outbox>().take();
        assert!(restored
            .iter()
            .any(|(_, call)| *call == RemoteCall::RestoreColor { actor: NetId(5) }));
    }

    #[test]
    fn test_observer_forwards_effect_without_touching_stats() {
        let mut session = NetSession::client(1);
        session.connected_peers = 1;
        let mut app = effects_app(session);
        let actor = spawn_fighter(&mut app);
        app.world_mut()
            .entity_mut(actor)
            .insert((NetId(1), Authority::observer()));
        if let Some(mut health) = app.world_mut().get_mut::<Health>(actor) {
            health.take_damage(50.0);
        }

        app.world_mut().send_event(EffectRequest::amplify(actor, 2.0, 5.0));
        app.world_mut().send_event(EffectRequest::heal(actor, 30.0, 0.5));
        step(&mut app, 0);

        assert_eq!(app.world().get::<CombatStats>(actor).map(|s| s.attack_damage), Some(10.0));
        assert_eq!(app.world().get::<Health>(actor).map(|h| h.current), Some(50.0));
        assert!(app.world().get::<Tint>(actor).is_some_and(|t| !t.is_overridden()));
        assert_eq!(companions(&mut app), 0);
        assert_eq!(app.world().resource::<TimedEffects>().pending(), 0);

        let sent = app.world_mut().resource_mut::<Outbox>().take();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(scope, call)| {
            *scope == TargetScope::Server && call.method_name() == "RequestEffect"
        }));
        assert_eq!(
            sent[0].1,
            RemoteCall::RequestEffect {
                actor: NetId(1),
                kind: EffectKind::DamageAmplify,
                magnitude: 2.0,
                duration: 5.0,
            }
        );
    }
}

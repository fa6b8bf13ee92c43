//! Tests for projectile flight and hit resolution.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::combat::DamageDealt;
    use crate::components::{Actor, Health};
    use crate::projectile::flight::horizontal_segment_distance;
    use crate::projectile::{Projectile, ProjectileConfig, ProjectileHit, ProjectilePlugin, ProjectilePool};

    fn flight_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_event::<DamageDealt>()
            .add_plugins(ProjectilePlugin);
        app
    }

    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn shot(owner: Entity) -> ProjectileConfig {
        ProjectileConfig {
            owner,
            damage: 10.0,
            direction: Vec3::NEG_Z,
            speed: 10.0,
            range: 5.0,
            knockback: Vec3::new(0.0, 0.0, -0.5),
            piercing: false,
            startup_delay: 0.0,
            hit_radius: 0.5,
        }
    }

    fn launch(app: &mut App, config: ProjectileConfig) -> Entity {
        app.world_mut()
            .resource_scope(|world, mut pool: Mut<ProjectilePool>| {
                let handle = pool.acquire(&mut world.commands(), Transform::from_xyz(0.0, 1.2, 0.0));
                let entity = handle.configure(config).launch(&mut world.commands());
                world.flush();
                entity
            })
    }

    fn spawn_target(app: &mut App, z: f32) -> Entity {
        app.world_mut()
            .spawn((Actor::default(), Transform::from_xyz(0.0, 0.0, z)))
            .id()
    }

    fn health(app: &App, entity: Entity) -> Option<f32> {
        app.world().get::<Health>(entity).map(|h| h.current)
    }

    #[test]
    fn test_segment_distance_ignores_height() {
        let (t, distance) = horizontal_segment_distance(
            Vec3::new(0.3, 5.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, -2.0),
        );

        assert!((t - 0.5).abs() < 1e-5);
        assert!((distance - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_hit_damages_knocks_back_and_releases() {
        let mut app = flight_app();
        let owner = spawn_target(&mut app, 0.0);
        let target = spawn_target(&mut app, -3.0);
        let projectile = launch(&mut app, shot(owner));

        for _ in 0..4 {
            step(&mut app);
        }

        assert_eq!(health(&app, target), Some(90.0));
        assert_eq!(health(&app, owner), Some(100.0));
        assert_eq!(
            app.world().get::<Transform>(target).map(|t| t.translation.z),
            Some(-3.5)
        );
        assert_eq!(app.world().get::<Projectile>(projectile), Some(&Projectile::Inactive));

        let pool = app.world().resource::<ProjectilePool>();
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.checked_out(), 0);

        let hits = app.world().resource::<Events<ProjectileHit>>();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_piercing_hits_each_target_once() {
        let mut app = flight_app();
        let owner = spawn_target(&mut app, 0.0);
        let first = spawn_target(&mut app, -2.0);
        let second = spawn_target(&mut app, -4.0);

        let mut config = shot(owner);
        config.piercing = true;
        config.knockback = Vec3::ZERO;
        launch(&mut app, config);

        for _ in 0..6 {
            step(&mut app);
        }

        assert_eq!(health(&app, first), Some(90.0));
        assert_eq!(health(&app, second), Some(90.0));
        assert_eq!(app.world().resource::<ProjectilePool>().available(), 1);
    }

    #[test]
    fn test_miss_expires_at_range() {
        let mut app = flight_app();
        let owner = spawn_target(&mut app, 0.0);
        let bystander = spawn_target(&mut app, 10.0);
        launch(&mut app, shot(owner));

        for _ in 0..4 {
            step(&mut app);
        }
        assert_eq!(app.world().resource::<ProjectilePool>().checked_out(), 1);

        step(&mut app);
        step(&mut app);

        assert_eq!(app.world().resource::<ProjectilePool>().checked_out(), 0);
        assert_eq!(health(&app, bystander), Some(100.0));
    }

    #[test]
    fn test_startup_delay_holds_projectile() {
        let mut app = flight_app();
        let owner = spawn_target(&mut app, 0.0);
        let mut config = shot(owner);
        config.startup_delay = 0.25;
        let projectile = launch(&mut app, config);

        step(&mut app);
        step(&mut app);
        assert_eq!(
            app.world().get::<Transform>(projectile).map(|t| t.translation.z),
            Some(0.0)
        );

        step(&mut app);
        let z = app
            .world()
            .get::<Transform>(projectile)
            .map(|t| t.translation.z)
            .unwrap_or_default();
        assert!((z + 0.5).abs() < 1e-4, "z = {}", z);
    }
}

//! Projectile flight + hit resolution
//!
//! Попадание: горизонтальное (XZ) расстояние от цели до отрезка, пройденного
//! за tick, не больше `hit_radius`. Высоту игнорируем, актор считается вертикальной
//! капсулой, а projectile вылетает с уровня груди.

use bevy::prelude::*;

use super::{Projectile, ProjectileHit, ProjectilePool};
use crate::combat::DamageDealt;
use crate::components::{Actor, Health};

/// (параметр вдоль отрезка 0..1, расстояние) от точки до отрезка в плоскости XZ
pub fn horizontal_segment_distance(point: Vec3, start: Vec3, end: Vec3) -> (f32, f32) {
    let p = Vec2::new(point.x, point.z);
    let a = Vec2::new(start.x, start.z);
    let ab = Vec2::new(end.x, end.z) - a;

    let length_sq = ab.length_squared();
    let t = if length_sq > f32::EPSILON {
        ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (t, p.distance(a + ab * t))
}

/// System: движение projectiles, попадания, expiry → release
pub fn advance_projectiles(
    mut commands: Commands,
    mut pool: ResMut<ProjectilePool>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform), Without<Actor>>,
    mut targets: Query<(Entity, &mut Health, &mut Transform), (With<Actor>, Without<Projectile>)>,
    time: Res<Time>,
    mut hit_events: EventWriter<ProjectileHit>,
    mut damage_events: EventWriter<DamageDealt>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        let Projectile::InFlight(flight) = &mut *projectile else {
            continue;
        };

        // Start-up delay съедает часть tick'а
        let mut moving_time = delta;
        if flight.startup_remaining > 0.0 {
            flight.startup_remaining -= delta;
            if flight.startup_remaining > 0.0 {
                continue;
            }
            moving_time = -flight.startup_remaining;
            flight.startup_remaining = 0.0;
        }

        let config = &flight.config;
        let step = (config.speed * moving_time).min(config.range - flight.traveled).max(0.0);
        let start = transform.translation;
        let end = start + config.direction * step;

        let mut candidates: Vec<(f32, Entity)> = targets
            .iter()
            .filter(|(target, health, _)| {
                *target != config.owner && health.is_alive() && !flight.struck.contains(target)
            })
            .filter_map(|(target, _, target_transform)| {
                let (t, distance) =
                    horizontal_segment_distance(target_transform.translation, start, end);
                (distance <= config.hit_radius).then_some((t, target))
            })
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        if !config.piercing {
            candidates.truncate(1);
        }

        let mut stopped_at = None;
        for (t, target) in candidates {
            let Ok((_, mut health, mut target_transform)) = targets.get_mut(target) else {
                continue;
            };

            health.take_damage(config.damage);
            target_transform.translation += config.knockback;

            hit_events.write(ProjectileHit {
                projectile: entity,
                owner: config.owner,
                target,
                damage: config.damage,
            });
            damage_events.write(DamageDealt {
                attacker: config.owner,
                target,
                damage: config.damage,
                target_died: !health.is_alive(),
            });

            flight.struck.push(target);
            if !config.piercing {
                stopped_at = Some(start.lerp(end, t));
            }
        }

        if let Some(hit_point) = stopped_at {
            transform.translation = hit_point;
            pool.release(&mut commands, entity);
            continue;
        }

        transform.translation = end;
        flight.traveled += step;
        if flight.traveled >= config.range {
            pool.release(&mut commands, entity);
        }
    }
}

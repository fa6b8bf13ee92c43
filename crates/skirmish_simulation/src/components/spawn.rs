//! Spawn акторов из конфигурации архетипа
//!
//! Роль authority выбирается ЗДЕСЬ и только здесь: server/offline
//! симулирует всех акторов, client: наблюдатель для всех.

use bevy::prelude::*;

use super::{Actor, ActorArchetype, CombatStats, Health, Mana};
use crate::config::CombatConfig;
use crate::effects::{Rgba, Tint};
use crate::net::{Authority, NetId, NetSession};

/// Builder для spawn актора
#[derive(Debug)]
pub struct ActorSpawn {
    archetype: ActorArchetype,
    transform: Transform,
    net_id: Option<NetId>,
    authority: Option<Authority>,
    materials: Vec<Rgba>,
}

impl ActorSpawn {
    pub fn new(archetype: ActorArchetype) -> Self {
        Self {
            archetype,
            transform: Transform::IDENTITY,
            net_id: None,
            authority: None,
            materials: vec![Rgba::WHITE],
        }
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Актор реплицируется (одинаковый NetId на всех peers)
    pub fn replicated(mut self, net_id: NetId) -> Self {
        self.net_id = Some(net_id);
        self
    }

    /// Явная роль вместо выбранной по сессии
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_materials(mut self, materials: Vec<Rgba>) -> Self {
        self.materials = materials;
        self
    }

    /// Max health: элита скейлится от числа подключений
    pub fn max_health(archetype: ActorArchetype, config: &CombatConfig, session: &NetSession) -> f32 {
        let base = config.attack_profile(archetype).base_health;
        match archetype {
            ActorArchetype::EliteMob => {
                base * (1.0 + config.elite_health_per_peer * session.connected_peers as f32)
            }
            _ => base,
        }
    }

    pub fn spawn(self, commands: &mut Commands, config: &CombatConfig, session: &NetSession) -> Entity {
        let profile = config.attack_profile(self.archetype);
        let authority = self.authority.unwrap_or_else(|| {
            if session.holds_world_authority() {
                Authority::authoritative()
            } else {
                Authority::observer()
            }
        });

        let mut entity = commands.spawn((
            Actor {
                archetype: self.archetype,
            },
            self.transform,
            Health::new(Self::max_health(self.archetype, config, session)),
            Mana::new(profile.base_mana),
            CombatStats::new(profile.basic_damage),
            Tint::new(self.materials),
            authority,
        ));
        if let Some(net_id) = self.net_id {
            entity.insert(net_id);
        }

        entity.id()
    }
}

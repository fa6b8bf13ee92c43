//! Session state: роль процесса, число подключений, NetId реплицируемых объектов

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::NetError;

/// Стабильный идентификатор реплицируемого объекта (одинаковый на всех peers)
///
/// Scene actors получают NetId при загрузке секции (малые числа),
/// runtime объекты (companions): из `NetSession::allocate_net_id`
/// (старшие 32 бита: 1 у host/offline, slot + 2 у client'а, коллизий нет).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct NetId(pub u64);

/// Роль процесса в сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SessionRole {
    /// Одиночная игра (нет peers)
    #[default]
    Offline,
    /// Host = authoritative server + локальный игрок
    Host,
    /// Client = observer для чужих акторов
    Client,
}

/// Session resource
#[derive(Resource, Debug, Clone, Default)]
pub struct NetSession {
    pub role: SessionRole,
    /// Количество подключённых peers (обновляется из transport каждый tick)
    pub connected_peers: usize,
    peer_slot: u32,
    next_object: u32,
}

impl NetSession {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn host() -> Self {
        Self {
            role: SessionRole::Host,
            ..Self::default()
        }
    }

    /// `peer_slot`: уникальный номер клиента (выдаётся host'ом при connect).
    /// Любой slot, включая 0, не пересекается с id host'а.
    pub fn client(peer_slot: u32) -> Self {
        Self {
            role: SessionRole::Client,
            peer_slot,
            ..Self::default()
        }
    }

    /// Есть ли вообще с кем синхронизироваться
    ///
    /// Networked instantiate/destroy и recolor broadcast: только если true,
    /// иначе local variant.
    pub fn is_networked(&self) -> bool {
        matches!(self.role, SessionRole::Host | SessionRole::Client) && self.connected_peers > 0
    }

    /// Процесс authoritative для мира (смерть акторов, spawn companions)
    pub fn holds_world_authority(&self) -> bool {
        matches!(self.role, SessionRole::Offline | SessionRole::Host)
    }

    /// Префикс runtime NetId: 1 зарезервирован за host/offline
    fn id_prefix(&self) -> u64 {
        match self.role {
            SessionRole::Client => u64::from(self.peer_slot) + 2,
            SessionRole::Host | SessionRole::Offline => 1,
        }
    }

    pub fn allocate_net_id(&mut self) -> NetId {
        self.next_object = self.next_object.wrapping_add(1);
        NetId(self.id_prefix() << 32 | u64::from(self.next_object))
    }
}

/// Найти локальную entity по NetId (линейный поиск, объектов немного)
pub fn resolve_net_id<'a>(
    replicated: impl IntoIterator<Item = (Entity, &'a NetId)>,
    id: NetId,
) -> Result<Entity, NetError> {
    replicated
        .into_iter()
        .find_map(|(entity, net_id)| (*net_id == id).then_some(entity))
        .ok_or(NetError::UnknownNetId(id))
}

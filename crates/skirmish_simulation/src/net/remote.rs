//! Remote calls (call-by-name поверх transport)
//!
//! Каждый вариант `RemoteCall` = один remote method. По каналу идут ТОЛЬКО:
//! - attack requests (observer → server)
//! - cosmetic notifications (feedback, recolor, restore)
//! - replicated object lifecycle (companion spawn/parent/destroy)
//!
//! Health/mana мутации по каналу не ходят никогда: at-least-once доставка
//! дала бы двойной heal. Всё что приходит по каналу: идемпотентно на приёме.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::NetId;
use crate::effects::{CompanionKind, EffectKind, Rgba};
use crate::error::NetError;

/// Кому адресован вызов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetScope {
    /// Все peers кроме отправителя
    AllOthers,
    /// Authoritative server
    Server,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RemoteCall {
    /// Observer просит server выполнить атаку актора
    RequestAttack { actor: NetId, aim: [f32; 3] },
    /// Observer просит server применить timed эффект к актору
    /// (едет сам запрос, не изменение стата)
    RequestEffect { actor: NetId, kind: EffectKind, magnitude: f32, duration: f32 },
    /// Server → observers: проиграть визуал/звук атаки
    AttackFeedback { actor: NetId, visual_duration: f32 },
    /// Flat override цвета всех материалов актора
    Recolor { actor: NetId, color: Rgba },
    /// Вернуть материалы актора к snapshot'у
    RestoreColor { actor: NetId },
    /// Client → server: создать companion (server реплицирует)
    RequestCompanion { companion: NetId, follow: NetId, kind: CompanionKind },
    /// Server → peers: создать реплику companion
    SpawnCompanion { companion: NetId, kind: CompanionKind },
    /// Привязать companion к актору
    ParentCompanion { companion: NetId, follow: NetId },
    /// Client → server: уничтожить реплицируемый объект
    RequestDestroy { object: NetId },
    /// Server → peers: объект уничтожен
    Destroy { object: NetId },
}

impl RemoteCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            RemoteCall::RequestAttack { .. } => "RequestAttack",
            RemoteCall::RequestEffect { .. } => "RequestEffect",
            RemoteCall::AttackFeedback { .. } => "AttackFeedback",
            RemoteCall::Recolor { .. } => "Recolor",
            RemoteCall::RestoreColor { .. } => "RestoreColor",
            RemoteCall::RequestCompanion { .. } => "RequestCompanion",
            RemoteCall::SpawnCompanion { .. } => "SpawnCompanion",
            RemoteCall::ParentCompanion { .. } => "ParentCompanion",
            RemoteCall::RequestDestroy { .. } => "RequestDestroy",
            RemoteCall::Destroy { .. } => "Destroy",
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, NetError> {
        bincode::serialize(self).map_err(NetError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, NetError> {
        bincode::deserialize(bytes).map_err(NetError::Decode)
    }
}

/// Исходящие вызовы текущего tick'а
///
/// Системы только складывают вызовы сюда, отправка: в `flush_outbox`
/// в конце FixedUpdate (один writer на transport).
#[derive(Resource, Debug, Default)]
pub struct Outbox {
    queued: Vec<(TargetScope, RemoteCall)>,
}

impl Outbox {
    pub fn invoke(&mut self, scope: TargetScope, call: RemoteCall) {
        self.queued.push((scope, call));
    }

    pub fn take(&mut self) -> Vec<(TargetScope, RemoteCall)> {
        std::mem::take(&mut self.queued)
    }

    pub fn queued(&self) -> &[(TargetScope, RemoteCall)] {
        &self.queued
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip_keeps_color() {
        let call = RemoteCall::Recolor {
            actor: NetId(7),
            color: Rgba::new(1.0, 0.25, 0.2, 1.0),
        };

        let bytes = call.encode().expect("encode");
        assert_eq!(RemoteCall::decode(&bytes).expect("decode"), call);
    }

    #[test]
    fn test_truncated_payload_is_decode_error() {
        let bytes = RemoteCall::Destroy { object: NetId(3) }.encode().expect("encode");

        let result = RemoteCall::decode(&bytes[..2]);
        assert!(matches!(result, Err(NetError::Decode(_))));
    }

    #[test]
    fn test_outbox_take_drains() {
        let mut outbox = Outbox::default();
        outbox.invoke(TargetScope::Server, RemoteCall::RequestDestroy { object: NetId(1) });
        outbox.invoke(TargetScope::AllOthers, RemoteCall::Destroy { object: NetId(1) });

        let taken = outbox.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].1.method_name(), "RequestDestroy");
        assert!(outbox.is_empty());
    }
}

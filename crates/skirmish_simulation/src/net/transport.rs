//! Transport seam + in-process loopback
//!
//! Реальный сетевой transport: внешний collaborator. Симуляции нужно только:
//! отправить bytes в scope, забрать входящие, узнать число подключений.
//! `LoopbackTransport::pair()` связывает host и client в одном процессе
//! (headless demo, integration tests).

use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::remote::TargetScope;
use super::session::SessionRole;

pub trait RemoteTransport: Send + Sync + 'static {
    /// Fire-and-forget отправка (нет ack, нет timeout)
    fn send(&mut self, scope: TargetScope, payload: Vec<u8>);

    /// Забрать всё что пришло с прошлого tick'а
    fn drain(&mut self) -> Vec<Vec<u8>>;

    fn connected_peers(&self) -> usize;
}

/// Активный transport процесса (отсутствует в offline сессии)
#[derive(Resource)]
pub struct Transport(pub Box<dyn RemoteTransport>);

impl Transport {
    pub fn new(transport: impl RemoteTransport) -> Self {
        Self(Box::new(transport))
    }
}

type Wire = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// Один конец in-process линка host ↔ client
pub struct LoopbackTransport {
    role: SessionRole,
    outgoing: Wire,
    incoming: Wire,
    link_up: Arc<AtomicBool>,
    duplicate_delivery: bool,
}

impl LoopbackTransport {
    /// (host end, client end)
    pub fn pair() -> (Self, Self) {
        let to_client: Wire = Arc::default();
        let to_host: Wire = Arc::default();
        let link_up = Arc::new(AtomicBool::new(true));

        let host = Self {
            role: SessionRole::Host,
            outgoing: to_client.clone(),
            incoming: to_host.clone(),
            link_up: link_up.clone(),
            duplicate_delivery: false,
        };
        let client = Self {
            role: SessionRole::Client,
            outgoing: to_host,
            incoming: to_client,
            link_up,
            duplicate_delivery: false,
        };
        (host, client)
    }

    /// At-least-once: каждое сообщение доставляется дважды
    pub fn with_duplicate_delivery(mut self) -> Self {
        self.duplicate_delivery = true;
        self
    }

    /// Рвёт линк для обоих концов
    pub fn disconnect(&self) {
        self.link_up.store(false, Ordering::SeqCst);
    }

    fn push(&self, payload: Vec<u8>) {
        let mut queue = self
            .outgoing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.duplicate_delivery {
            queue.push_back(payload.clone());
        }
        queue.push_back(payload);
    }
}

impl RemoteTransport for LoopbackTransport {
    fn send(&mut self, scope: TargetScope, payload: Vec<u8>) {
        if !self.link_up.load(Ordering::SeqCst) {
            return;
        }

        // Единственный другой peer: противоположный конец линка.
        // Host сам является server'ом: Server-scoped вызов host'а никуда не уходит.
        match (self.role, scope) {
            (SessionRole::Host, TargetScope::Server) => {
                crate::logger::log_warning("Loopback: host sent a Server-scoped call, dropped");
            }
            _ => self.push(payload),
        }
    }

    fn drain(&mut self) -> Vec<Vec<u8>> {
        let mut queue = self
            .incoming
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.drain(..).collect()
    }

    fn connected_peers(&self) -> usize {
        usize::from(self.link_up.load(Ordering::SeqCst))
    }
}

//! Authority routing (кто симулирует атаку актора)
//!
//! Роль выбирается ОДИН раз при spawn актора и инжектится компонентом
//! `Authority`. Вызывающий код никогда не проверяет "я server или client",
//! он просто зовёт `dispatch_attack`, а роль решает что делать.
//!
//! Инвариант: для каждого актора ровно один процесс вычисляет gameplay
//! outcomes (projectile, damage, knockback). Observer только форвардит
//! запрос и проигрывает cosmetic feedback.

use bevy::prelude::*;

use crate::combat::AttackRequest;

/// Исполнитель атаки: то, что роль может попросить сделать
///
/// Реализуется системой `dispatch_attack_requests` поверх своих
/// Commands/pool/outbox; в тестах: mock.
pub trait AttackExecutor {
    /// Cooldown gate + projectile acquire/configure/launch.
    /// false = policy reject (cooldown), ничего не произошло.
    fn simulate(&mut self, request: &AttackRequest) -> bool;

    /// Проиграть feedback локально и разослать observers
    fn broadcast_feedback(&mut self, request: &AttackRequest);

    /// Переслать сырой запрос authoritative peer'у
    fn forward_to_authority(&mut self, request: &AttackRequest);
}

pub trait AuthorityRole: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn holds_authority(&self) -> bool;

    fn dispatch_attack(&self, request: &AttackRequest, executor: &mut dyn AttackExecutor);
}

/// Локальный процесс authoritative для актора
#[derive(Debug, Clone, Copy, Default)]
pub struct Authoritative;

impl AuthorityRole for Authoritative {
    fn name(&self) -> &'static str {
        "authoritative"
    }

    fn holds_authority(&self) -> bool {
        true
    }

    fn dispatch_attack(&self, request: &AttackRequest, executor: &mut dyn AttackExecutor) {
        if executor.simulate(request) {
            executor.broadcast_feedback(request);
        }
    }
}

/// Локальный процесс только наблюдает актора
#[derive(Debug, Clone, Copy, Default)]
pub struct Observer;

impl AuthorityRole for Observer {
    fn name(&self) -> &'static str {
        "observer"
    }

    fn holds_authority(&self) -> bool {
        false
    }

    fn dispatch_attack(&self, request: &AttackRequest, executor: &mut dyn AttackExecutor) {
        executor.forward_to_authority(request);
    }
}

/// Инжектированная роль актора
#[derive(Component)]
pub struct Authority(Box<dyn AuthorityRole>);

impl Authority {
    pub fn new(role: impl AuthorityRole) -> Self {
        Self(Box::new(role))
    }

    pub fn authoritative() -> Self {
        Self::new(Authoritative)
    }

    pub fn observer() -> Self {
        Self::new(Observer)
    }

    pub fn role(&self) -> &dyn AuthorityRole {
        self.0.as_ref()
    }

    pub fn holds_authority(&self) -> bool {
        self.0.holds_authority()
    }
}

impl std::fmt::Debug for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Authority").field(&self.0.name()).finish()
    }
}

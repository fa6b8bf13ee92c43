//! Networking domain: authority routing, remote calls, replicated objects
//!
//! Transport: внешний collaborator (trait `RemoteTransport`). Симуляция
//! общается с ним только через `Outbox` (исходящие) и `receive_remote_calls`
//! (входящие), обе точки: в начале/конце FixedUpdate.

use bevy::prelude::*;

pub mod authority;
pub mod inbound;
pub mod remote;
pub mod session;
pub mod transport;

pub use authority::{AttackExecutor, Authoritative, Authority, AuthorityRole, Observer};
pub use inbound::{flush_outbox, receive_remote_calls};
pub use remote::{Outbox, RemoteCall, TargetScope};
pub use session::{resolve_net_id, NetId, NetSession, SessionRole};
pub use transport::{LoopbackTransport, RemoteTransport, Transport};

pub struct NetPlugin;

impl Plugin for NetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NetSession>()
            .init_resource::<Outbox>()
            .register_type::<NetId>();

        app.add_systems(FixedUpdate, receive_remote_calls.in_set(crate::SimulationSet::Receive))
            .add_systems(FixedUpdate, flush_outbox.in_set(crate::SimulationSet::Send));
    }
}

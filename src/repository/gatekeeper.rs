use async_trait::async_trait;

use crate::gatekeeper::Gatekeeper;
use crate::id::GatekeeperId;
use crate::AuthError;

/// Single-slot storage for the device's gatekeeper.
///
/// The gatekeeper record is the only shared mutable resource in the
/// subsystem; callers must serialize their load-check-act-save sequences
/// (see [`IdentityService`](crate::IdentityService)).
#[async_trait]
pub trait SingleGatekeeperRepository: Send + Sync {
    /// Generates an id for a new gatekeeper.
    async fn next_id(&self) -> Result<GatekeeperId, AuthError>;

    /// Persists the gatekeeper, replacing any previous record.
    async fn save(&self, gatekeeper: Gatekeeper) -> Result<(), AuthError>;

    /// The stored gatekeeper, if the slot has been provisioned.
    async fn gatekeeper(&self) -> Result<Option<Gatekeeper>, AuthError>;
}

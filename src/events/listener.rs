use async_trait::async_trait;

use super::AuthEvent;

/// Trait for handling authentication events asynchronously.
///
/// Implement this to observe authentication activity: audit trails, security
/// alerting on repeated failures, metrics.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use keygate::events::{AuthEvent, Listener};
///
/// struct LockoutAlert;
///
/// #[async_trait]
/// impl Listener for LockoutAlert {
///     async fn handle(&self, event: &AuthEvent) {
///         if let AuthEvent::AuthenticationFailed { failed_attempt_count, .. } = event {
///             // raise an alert once the count climbs
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handles an authentication event.
    ///
    /// Called for every event dispatched; filter by matching on the variant.
    async fn handle(&self, event: &AuthEvent);
}

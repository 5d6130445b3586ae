//! Biometric authentication capability.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthError;

/// Device biometry (fingerprint / face recognition) behind a narrow contract.
///
/// Concrete implementations talk to the platform sensor and may suspend on a
/// user prompt; from the gatekeeper's point of view the outcome is a plain
/// boolean. A dismissed prompt surfaces as `Ok(false)`.
#[async_trait]
pub trait BiometricAuthenticationService: Send + Sync {
    /// Enrolls biometric authentication for the device user.
    ///
    /// Called once during registration.
    ///
    /// # Errors
    ///
    /// Returns `BiometryUnavailable` if the device has no usable sensor.
    async fn activate(&self) -> Result<(), AuthError>;

    /// Prompts the user and reports whether the check succeeded.
    ///
    /// # Errors
    ///
    /// Returns `BiometryUnavailable` if the sensor cannot be used at all;
    /// a prompt the user dismissed or failed is `Ok(false)`, not an error.
    async fn authenticate(&self) -> Result<bool, AuthError>;
}

/// Scripted biometry for tests and sensorless environments.
#[derive(Clone, Default)]
pub struct MockBiometricService {
    available: Arc<AtomicBool>,
    approves: Arc<AtomicBool>,
    activated: Arc<AtomicBool>,
    prompt_count: Arc<AtomicUsize>,
}

impl MockBiometricService {
    /// A sensor that enrolls fine and approves every prompt.
    #[must_use]
    pub fn approving() -> Self {
        let service = Self::default();
        service.available.store(true, Ordering::SeqCst);
        service.approves.store(true, Ordering::SeqCst);
        service
    }

    /// A sensor that enrolls fine but rejects every prompt.
    #[must_use]
    pub fn denying() -> Self {
        let service = Self::default();
        service.available.store(true, Ordering::SeqCst);
        service
    }

    /// A device with no usable sensor.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Whether `activate` has been called.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::SeqCst)
    }

    /// How many prompts have been shown.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompt_count.load(Ordering::SeqCst)
    }

    /// Flips the scripted prompt outcome.
    pub fn set_approves(&self, approves: bool) {
        self.approves.store(approves, Ordering::SeqCst);
    }
}

#[async_trait]
impl BiometricAuthenticationService for MockBiometricService {
    async fn activate(&self) -> Result<(), AuthError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AuthError::BiometryUnavailable);
        }
        self.activated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn authenticate(&self) -> Result<bool, AuthError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AuthError::BiometryUnavailable);
        }
        self.prompt_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.approves.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_approving_service() {
        let service = MockBiometricService::approving();

        service.activate().await.unwrap();
        assert!(service.is_activated());
        assert!(service.authenticate().await.unwrap());
        assert_eq!(service.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_denying_service_rejects_prompt() {
        let service = MockBiometricService::denying();

        service.activate().await.unwrap();
        assert!(!service.authenticate().await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_sensor_errors() {
        let service = MockBiometricService::unavailable();

        assert_eq!(service.activate().await, Err(AuthError::BiometryUnavailable));
        assert_eq!(
            service.authenticate().await,
            Err(AuthError::BiometryUnavailable)
        );
        assert!(!service.is_activated());
    }

    #[tokio::test]
    async fn test_outcome_can_be_rescripted() {
        let service = MockBiometricService::denying();
        assert!(!service.authenticate().await.unwrap());

        service.set_approves(true);
        assert!(service.authenticate().await.unwrap());
        assert_eq!(service.prompt_count(), 2);
    }
}

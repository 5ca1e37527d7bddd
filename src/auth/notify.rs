// Out-of-band delivery of reset token plaintext
//
// The auth service only produces the plaintext and hands it off; transport
// (email, SMS) lives behind this trait.

use async_trait::async_trait;
use std::fmt;

/// Delivery failure from the notification channel
#[derive(Debug)]
pub struct NotifyError(pub String);

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification delivery failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Channel that delivers a reset token plaintext to the account holder
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn deliver(&self, email: &str, reset_token: &str) -> Result<(), NotifyError>;
}

/// Development notifier: records that a token was issued without ever
/// writing the secret to the log
pub struct LogNotifier;

#[async_trait]
impl ResetNotifier for LogNotifier {
    async fn deliver(&self, email: &str, _reset_token: &str) -> Result<(), NotifyError> {
        tracing::info!("Password reset token issued for {}", email);
        Ok(())
    }
}

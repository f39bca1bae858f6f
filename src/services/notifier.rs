//! Reservation confirmation delivery.
//!
//! Delivery is fire-and-forget: dispatch happens on a spawned task after the
//! reservation has committed, and a failed send is logged at warn and
//! dropped. Nothing here can undo an admission.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::ReservationId;

/// Error raised by a notification backend.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Confirmation sink invoked after a reservation commits.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn send_confirmation(
        &self,
        email: &str,
        reservation_id: ReservationId,
    ) -> Result<(), NotifyError>;
}

/// SMTP-backed notifier.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    /// Build a notifier against an SMTP relay.
    pub fn new(
        host: &str,
        username: String,
        password: String,
        from: String,
    ) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            .credentials(Credentials::new(username, password))
            .build();
        Ok(Self { transport, from })
    }

    /// Build from `SMTP_HOST`/`SMTP_USERNAME`/`SMTP_PASSWORD`/`SMTP_FROM`.
    ///
    /// Returns `None` when `SMTP_HOST` is unset, in which case the caller
    /// falls back to the logging notifier.
    pub fn from_env() -> Result<Option<Self>, NotifyError> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };
        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("SMTP_PASSWORD").unwrap_or_default();
        let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@parking.com".to_string());
        Self::new(&host, username, password, from).map(Some)
    }
}

#[async_trait]
impl ReservationNotifier for SmtpNotifier {
    async fn send_confirmation(
        &self,
        email: &str,
        reservation_id: ReservationId,
    ) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(email.parse()?)
            .subject("Reservation Confirmation")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your reservation has been confirmed. Reservation ID: {}. Thank you for booking with us!",
                reservation_id
            ))?;

        self.transport.send(message).await?;
        info!("Reservation confirmation email sent to {}", email);
        Ok(())
    }
}

/// Notifier that only logs; used when SMTP is unconfigured and in tests.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl ReservationNotifier for LogNotifier {
    async fn send_confirmation(
        &self,
        email: &str,
        reservation_id: ReservationId,
    ) -> Result<(), NotifyError> {
        info!(
            "Reservation {} confirmed for {} (mail delivery disabled)",
            reservation_id, email
        );
        Ok(())
    }
}

/// Spawn the confirmation send without awaiting it.
///
/// The admission response never waits on delivery; failures are recorded
/// and discarded.
pub fn dispatch_confirmation(
    notifier: Arc<dyn ReservationNotifier>,
    email: String,
    reservation_id: ReservationId,
) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send_confirmation(&email, reservation_id).await {
            warn!("Failed to send confirmation email to {}: {}", email, e);
        }
    });
}

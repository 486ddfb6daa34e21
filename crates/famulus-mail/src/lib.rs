// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP submission adapter for the Famulus chat agent.
//!
//! Implements [`MailService`] over lettre's async STARTTLS transport. The
//! From header carries the configured account address with the display
//! name the composer collected; the user's own address goes into
//! Reply-To. Submission is fire-and-forget: one attempt, no retry, the
//! dialog layer turns a failure into its fixed reply.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use famulus_config::model::MailConfig;
use famulus_core::types::{AdapterType, HealthStatus, MailMessage};
use famulus_core::{FamulusError, MailService, PluginAdapter};

/// lettre-backed implementation of [`MailService`].
///
/// With no credentials configured, construction succeeds but every send
/// returns a service error.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<Address>,
}

impl SmtpMailer {
    /// Creates the adapter from configuration.
    pub fn new(config: &MailConfig) -> Result<Self, FamulusError> {
        let (transport, from_address) = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let transport =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                        .map_err(|e| FamulusError::Service {
                            message: format!("failed to build SMTP transport: {e}"),
                            source: Some(Box::new(e)),
                        })?
                        .port(config.smtp_port)
                        .credentials(Credentials::new(username.clone(), password.clone()))
                        .build();
                let from_address =
                    username
                        .parse::<Address>()
                        .map_err(|e| FamulusError::Config(format!(
                            "mail username is not a valid address: {e}"
                        )))?;
                (Some(transport), Some(from_address))
            }
            _ => (None, None),
        };

        Ok(Self {
            transport,
            from_address,
        })
    }
}

#[async_trait]
impl PluginAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Service
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        // No SMTP round trip; relays throttle repeated probes.
        match self.transport {
            Some(_) => Ok(HealthStatus::Healthy),
            None => Ok(HealthStatus::Degraded("no SMTP credentials configured".into())),
        }
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        debug!("mail adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl MailService for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), FamulusError> {
        let (transport, from_address) = match (&self.transport, &self.from_address) {
            (Some(t), Some(f)) => (t, f),
            _ => return Err(FamulusError::service("SMTP credentials not configured")),
        };

        let email = build_message(message, from_address.clone())?;
        transport
            .send(email)
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("SMTP submission failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(subject = %message.subject, "mail submitted");
        Ok(())
    }
}

/// Assembles the RFC 5322 message from a composed draft.
fn build_message(message: &MailMessage, from_address: Address) -> Result<Message, FamulusError> {
    let from = Mailbox::new(Some(message.from_name.clone()), from_address);
    let to: Mailbox = message.to.parse().map_err(|e| FamulusError::Service {
        message: format!("invalid recipient address: {e}"),
        source: None,
    })?;
    let reply_to: Mailbox = message.reply_to.parse().map_err(|e| FamulusError::Service {
        message: format!("invalid reply-to address: {e}"),
        source: None,
    })?;

    Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| FamulusError::Service {
            message: format!("failed to assemble mail message: {e}"),
            source: Some(Box::new(e)),
        })
}

/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::SHOP_NAME;
use super::types::Cli;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

/// Customer notification mail. Without SMTP configuration every message is
/// only written to the log.
pub struct EmailService {
    transport: Option<SmtpTransport>,
    from_address: String,
    from_name: String,
}

impl EmailService {
    pub fn disabled(cli: &Cli) -> Self {
        Self {
            transport: None,
            from_address: String::new(),
            from_name: cli.email_from_name.clone(),
        }
    }

    pub async fn new(cli: &Cli) -> Result<Self> {
        if !cli.email_enabled {
            return Ok(Self::disabled(cli));
        }

        let smtp_host = cli
            .email_smtp_host
            .as_ref()
            .context("SMTP host is required when email is enabled")?;

        let smtp_username = cli
            .email_smtp_username
            .as_ref()
            .context("SMTP username is required when email is enabled")?;

        let smtp_password_file = cli
            .email_smtp_password_file
            .as_ref()
            .context("SMTP password file is required when email is enabled")?;

        let from_address = cli
            .email_from_address
            .as_ref()
            .context("From address is required when email is enabled")?;

        let smtp_password = fs::read_to_string(smtp_password_file)
            .await
            .context("Failed to read SMTP password file")?
            .trim()
            .to_string();

        let credentials = Credentials::new(smtp_username.clone(), smtp_password);

        let transport = if cli.email_disable_tls {
            SmtpTransport::builder_dangerous(smtp_host)
                .credentials(credentials)
                .port(cli.email_smtp_port)
                .build()
        } else {
            SmtpTransport::relay(smtp_host)
                .context("Failed to create SMTP transport")?
                .credentials(credentials)
                .port(cli.email_smtp_port)
                .build()
        };

        Ok(Self {
            transport: Some(transport),
            from_address: from_address.clone(),
            from_name: cli.email_from_name.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub fn order_approval_email(to_email: &str, to_name: &str, order_id: Uuid) -> OutgoingEmail {
        let short_id = short_order_id(order_id);

        OutgoingEmail {
            to_email: to_email.to_string(),
            to_name: to_name.to_string(),
            subject: format!("Order #{} Approved - {}", short_id, SHOP_NAME),
            body: format!(
                "Hello {},\n\nYour order #{} has been approved and is being prepared. \
                 We will let you know as soon as it is ready for pickup.\n\n{}",
                to_name, short_id, SHOP_NAME
            ),
        }
    }

    pub async fn send_order_approval_email(
        &self,
        to_email: &str,
        to_name: &str,
        order_id: Uuid,
    ) -> Result<()> {
        self.send(Self::order_approval_email(to_email, to_name, order_id))
            .await
    }

    pub async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let Some(transport) = self.transport.as_ref() else {
            info!(
                to = %email.to_email,
                subject = %email.subject,
                "Email delivery disabled, message not sent"
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, self.from_address)
                    .parse()
                    .context("Invalid from address")?,
            )
            .to(format!("{} <{}>", email.to_name, email.to_email)
                .parse()
                .context("Invalid to address")?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .context("Failed to build email")?;

        transport.send(&message).context("Failed to send email")?;

        info!("Email sent to {}", email.to_email);
        Ok(())
    }
}

/// First eight hex digits of the order id, as shown to customers.
pub fn short_order_id(order_id: Uuid) -> String {
    order_id.simple().to_string()[..8].to_uppercase()
}

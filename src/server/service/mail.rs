//! Outgoing email for password resets and the contact form.
//!
//! Mail goes through an SMTP relay configured from the environment. Without SMTP settings
//! the mailer still renders every message but only logs that it was skipped, so the
//! surrounding request succeeds on development setups.

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::server::{config::SmtpConfig, error::AppError};

/// Port on which the relay expects implicit TLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Colour scheme of the HTML emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTheme {
    Light,
    Dark,
}

impl MailTheme {
    /// `"dark"` selects the dark scheme, anything else the light one.
    pub fn from_request(theme: Option<&str>) -> Self {
        match theme {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    fn pick<'a>(self, light: &'a str, dark: &'a str) -> &'a str {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

/// Contact form submission after validation and sanitizing.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub theme: MailTheme,
}

#[derive(Clone)]
struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

#[derive(Clone)]
pub struct Mailer {
    relay: Option<SmtpRelay>,
    frontend_origin: String,
}

impl Mailer {
    /// Builds the mailer.
    ///
    /// # Arguments
    /// - `smtp` - Relay settings, `None` disables delivery
    /// - `frontend_origin` - Base URL used in links sent to users
    ///
    /// # Returns
    /// - `Ok(Mailer)` - Ready mailer
    /// - `Err(AppError::MailErr)` - Relay host could not be set up
    /// - `Err(AppError::MailAddressErr)` - Sender address is invalid
    pub fn new(smtp: Option<&SmtpConfig>, frontend_origin: String) -> Result<Self, AppError> {
        let Some(smtp) = smtp else {
            tracing::warn!("SMTP is not configured; outgoing email will be skipped");
            return Ok(Self::disabled(frontend_origin));
        };

        let builder = if smtp.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
        };
        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        Ok(Self {
            relay: Some(SmtpRelay {
                transport,
                from: smtp.from.parse()?,
            }),
            frontend_origin,
        })
    }

    /// Mailer that never delivers anything.
    pub fn disabled(frontend_origin: String) -> Self {
        Self {
            relay: None,
            frontend_origin,
        }
    }

    /// Link a user follows to pick a new password.
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/resetPassword/{}",
            self.frontend_origin.trim_end_matches('/'),
            token
        )
    }

    /// Sends the password reset email.
    pub async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        theme: MailTheme,
    ) -> Result<(), AppError> {
        let html = reset_template(&self.reset_link(token), theme);

        self.send(None, to, "Password Reset Request", html).await
    }

    /// Forwards a contact form submission to the team mailbox and acknowledges the sender.
    pub async fn send_contact(&self, contact: &ContactMessage) -> Result<(), AppError> {
        let Some(relay) = &self.relay else {
            tracing::warn!("Skipping contact form email from {}: SMTP disabled", contact.email);
            return Ok(());
        };
        let team_address = relay.from.email.to_string();

        self.send(
            Some("Task Management System"),
            &team_address,
            "New Contact Us Form Submission",
            contact_admin_template(contact),
        )
        .await?;
        self.send(
            Some("Task Management Team"),
            &contact.email,
            "We Received Your Message - Task Management",
            contact_ack_template(contact),
        )
        .await
    }

    async fn send(
        &self,
        sender_name: Option<&str>,
        to: &str,
        subject: &str,
        html: String,
    ) -> Result<(), AppError> {
        let Some(relay) = &self.relay else {
            tracing::warn!("Skipping email '{}' to {}: SMTP disabled", subject, to);
            return Ok(());
        };

        let from = match sender_name {
            Some(name) => Mailbox::new(Some(name.to_string()), relay.from.email.clone()),
            None => relay.from.clone(),
        };
        let message = Message::builder()
            .from(from)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        relay.transport.send(message).await?;
        tracing::info!("Sent email '{}' to {}", subject, to);

        Ok(())
    }
}

fn reset_template(link: &str, theme: MailTheme) -> String {
    format!(
        r#"<div style="background-color: {bg}; color: {fg}; padding: 20px; font-family: Arial, sans-serif;">
  <h2 style="color: {title};">Password Reset Request</h2>
  <p>You are receiving this email because you (or someone else) have requested to reset your password.</p>
  <p>Please click the button below to complete the process:</p>
  <div style="margin: 20px 0;">
    <a href="{link}" style="background-color: {button}; color: white; text-decoration: none; padding: 10px 20px; border-radius: 5px; font-size: 16px; display: inline-block;">Reset Password</a>
  </div>
  <p>If you did not request this, please ignore this email. Your password will remain unchanged.</p>
  <p style="margin-top: 20px; font-size: 12px; color: {muted};">This link will expire in 10 minutes.</p>
</div>"#,
        bg = theme.pick("#ffffff", "#1a1a1a"),
        fg = theme.pick("#333333", "#f5f5f5"),
        title = theme.pick("#000000", "#ffffff"),
        button = theme.pick("#007bff", "#444"),
        muted = theme.pick("#666", "#bbb"),
    )
}

fn contact_admin_template(contact: &ContactMessage) -> String {
    let theme = contact.theme;
    format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; background: {bg}; color: {fg};">
  <h2 style="color: {title};">New Contact Form Submission</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Message:</strong> {message}</p>
  <hr style="border-color: {rule};" />
  <p style="font-size: 12px; color: {muted};">This message was received from the Contact Us form on your website.</p>
</div>"#,
        bg = theme.pick("#fff", "#222"),
        fg = theme.pick("#333", "#f1f1f1"),
        title = theme.pick("#007bff", "#17a2b8"),
        rule = theme.pick("#ccc", "#444"),
        muted = theme.pick("gray", "#bbb"),
        name = contact.name,
        email = contact.email,
        message = contact.message,
    )
}

fn contact_ack_template(contact: &ContactMessage) -> String {
    let theme = contact.theme;
    format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; background: {bg}; color: {fg};">
  <h2 style="color: {title};">Thank You for Contacting Us, {name}!</h2>
  <p>We have received your message and our team will get back to you as soon as possible.</p>
  <p><strong>Your Message:</strong></p>
  <blockquote style="border-left: 4px solid {quote}; padding-left: 10px; color: {quoted};">{message}</blockquote>
  <p>We appreciate your time and will contact you soon.</p>
  <p style="font-size: 12px; color: {muted};">This is an automated message, please do not reply.</p>
</div>"#,
        bg = theme.pick("#fff", "#222"),
        fg = theme.pick("#333", "#f1f1f1"),
        title = theme.pick("#007bff", "#28a745"),
        quote = theme.pick("#007bff", "#17a2b8"),
        quoted = theme.pick("#555", "#ccc"),
        muted = theme.pick("gray", "#bbb"),
        name = contact.name,
        message = contact.message,
    )
}

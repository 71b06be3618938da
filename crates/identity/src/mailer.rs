//! SMTP delivery of post-verification confirmation emails.

use {
    async_trait::async_trait,
    lettre::{
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        message::Mailbox,
        transport::smtp::authentication::Credentials,
    },
    secrecy::{ExposeSecret, Secret},
    tracing::info,
};

use crate::{
    error::{Error, Result},
    record::NotificationChannel,
};

/// SMTP connection settings for the confirmation mailer.
#[derive(Debug, Clone)]
pub struct SmtpOptions {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<Secret<String>>,
    /// Sender address, e.g. `no-reply@vouch.local`.
    pub from: String,
    /// Product name used in the subject and body.
    pub app_name: String,
}

/// Sends transactional confirmation emails over STARTTLS SMTP.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    app_name: String,
}

impl SmtpNotifier {
    pub fn new(opts: SmtpOptions) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&opts.host)
            .map_err(|e| Error::delivery("smtp transport", e))?
            .port(opts.port);
        if let (Some(username), Some(password)) = (&opts.username, &opts.password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().clone(),
            ));
        }
        let from: Mailbox = opts
            .from
            .parse()
            .map_err(|e| Error::delivery("sender address", e))?;
        Ok(Self {
            transport: builder.build(),
            from,
            app_name: opts.app_name,
        })
    }
}

/// Body of the account-verification confirmation email.
fn confirmation_body(app_name: &str, user_name: &str) -> String {
    format!(
        "Hello {user_name},\n\n\
         Your identity has been successfully verified on {app_name} via WhatsApp.\n\n\
         If you did not initiate this verification, please contact support immediately.\n\n\
         Best regards,\n\
         The {app_name} Team"
    )
}

#[async_trait]
impl NotificationChannel for SmtpNotifier {
    async fn send_confirmation(&self, to_email: &str, user_name: &str) -> Result<()> {
        let to: Mailbox = to_email
            .parse()
            .map_err(|e| Error::delivery("recipient address", e))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!(
                "WhatsApp Verification Confirmed - {}",
                self.app_name
            ))
            .body(confirmation_body(&self.app_name, user_name))
            .map_err(|e| Error::delivery("build message", e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::delivery("smtp send", e))?;
        info!(to = to_email, "confirmation email sent");
        Ok(())
    }
}

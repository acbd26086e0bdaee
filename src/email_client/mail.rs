use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{EmailClient, Result};
use crate::web::types::ValidEmail;

const WELCOME_SUBJECT: &str = "Welcome to The Punjab Chronicle!";
const WELCOME_TEXT: &str =
    "Thank you for subscribing to The Punjab Chronicle! We'll notify you when we launch.";
const WELCOME_HTML: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #4a5568;">Welcome to The Punjab Chronicle!</h2>
  <p>Thank you for subscribing to our newsletter. You'll be among the first to know when we launch our Punjabi news and Web TV platform.</p>
  <p>Stay tuned for updates!</p>
  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #e2e8f0; color: #718096; font-size: 14px;">
    <p>The Punjab Chronicle Team</p>
  </div>
</div>"#;

/// Something that sends a single email.
#[async_trait]
pub trait TransactionalMailer: Send + Sync {
    async fn send_message(&self, message: &WelcomeMessage) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeMessage {
    pub to: ValidEmail,
    /// Has to be a sender identity verified with the provider.
    pub from: ValidEmail,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl WelcomeMessage {
    pub fn new(from: ValidEmail, to: ValidEmail) -> Self {
        Self {
            to,
            from,
            subject: WELCOME_SUBJECT.to_string(),
            text: WELCOME_TEXT.to_string(),
            html: WELCOME_HTML.to_string(),
        }
    }

    fn payload(&self) -> MailSendBody<'_> {
        MailSendBody {
            personalizations: [Personalization {
                to: [Address {
                    email: self.to.as_ref(),
                }],
            }],
            from: Address {
                email: self.from.as_ref(),
            },
            subject: &self.subject,
            content: [
                Content {
                    kind: "text/plain",
                    value: &self.text,
                },
                Content {
                    kind: "text/html",
                    value: &self.html,
                },
            ],
        }
    }
}

#[async_trait]
impl TransactionalMailer for EmailClient {
    #[tracing::instrument(name = "Sending welcome email", skip_all)]
    async fn send_message(&self, message: &WelcomeMessage) -> Result<()> {
        let url = self.endpoint("v3/mail/send")?;
        let body = message.payload();

        self.execute(self.http_client.post(url).json(&body)).await?;

        debug!("{:<12} - welcome email sent", "MAIL");
        Ok(())
    }
}

// ###################################
// ->   PAYLOAD
// ###################################
#[derive(Serialize)]
struct MailSendBody<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

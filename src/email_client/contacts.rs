use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use super::{EmailClient, Result};
use crate::web::types::ValidEmail;

/// Something that keeps a list of marketing contacts, keyed by email.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Inserts the contact, or updates it if the email is already on the list.
    async fn upsert_contact(&self, record: &ContactRecord) -> Result<()>;
}

/// A contact as it is sent to the directory, created fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub email: ValidEmail,
    pub source: String,
    pub signup_date: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(email: ValidEmail, source: impl Into<String>, signup_date: DateTime<Utc>) -> Self {
        Self {
            email,
            source: source.into(),
            signup_date,
        }
    }

    /// The signup date in ISO-8601 with millisecond precision, e.g. `2025-01-01T12:00:00.000Z`.
    pub fn signup_date_iso(&self) -> String {
        self.signup_date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn payload(&self) -> UpsertContactsBody<'_> {
        UpsertContactsBody {
            contacts: [ContactEntry {
                email: self.email.as_ref(),
                custom_fields: CustomFields {
                    source: &self.source,
                    signup_date: self.signup_date_iso(),
                },
            }],
        }
    }
}

#[async_trait]
impl ContactDirectory for EmailClient {
    #[tracing::instrument(name = "Upserting SendGrid contact", skip_all)]
    async fn upsert_contact(&self, record: &ContactRecord) -> Result<()> {
        let url = self.endpoint("v3/marketing/contacts")?;
        let body = record.payload();

        self.execute(self.http_client.put(url).json(&body)).await?;

        debug!("{:<12} - contact upserted", "CONTACTS");
        Ok(())
    }
}

// ###################################
// ->   PAYLOAD
// ###################################
#[derive(Serialize)]
struct UpsertContactsBody<'a> {
    contacts: [ContactEntry<'a>; 1],
}

#[derive(Serialize)]
struct ContactEntry<'a> {
    email: &'a str,
    custom_fields: CustomFields<'a>,
}

#[derive(Serialize)]
struct CustomFields<'a> {
    source: &'a str,
    signup_date: String,
}

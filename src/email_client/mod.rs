//! The SendGrid v3 client and the two capabilities the subscribe handler needs from it:
//! a `ContactDirectory` to upsert marketing contacts and a `TransactionalMailer` to send single emails.

mod contacts;
mod mail;

pub use contacts::{ContactDirectory, ContactRecord};
pub use mail::{TransactionalMailer, WelcomeMessage};

use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct EmailClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    api_key: SecretString,
}

impl EmailClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(EmailClient {
            http_client,
            url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        self.url
            .join(path)
            .map_err(|e| Error::UrlParsing(e.to_string()))
    }

    /// Authenticates and sends the request. Any non-2xx response becomes `Error::UpstreamStatus`
    /// carrying the body SendGrid returned, so it can be logged.
    async fn execute(&self, request: RequestBuilder) -> Result<()> {
        let resp = request
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, derive_more::From)]
pub enum Error {
    UrlParsing(String),
    UpstreamStatus {
        status: u16,
        body: String,
    },
    #[from]
    Reqwest(reqwest::Error),
}
// Error Boilerplate
impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

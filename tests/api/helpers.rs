//! Spawns the server on a random port with fake or wiremock-backed upstreams.
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use signup_relay::{
    email_client::{self, ContactDirectory, ContactRecord, TransactionalMailer, WelcomeMessage},
    web::types::ValidEmail,
    App, AppState, EmailClient,
};
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const CONTACT_SOURCE: &str = "Test Landing Page";
pub const SENDER: &str = "news@example.com";

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

// ###################################
// ->   FAKES
// ###################################
fn upstream_error() -> email_client::Error {
    email_client::Error::UpstreamStatus {
        status: 500,
        body: "simulated failure".to_string(),
    }
}

/// Records every upserted contact, optionally failing each call.
#[derive(Default)]
pub struct FakeDirectory {
    pub fail: bool,
    pub calls: Mutex<Vec<ContactRecord>>,
}

#[async_trait]
impl ContactDirectory for FakeDirectory {
    async fn upsert_contact(&self, record: &ContactRecord) -> email_client::Result<()> {
        self.calls.lock().unwrap().push(record.clone());
        if self.fail {
            return Err(upstream_error());
        }
        Ok(())
    }
}

impl FakeDirectory {
    pub fn recorded(&self) -> Vec<ContactRecord> {
        self.calls.lock().unwrap().clone()
    }
}

/// Records every sent message, optionally failing each call.
#[derive(Default)]
pub struct FakeMailer {
    pub fail: bool,
    pub calls: Mutex<Vec<WelcomeMessage>>,
}

#[async_trait]
impl TransactionalMailer for FakeMailer {
    async fn send_message(&self, message: &WelcomeMessage) -> email_client::Result<()> {
        self.calls.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(upstream_error());
        }
        Ok(())
    }
}

impl FakeMailer {
    pub fn recorded(&self) -> Vec<WelcomeMessage> {
        self.calls.lock().unwrap().clone()
    }
}

// ###################################
// ->   TEST APP
// ###################################
#[derive(Default)]
pub struct TestOptions {
    pub send_welcome_email: bool,
    pub contacts_fail: bool,
    pub mailer_fail: bool,
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub http_client: reqwest::Client,
    pub contacts: Arc<FakeDirectory>,
    pub mailer: Arc<FakeMailer>,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Result<Self> {
        let contacts = Arc::new(FakeDirectory {
            fail: options.contacts_fail,
            ..Default::default()
        });
        let mailer = Arc::new(FakeMailer {
            fail: options.mailer_fail,
            ..Default::default()
        });

        let app_state = AppState::new(
            contacts.clone(),
            mailer.clone(),
            CONTACT_SOURCE.to_string(),
            welcome_sender(options.send_welcome_email)?,
        );
        let addr = spawn_server(app_state).await?;

        Ok(TestApp {
            addr,
            http_client: reqwest::Client::new(),
            contacts,
            mailer,
        })
    }

    pub fn subscribe_url(&self) -> String {
        format!("http://{}/api/subscribe", self.addr)
    }

    pub async fn post_subscribe(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(self.subscribe_url())
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    pub fn upstream_calls(&self) -> (usize, usize) {
        (self.contacts.recorded().len(), self.mailer.recorded().len())
    }
}

/// Serves the app with the real `EmailClient` pointed at a wiremock SendGrid.
pub async fn spawn_with_sendgrid(
    email_server: &MockServer,
    send_welcome_email: bool,
) -> Result<SocketAddr> {
    let email_client = Arc::new(EmailClient::new(
        email_server.uri(),
        SecretString::from("SG.test-key".to_string()),
        Duration::from_millis(500),
    )?);

    let app_state = AppState::new(
        email_client.clone(),
        email_client,
        CONTACT_SOURCE.to_string(),
        welcome_sender(send_welcome_email)?,
    );

    spawn_server(app_state).await
}

fn welcome_sender(send_welcome_email: bool) -> Result<Option<ValidEmail>> {
    if !send_welcome_email {
        return Ok(None);
    }
    Ok(Some(ValidEmail::parse(SENDER)?))
}

async fn spawn_server(app_state: AppState) -> Result<SocketAddr> {
    let listener = TcpListener::bind(TEST_SOCK_ADDR).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(signup_relay::serve(App::new(app_state, listener)));

    Ok(addr)
}

/// Asserts the status and the exact JSON body of a response.
pub async fn assert_json_resp(
    res: reqwest::Response,
    expected_status: u16,
    expected_body: serde_json::Value,
) -> Result<()> {
    assert_eq!(expected_status, res.status().as_u16(), "unexpected status code");
    let body: serde_json::Value = res.json().await?;
    assert_eq!(expected_body, body);
    Ok(())
}

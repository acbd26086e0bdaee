pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig,
    email_client::{ContactDirectory, TransactionalMailer},
    web::types::ValidEmail,
    EmailClient, Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Builds both SendGrid capabilities from one `EmailClient` and binds the listener.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let welcome_sender = config.subscribe_config.welcome_sender()?;

        let sendgrid_timeout = config.sendgrid_config.timeout();
        let email_client = Arc::new(EmailClient::new(
            &config.sendgrid_config.base_url,
            config.sendgrid_config.api_key,
            sendgrid_timeout,
        )?);

        let app_state = AppState::new(
            email_client.clone(),
            email_client,
            config.subscribe_config.contact_source,
            welcome_sender,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub contacts: Arc<dyn ContactDirectory>,
    pub mailer: Arc<dyn TransactionalMailer>,
    /// Stored in the `source` custom field of every contact.
    pub contact_source: String,
    /// `Some` only when the welcome email is enabled.
    pub welcome_sender: Option<ValidEmail>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        contacts: Arc<dyn ContactDirectory>,
        mailer: Arc<dyn TransactionalMailer>,
        contact_source: String,
        welcome_sender: Option<ValidEmail>,
    ) -> Self {
        AppState(Arc::new(InternalState {
            contacts,
            mailer,
            contact_source,
            welcome_sender,
        }))
    }
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::{
    email_client::{ContactRecord, WelcomeMessage},
    web::{
        types::{DataParsingError, SubscribeRequest, SubscribeResponse},
        Error, WebResult,
    },
    AppState,
};

/// POST /api/subscribe
///
/// Upserts the email as a contact and, when enabled, sends the welcome email.
/// The welcome email is only attempted after the contact upsert succeeded.
#[tracing::instrument(
    name = "Subscribing a new contact",
    skip_all,
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> WebResult<Json<SubscribeResponse>> {
    let Json(request) =
        payload.map_err(|rejection| DataParsingError::BodyRejected(rejection.body_text()))?;
    let email = request.valid_email()?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    let record = ContactRecord::new(email.clone(), &app_state.contact_source, Utc::now());
    app_state
        .contacts
        .upsert_contact(&record)
        .await
        .map_err(Error::ContactUpsert)?;
    info!("contact upserted");

    if let Some(sender) = &app_state.welcome_sender {
        let message = WelcomeMessage::new(sender.clone(), email);
        app_state
            .mailer
            .send_message(&message)
            .await
            .map_err(Error::WelcomeEmail)?;
        info!("welcome email sent");
    }

    Ok(Json(SubscribeResponse::subscribed()))
}

/// Every method other than POST on the subscribe route.
pub async fn method_not_allowed() -> WebResult<()> {
    Err(Error::MethodNotAllowed)
}

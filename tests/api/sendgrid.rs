//! The whole request path against a mocked SendGrid API.
use anyhow::Result;
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::helpers::{assert_json_resp, spawn_with_sendgrid, CONTACT_SOURCE, SENDER};

async fn post_subscribe(addr: std::net::SocketAddr, email: &str) -> Result<reqwest::Response> {
    let res = reqwest::Client::new()
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({ "email": email }))
        .send()
        .await?;
    Ok(res)
}

#[tokio::test]
async fn subscribe_upserts_contact_and_sends_welcome_email() -> Result<()> {
    let email_server = MockServer::start().await;
    let addr = spawn_with_sendgrid(&email_server, true).await?;

    Mock::given(path("/v3/marketing/contacts"))
        .and(method("PUT"))
        .and(header("Authorization", "Bearer SG.test-key"))
        .and(body_partial_json(json!({
            "contacts": [{
                "email": "reader@example.com",
                "custom_fields": { "source": CONTACT_SOURCE }
            }]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&email_server)
        .await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer SG.test-key"))
        .and(body_partial_json(json!({
            "personalizations": [{ "to": [{ "email": "reader@example.com" }] }],
            "from": { "email": SENDER }
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&email_server)
        .await;

    let res = post_subscribe(addr, "reader@example.com").await?;

    assert_json_resp(
        res,
        200,
        json!({"success": true, "message": "Successfully subscribed!"}),
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn subscribe_does_not_leak_sendgrid_errors() -> Result<()> {
    let email_server = MockServer::start().await;
    let addr = spawn_with_sendgrid(&email_server, true).await?;

    Mock::given(path("/v3/marketing/contacts"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"errors": [{"message": "authorization required"}]})),
        )
        .expect(1)
        .mount(&email_server)
        .await;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&email_server)
        .await;

    let res = post_subscribe(addr, "reader@example.com").await?;

    assert_json_resp(
        res,
        500,
        json!({"error": "Failed to subscribe. Please try again later."}),
    )
    .await?;

    Ok(())
}

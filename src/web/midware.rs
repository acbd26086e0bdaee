use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into one of the fixed client error bodies
/// and writes a log line for every request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let req_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        });
    let req_id_str = req_id.to_str().unwrap_or("unknown").to_string();

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| er.as_ref());
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let Some(er) = web_error.filter(|er| {
        matches!(er, Error::ContactUpsert(_) | Error::WelcomeEmail(_))
    }) {
        tracing::error!(error = %er, req_id = %req_id_str, "subscription failed upstream");
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({ "error": cl_err.to_string() });

        let mut err_resp = (*status, Json(client_error_body)).into_response();
        err_resp
            .headers_mut()
            .insert(REQUEST_ID_HEADER, req_id.clone());
        err_resp
    });

    log::log_request(
        &req_id_str,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}

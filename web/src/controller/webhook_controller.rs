//! Controller for webhook deliveries from the source control provider.
//!
//! Deliveries are authenticated against the raw request body before anything
//! else is read from them, so the body is taken as bytes rather than through
//! the `Json` extractor.

use crate::controller::StatusResponse;
use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::activity;
use domain::signature::{
    HmacSignatureVerifier, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER,
};
use log::*;
use serde_json::{json, Value};

/// POST /webhook
///
/// Accepts a push or pull_request delivery, stores the resulting activity
/// record and acknowledges it. Other deliveries are acknowledged and ignored.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body(content = String, description = "Raw webhook payload as sent by the provider", content_type = "application/json"),
    params(
        ("X-Hub-Signature-256" = Option<String>, Header, description = "sha256=<hexdigest> HMAC of the raw body"),
        ("X-GitHub-Event" = Option<String>, Header, description = "Event kind, e.g. push or pull_request"),
        ("X-GitHub-Delivery" = Option<String>, Header, description = "Provider delivery id"),
    ),
    responses(
        (status = 200, description = "Delivery stored or ignored", body = StatusResponse),
        (status = 400, description = "Body is not valid JSON"),
        (status = 401, description = "Invalid signature"),
        (status = 500, description = "Delivery is missing a required field"),
        (status = 503, description = "Event store unavailable")
    )
)]
pub async fn receive(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let delivery_id = header_str(&headers, DELIVERY_HEADER).unwrap_or("unknown");
    debug!("Received webhook delivery {delivery_id}");

    let verifier = HmacSignatureVerifier::new(app_state.config.webhook_secret());
    if let Err(e) = verifier.check(header_str(&headers, SIGNATURE_HEADER), &body) {
        warn!("Rejected webhook delivery {delivery_id}: {e}");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid signature" })),
        ));
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Null) | Err(_) => {
            warn!("Webhook delivery {delivery_id} is not a JSON document");
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON" })),
            ));
        }
        Ok(payload) => payload,
    };

    let event_kind = header_str(&headers, EVENT_HEADER).unwrap_or_default();

    let classification =
        activity::record_delivery(app_state.event_store_ref(), event_kind, &payload).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "status": classification.status() })),
    ))
}

// Header values that are not visible ASCII are treated as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use crate::controller::test_support::{app, send, SECRET};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain::signature::sign;
    use domain::{EventStore, InMemoryEventStore};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn push_payload() -> Value {
        json!({
            "ref": "refs/heads/main",
            "pusher": { "name": "alice" },
            "head_commit": { "timestamp": "2024-03-03T17:30:00Z" }
        })
    }

    fn delivery(event_kind: &str, body: &[u8], signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("x-github-event", event_kind)
            .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");

        if let Some(signature) = signature {
            builder = builder.header("x-hub-signature-256", signature);
        }

        builder.body(Body::from(body.to_vec())).unwrap()
    }

    fn signed(event_kind: &str, payload: &Value) -> Request<Body> {
        let body = serde_json::to_vec(payload).unwrap();
        let signature = sign(SECRET, &body);
        delivery(event_kind, &body, Some(signature))
    }

    #[tokio::test]
    async fn signed_push_is_stored() {
        let store = Arc::new(InMemoryEventStore::new());

        let (status, body) = send(app(store.clone(), SECRET), signed("push", &push_payload())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "push stored" }));
        assert_eq!(store.insert_count(), 1);

        let stored = store.list_recent(1).await.unwrap();
        assert_eq!(
            stored[0].message,
            "alice pushed to \"main\" on 3rd March 2024 - 05:30 PM UTC"
        );
    }

    #[tokio::test]
    async fn large_signed_deliveries_are_accepted() {
        let store = Arc::new(InMemoryEventStore::new());
        let mut payload = push_payload();
        payload["commits"] = json!([{ "message": "x".repeat(3 * 1024 * 1024) }]);

        let request = signed("push", &payload);
        let (status, body) = send(app(store.clone(), SECRET), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "push stored" }));
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn merged_pull_request_is_stored_as_merge() {
        let store = Arc::new(InMemoryEventStore::new());
        let payload = json!({
            "action": "closed",
            "pull_request": {
                "user": { "login": "bob" },
                "head": { "ref": "feature/login" },
                "base": { "ref": "main" },
                "merged": true,
                "merged_at": "2024-03-05T10:15:00Z",
                "created_at": "2024-03-01T09:00:00Z"
            }
        });

        let (status, body) = send(app(store.clone(), SECRET), signed("pull_request", &payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "merge stored" }));
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn wrong_signature_is_rejected_without_a_write() {
        let store = Arc::new(InMemoryEventStore::new());
        let body = serde_json::to_vec(&push_payload()).unwrap();
        let request = delivery("push", &body, Some(sign("some other secret", &body)));

        let (status, body) = send(app(store.clone(), SECRET), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid signature" }));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn missing_signature_is_rejected_without_a_write() {
        let store = Arc::new(InMemoryEventStore::new());
        let body = serde_json::to_vec(&push_payload()).unwrap();

        let (status, _) = send(app(store.clone(), SECRET), delivery("push", &body, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn signature_is_checked_before_json() {
        let store = Arc::new(InMemoryEventStore::new());

        let (status, _) = send(
            app(store.clone(), SECRET),
            delivery("push", b"{not json", Some("sha256=00".to_string())),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_secret_accepts_unsigned_deliveries() {
        let store = Arc::new(InMemoryEventStore::new());
        let body = serde_json::to_vec(&push_payload()).unwrap();

        let (status, body) = send(app(store.clone(), ""), delivery("push", &body, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "push stored" }));
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn invalid_json_is_a_bad_request() {
        let store = Arc::new(InMemoryEventStore::new());

        for raw in [&b"{not json"[..], b"null", b""] {
            let request = delivery("push", raw, Some(sign(SECRET, raw)));
            let (status, body) = send(app(store.clone(), SECRET), request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Invalid JSON" }));
        }
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn unhandled_event_kinds_are_acknowledged() {
        let store = Arc::new(InMemoryEventStore::new());

        let (status, body) = send(
            app(store.clone(), SECRET),
            signed("issues", &json!({ "action": "opened" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored event issues" }));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn unhandled_pull_request_actions_are_acknowledged() {
        let store = Arc::new(InMemoryEventStore::new());
        let payload = json!({
            "action": "synchronize",
            "pull_request": {
                "user": { "login": "bob" },
                "head": { "ref": "feature/login" },
                "base": { "ref": "main" }
            }
        });

        let (status, body) = send(app(store.clone(), SECRET), signed("pull_request", &payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "ignored pull_request action synchronize" })
        );
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn loosely_typed_pull_request_fields_are_acknowledged() {
        let store = Arc::new(InMemoryEventStore::new());
        let mut payload = json!({
            "pull_request": {
                "user": { "login": "bob" },
                "head": { "ref": "feature/login" },
                "base": { "ref": "main" },
                "merged": "yes",
                "merged_at": "2024-03-05T10:15:00Z"
            }
        });

        let (status, body) = send(app(store.clone(), SECRET), signed("pull_request", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored pull_request action None" }));

        payload["action"] = json!("closed");
        let (status, body) = send(app(store.clone(), SECRET), signed("pull_request", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored pull_request action closed" }));

        payload["action"] = json!(["closed"]);
        let (status, body) = send(app(store.clone(), SECRET), signed("pull_request", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored pull_request action [\"closed\"]" }));

        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn incomplete_push_is_a_server_error_without_a_write() {
        let store = Arc::new(InMemoryEventStore::new());
        let payload = json!({ "ref": "refs/heads/main", "pusher": { "name": "alice" } });

        let (status, body) = send(app(store.clone(), SECRET), signed("push", &payload)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Missing required field: head_commit.timestamp" })
        );
        assert_eq!(store.insert_count(), 0);
    }
}

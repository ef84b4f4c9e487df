use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::bearer_token,
    models::auth::{AuthenticatedUser, MagicLinkRequest, OAuthRequest, SessionState},
    services::auth::configured_provider,
    AppState,
};

/// POST /auth/magic-link
pub async fn magic_link(
    State(state): State<AppState>,
    Json(body): Json<MagicLinkRequest>,
) -> AppResult<Json<Value>> {
    configured_provider(state.auth.as_deref())?
        .send_magic_link(&body.email, body.redirect_to.as_deref())
        .await?;
    Ok(Json(json!({ "message": "Check your email for a sign-in link" })))
}

/// POST /auth/oauth — returns the provider URL to redirect the browser to
pub async fn oauth(
    State(state): State<AppState>,
    Json(body): Json<OAuthRequest>,
) -> AppResult<Json<Value>> {
    let url = configured_provider(state.auth.as_deref())?
        .authorize_url(&body.provider, body.redirect_to.as_deref())?;
    Ok(Json(json!({ "url": url })))
}

/// GET /auth/session — `{userId, loading, error}` for the bearer token, if any
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionState> {
    let Some(token) = bearer_token(&headers) else {
        return Json(SessionState {
            user_id: None,
            loading: false,
            error: None,
        });
    };

    let (tracker, _) = state.sessions.get_or_create(token);
    Json(tracker.refresh().await)
}

#[derive(Debug, Deserialize)]
pub struct SessionEventsQuery {
    pub token: String,
}

/// GET /auth/session/events?token=... — a `session` event with the current
/// state, then one per change. The first subscriber to an unknown token
/// triggers the provider lookup, so `loading: true` is seen first.
pub async fn session_events(
    State(state): State<AppState>,
    Query(params): Query<SessionEventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let (tracker, created) = state.sessions.get_or_create(&params.token);
    let updates = WatchStream::new(tracker.subscribe());

    if created {
        tokio::spawn(async move {
            tracker.refresh().await;
        });
    }

    tracing::debug!("Session event stream opened");
    Sse::new(updates.map(|session| Event::default().event("session").json_data(session)))
        .keep_alive(KeepAlive::default())
}

/// POST /auth/sign-out — ends the session and closes its event streams
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> AppResult<StatusCode> {
    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let (tracker, _) = state.sessions.get_or_create(token);
    tracker.sign_out().await?;
    state.sessions.remove(token);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me — verified locally against the provider's JWT secret
pub async fn me(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::{app, routes::testing::send, AppState};

    #[tokio::test]
    async fn test_session_without_token() {
        let app = app(AppState::for_tests());
        let (status, body) = send(&app, Method::GET, "/auth/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "userId": null, "loading": false, "error": null }));
    }

    #[tokio::test]
    async fn test_provider_not_configured() {
        let app = app(AppState::for_tests());
        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/magic-link",
            Some(json!({ "email": "cook@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = app(AppState::for_tests());
        let (status, body) = send(&app, Method::GET, "/auth/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Missing Authorization header" }));

        let (status, _) = send(&app, Method::POST, "/auth/sign-out", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_with_token_is_remembered() {
        use axum::{
            body::{to_bytes, Body},
            http::Request,
        };
        use tower::ServiceExt;

        let state = AppState::for_tests();
        let sessions = state.sessions.clone();
        let app = app(state);

        let request = |method: Method, uri: &str| {
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Authorization", "Bearer token-1")
                .body(Body::empty())
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/auth/session"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "userId": null,
                "loading": false,
                "error": "Identity provider error: Identity provider is not configured"
            })
        );
        assert_eq!(sessions.len(), 1);

        // A failed sign-out keeps the session and its error.
        let response = app
            .oneshot(request(Method::POST, "/auth/sign-out"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(sessions.len(), 1);
        let (tracker, created) = sessions.get_or_create("token-1");
        assert!(!created);
        assert!(tracker.current().error.is_some());
    }

    #[tokio::test]
    async fn test_session_events_stream() {
        use std::time::Duration;

        use axum::{body::Body, http::Request};
        use tokio_stream::StreamExt;
        use tower::ServiceExt;

        let state = AppState::for_tests();
        let sessions = state.sessions.clone();
        let app = app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/session/events?token=token-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );

        let mut body = response.into_body().into_data_stream();
        let mut seen = String::new();
        let finished = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(chunk) = body.next().await {
                seen.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
                if seen.contains("not configured") {
                    break;
                }
            }
        })
        .await;

        assert!(finished.is_ok());
        assert!(seen.contains("event: session"));
        assert!(seen.contains("\"loading\":false"));
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_me_with_signed_token() {
        use std::sync::Arc;

        use axum::{
            body::{to_bytes, Body},
            http::Request,
        };
        use chrono::Utc;
        use jsonwebtoken::{encode, EncodingKey, Header};
        use tower::ServiceExt;
        use uuid::Uuid;

        use crate::{config::Config, models::auth::Claims};

        let mut state = AppState::for_tests();
        state.config = Arc::new(Config {
            supabase_jwt_secret: Some("s3cret".into()),
            ..Config::default()
        });
        let app = app(state);

        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            email: Some("cook@example.com".into()),
            role: Some("authenticated".into()),
            exp: (Utc::now().timestamp() + 3600) as usize,
            iat: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "userId": user_id.to_string(), "email": "cook@example.com" })
        );
    }
}

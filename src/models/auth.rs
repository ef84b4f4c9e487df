use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the identity provider's access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // provider user UUID
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// Extracted from the validated bearer token — available via Axum extractors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// What the app knows about the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// A fresh session is loading until the provider has been asked.
    fn default() -> Self {
        Self {
            user_id: None,
            loading: true,
            error: None,
        }
    }
}

/// User record as returned by `GET /auth/v1/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body for POST /auth/magic-link.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
    pub redirect_to: Option<String>,
}

/// Body for POST /auth/oauth.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRequest {
    #[serde(default = "default_oauth_provider")]
    pub provider: String,
    pub redirect_to: Option<String>,
}

fn default_oauth_provider() -> String {
    "google".into()
}

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use reqwest::Client;
use serde_json::json;
use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::auth::{ProviderUser, SessionState},
};

/// Thin client for the hosted identity provider (Supabase auth REST API).
/// Sign-in, session and sign-out are all delegated; nothing here verifies
/// credentials itself.
pub struct AuthService {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthService {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::warn!("Identity provider error {}: {}", status, text);
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized("Invalid or expired session".into()));
        }
        Err(AppError::Upstream(format!("{status}")))
    }

    /// Send a one-time sign-in link to `email`.
    pub async fn send_magic_link(&self, email: &str, redirect_to: Option<&str>) -> AppResult<()> {
        let mut request = self
            .client
            .post(self.endpoint("otp"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "create_user": true }));
        if let Some(redirect) = redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Self::check(response).await?;
        tracing::info!("Magic link requested");
        Ok(())
    }

    /// URL the browser is sent to for an OAuth sign-in.
    pub fn authorize_url(&self, provider: &str, redirect_to: Option<&str>) -> AppResult<String> {
        let mut params = vec![("provider", provider)];
        if let Some(redirect) = redirect_to {
            params.push(("redirect_to", redirect));
        }
        let url = reqwest::Url::parse_with_params(&self.endpoint("authorize"), &params)
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(url.to_string())
    }

    /// Resolve the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> AppResult<ProviderUser> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        let user = Self::check(response)
            .await?
            .json::<ProviderUser>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Ok(user)
    }

    pub async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Session state for one access token, with change notification through a
/// watch channel. A tracker starts out loading until the provider has been
/// asked about its token.
pub struct SessionTracker {
    auth: Option<Arc<AuthService>>,
    access_token: String,
    state: watch::Sender<SessionState>,
}

impl SessionTracker {
    pub fn new(auth: Option<Arc<AuthService>>, access_token: &str) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            auth,
            access_token: access_token.to_string(),
            state,
        }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receives every state change until the session is dropped.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn provider(&self) -> AppResult<&AuthService> {
        configured_provider(self.auth.as_deref())
    }

    fn start_loading(&self) {
        self.state.send_if_modified(|s| {
            let changed = !s.loading || s.error.is_some();
            s.loading = true;
            s.error = None;
            changed
        });
    }

    fn record_user(&self, user_id: Option<String>) {
        self.state.send_modify(|s| {
            s.user_id = user_id;
            s.loading = false;
            s.error = None;
        });
    }

    fn record_error(&self, error: &AppError) {
        let message = error.to_string();
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
    }

    /// Ask the provider who owns the token.
    pub async fn refresh(&self) -> SessionState {
        self.start_loading();
        match self.provider() {
            Ok(auth) => match auth.get_user(&self.access_token).await {
                Ok(user) => self.record_user(Some(user.id)),
                Err(e) => {
                    self.state.send_modify(|s| s.user_id = None);
                    self.record_error(&e);
                }
            },
            Err(e) => self.record_error(&e),
        }
        self.current()
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        let result = match self.provider() {
            Ok(auth) => auth.sign_out(&self.access_token).await,
            Err(e) => Err(e),
        };
        match &result {
            Ok(()) => self.record_user(None),
            Err(e) => self.record_error(e),
        }
        result
    }
}

/// The configured provider, or a 502 explaining that there is none.
pub fn configured_provider(auth: Option<&AuthService>) -> AppResult<&AuthService> {
    auth.ok_or_else(|| AppError::Upstream("Identity provider is not configured".into()))
}

/// Live sessions keyed by access token. Held in `AppState` so that
/// `/auth/session` and the session event stream see the same tracker.
pub struct SessionRegistry {
    auth: Option<Arc<AuthService>>,
    sessions: RwLock<HashMap<String, Arc<SessionTracker>>>,
}

impl SessionRegistry {
    pub fn new(auth: Option<Arc<AuthService>>) -> Self {
        Self {
            auth,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The tracker for `access_token`, and whether it was just created.
    pub fn get_or_create(&self, access_token: &str) -> (Arc<SessionTracker>, bool) {
        if let Some(tracker) = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(access_token)
        {
            return (tracker.clone(), false);
        }

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        if let Some(tracker) = sessions.get(access_token) {
            return (tracker.clone(), false);
        }
        let tracker = Arc::new(SessionTracker::new(self.auth.clone(), access_token));
        sessions.insert(access_token.to_string(), tracker.clone());
        (tracker, true)
    }

    /// Forget a session. Subscribers see their stream end once the last
    /// handle to the tracker is gone.
    pub fn remove(&self, access_token: &str) -> Option<Arc<SessionTracker>> {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(access_token)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Library exports for binaries and tests
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::{path::Path, sync::Arc};

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use config::Config;
use middleware::auth::JwtSecret;
use services::{
    auth::{AuthService, SessionRegistry},
    recipes::RecipeCatalog,
};
use store::{GroceryStore, WeeklyMenuStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub groceries: Arc<GroceryStore>,
    pub weekly_menus: Arc<WeeklyMenuStore>,
    pub recipes: Arc<RecipeCatalog>,
    pub auth: Option<Arc<AuthService>>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Fresh, empty stores plus the configured recipe catalog.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let recipes = match &config.recipes_path {
            Some(path) => RecipeCatalog::from_file(Path::new(path))?,
            None => RecipeCatalog::builtin()?,
        };

        let auth = config
            .identity_provider()
            .map(|(url, key)| Arc::new(AuthService::new(url, key)));

        Ok(Self {
            groceries: Arc::new(GroceryStore::default()),
            weekly_menus: Arc::new(WeeklyMenuStore::default()),
            recipes: Arc::new(recipes),
            sessions: Arc::new(SessionRegistry::new(auth.clone())),
            auth,
            config: Arc::new(config),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        use store::{SequentialIds, SteppingClock};

        let ids: Arc<dyn store::IdGenerator> = Arc::new(SequentialIds::default());
        let clock: Arc<dyn store::Clock> = Arc::new(SteppingClock::default());
        Self {
            groceries: Arc::new(GroceryStore::new(ids.clone(), clock.clone())),
            weekly_menus: Arc::new(WeeklyMenuStore::new(ids, clock)),
            recipes: Arc::new(RecipeCatalog::builtin().expect("built-in recipes parse")),
            auth: None,
            sessions: Arc::new(SessionRegistry::new(None)),
            config: Arc::new(Config::default()),
        }
    }
}

/// All routes, with request tracing. CORS is added by the binary.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Auth (delegated to the identity provider)
        .route("/auth/magic-link", post(routes::auth::magic_link))
        .route("/auth/oauth", post(routes::auth::oauth))
        .route("/auth/session", get(routes::auth::session))
        .route("/auth/session/events", get(routes::auth::session_events))
        .route("/auth/sign-out", post(routes::auth::sign_out))
        .route("/auth/me", get(routes::auth::me))
        // Grocery lists
        .route("/grocery-lists", get(routes::groceries::list_lists).post(routes::groceries::create_list))
        .route(
            "/grocery-lists/{id}",
            get(routes::groceries::get_list)
                .patch(routes::groceries::update_list)
                .delete(routes::groceries::delete_list),
        )
        .route("/grocery-lists/{id}/items", post(routes::groceries::add_item))
        .route(
            "/grocery-lists/{id}/items/{item_id}",
            patch(routes::groceries::update_item).delete(routes::groceries::remove_item),
        )
        .route("/grocery-lists/{id}/shared", put(routes::groceries::set_shared))
        .route("/grocery-lists/{id}/groups", get(routes::groceries::grouped_items))
        .route("/shared/grocery-lists/{token}", get(routes::groceries::get_shared))
        // Weekly menus
        .route("/weekly-menus", get(routes::weekly_menus::list_weeks).post(routes::weekly_menus::create_week))
        .route(
            "/weekly-menus/{id}",
            get(routes::weekly_menus::get_week)
                .patch(routes::weekly_menus::update_week)
                .delete(routes::weekly_menus::delete_week),
        )
        .route("/weekly-menus/{id}/days", post(routes::weekly_menus::create_day))
        .route(
            "/weekly-menus/{id}/days/{day_id}",
            patch(routes::weekly_menus::update_day).delete(routes::weekly_menus::delete_day),
        )
        .route("/weekly-menus/{id}/days/{day_id}/recipes", put(routes::weekly_menus::upsert_day_recipe))
        .route(
            "/weekly-menus/{id}/days/{day_id}/recipes/{meal_type}",
            delete(routes::weekly_menus::delete_day_recipe),
        )
        // Recipes (read-only catalog)
        .route("/recipes", get(routes::recipes::search))
        .route("/recipes/facets", get(routes::recipes::facets))
        .route("/recipes/{id}", get(routes::recipes::details));

    // Without a secret, /auth/me answers 500 rather than trusting unsigned tokens.
    let router = match &state.config.supabase_jwt_secret {
        Some(secret) => router.layer(axum::Extension(JwtSecret(secret.clone()))),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

use axum::http::{header, HeaderValue, Method};
use chrono::Utc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mealplan_api::{app, config::Config, services::demo, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config)?;
    info!("Recipe catalog loaded ({} recipes)", state.recipes.len());

    if state.auth.is_some() {
        info!("Identity provider configured");
    } else {
        info!("Identity provider not configured — auth routes disabled");
    }

    if state.config.seed_demo {
        demo::seed(
            &state.groceries,
            &state.weekly_menus,
            &state.recipes,
            demo::DEMO_USER_ID,
            Utc::now().date_naive(),
        )?;
    }

    // Browser clients run on a separate dev server; allow local origins.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1"))
                .unwrap_or(false)
        }));

    let app = app(state).layer(cors);

    info!("mealplan API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

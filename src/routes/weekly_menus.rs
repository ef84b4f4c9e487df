use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        envelope::{Deleted, Envelope},
        weekly_menu::{
            CreateDayRequest, CreateWeekRequest, MealType, UpdateDayRequest, UpdateWeekRequest,
            UpsertDayRecipeRequest, WeeklyMenuWeek,
        },
    },
    routes::UserQuery,
    services::weekly_menus::WeeklyMenuService,
    AppState,
};

/// GET /weekly-menus?userId=...
pub async fn list_weeks(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<Envelope<Vec<WeeklyMenuWeek>>>> {
    WeeklyMenuService::list_by_user(&state.weekly_menus, &params.user_id)
        .await
        .map(Json)
}

pub async fn create_week(
    State(state): State<AppState>,
    Json(body): Json<CreateWeekRequest>,
) -> AppResult<(StatusCode, Json<Envelope<WeeklyMenuWeek>>)> {
    WeeklyMenuService::create(&state.weekly_menus, body)
        .await
        .map(|week| (StatusCode::CREATED, Json(week)))
}

pub async fn get_week(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::get(&state.weekly_menus, &id).await.map(Json)
}

pub async fn update_week(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateWeekRequest>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::update(&state.weekly_menus, &id, body)
        .await
        .map(Json)
}

pub async fn delete_week(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted>> {
    WeeklyMenuService::delete(&state.weekly_menus, &id)
        .await
        .map(Json)
}

/// POST /weekly-menus/{id}/days
pub async fn create_day(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateDayRequest>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::create_day(&state.weekly_menus, &id, body)
        .await
        .map(Json)
}

pub async fn update_day(
    State(state): State<AppState>,
    Path((id, day_id)): Path<(String, String)>,
    Json(body): Json<UpdateDayRequest>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::update_day(&state.weekly_menus, &id, &day_id, body)
        .await
        .map(Json)
}

pub async fn delete_day(
    State(state): State<AppState>,
    Path((id, day_id)): Path<(String, String)>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::delete_day(&state.weekly_menus, &id, &day_id)
        .await
        .map(Json)
}

/// PUT /weekly-menus/{id}/days/{day_id}/recipes — one slot per meal type
pub async fn upsert_day_recipe(
    State(state): State<AppState>,
    Path((id, day_id)): Path<(String, String)>,
    Json(body): Json<UpsertDayRecipeRequest>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::upsert_day_recipe(&state.weekly_menus, &id, &day_id, body)
        .await
        .map(Json)
}

/// DELETE /weekly-menus/{id}/days/{day_id}/recipes/{meal_type}
pub async fn delete_day_recipe(
    State(state): State<AppState>,
    Path((id, day_id, meal_type)): Path<(String, String, MealType)>,
) -> AppResult<Json<Envelope<WeeklyMenuWeek>>> {
    WeeklyMenuService::delete_day_recipe(&state.weekly_menus, &id, &day_id, meal_type)
        .await
        .map(Json)
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        envelope::{Deleted, Envelope},
        grocery::{
            CreateGroceryItemRequest, CreateGroceryListRequest, GroceryList, GroupedGroceryList,
            GroupsQuery, SetSharedRequest, UpdateGroceryItemRequest, UpdateGroceryListRequest,
        },
    },
    routes::UserQuery,
    services::groceries::GroceryService,
    AppState,
};

/// GET /grocery-lists?userId=...
pub async fn list_lists(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<Envelope<Vec<GroceryList>>>> {
    GroceryService::list_by_user(&state.groceries, &params.user_id)
        .await
        .map(Json)
}

/// POST /grocery-lists
pub async fn create_list(
    State(state): State<AppState>,
    Json(body): Json<CreateGroceryListRequest>,
) -> AppResult<(StatusCode, Json<Envelope<GroceryList>>)> {
    GroceryService::create(&state.groceries, body)
        .await
        .map(|list| (StatusCode::CREATED, Json(list)))
}

pub async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::get(&state.groceries, &id).await.map(Json)
}

pub async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateGroceryListRequest>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::update(&state.groceries, &id, body)
        .await
        .map(Json)
}

pub async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Deleted>> {
    GroceryService::delete(&state.groceries, &id).await.map(Json)
}

/// POST /grocery-lists/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateGroceryItemRequest>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::add_item(&state.groceries, &id, body)
        .await
        .map(Json)
}

pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<UpdateGroceryItemRequest>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::update_item(&state.groceries, &id, &item_id, body)
        .await
        .map(Json)
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::remove_item(&state.groceries, &id, &item_id)
        .await
        .map(Json)
}

/// PUT /grocery-lists/{id}/shared
pub async fn set_shared(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetSharedRequest>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::set_shared(&state.groceries, &id, body.shared)
        .await
        .map(Json)
}

/// GET /grocery-lists/{id}/groups?shoppingMode=true
pub async fn grouped_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<GroupsQuery>,
) -> AppResult<Json<Envelope<GroupedGroceryList>>> {
    GroceryService::grouped(&state.groceries, &id, params.shopping_mode)
        .await
        .map(Json)
}

/// GET /shared/grocery-lists/{token} — public, no ownership check
pub async fn get_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<Envelope<GroceryList>>> {
    GroceryService::get_shared(&state.groceries, &token)
        .await
        .map(Json)
}

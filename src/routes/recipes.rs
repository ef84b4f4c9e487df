use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        envelope::Envelope,
        recipe::{RecipeDetails, RecipeFacets, SearchRecipesQuery, SearchRecipesResponse},
    },
    services::recipes::RecipeService,
    AppState,
};

/// GET /recipes?q=&cuisine=&minCalories=&maxCalories=&dietaryTags=a,b&page=&pageSize=
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<SearchRecipesResponse>> {
    let params = SearchRecipesQuery::from_pairs(pairs)?;
    RecipeService::search(&state.recipes, &params).await.map(Json)
}

pub async fn facets(State(state): State<AppState>) -> AppResult<Json<Envelope<RecipeFacets>>> {
    RecipeService::facets(&state.recipes).await.map(Json)
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<RecipeDetails>>> {
    RecipeService::details(&state.recipes, &id).await.map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::{app, routes::testing::send, AppState};

    #[tokio::test]
    async fn test_search_with_tags_and_paging() {
        let app = app(AppState::for_tests());

        let (status, body) = send(
            &app,
            Method::GET,
            "/recipes?dietaryTags=vegan,gluten-free&pageSize=1&page=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], json!(2));
        assert_eq!(body["pageSize"], json!(1));
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        for recipe in body["data"].as_array().unwrap() {
            let tags = recipe["dietaryTags"].as_array().unwrap();
            assert!(tags.contains(&json!("vegan")));
            assert!(tags.contains(&json!("gluten-free")));
        }
    }

    #[tokio::test]
    async fn test_repeated_tag_params_match_comma_form() {
        let app = app(AppState::for_tests());

        let (status, comma) = send(
            &app,
            Method::GET,
            "/recipes?dietaryTags=vegan,gluten-free&pageSize=100",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, repeated) = send(
            &app,
            Method::GET,
            "/recipes?dietaryTags=vegan&dietaryTags=gluten-free&pageSize=100",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(repeated, comma);
        assert!(repeated["total"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_bad_query_values_are_400() {
        let app = app(AppState::for_tests());

        let (status, body) = send(&app, Method::GET, "/recipes?maxCalories=many", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid maxCalories: many" }));

        let (status, _) = send(&app, Method::GET, "/recipes?dietaryTags=keto", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_details_found_and_missing() {
        let app = app(AppState::for_tests());

        let (status, body) = send(&app, Method::GET, "/recipes/rcp_lentil_soup", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], json!("Red Lentil Soup"));
        assert!(body["data"]["steps"].as_array().unwrap().len() > 1);

        let (status, body) = send(&app, Method::GET, "/recipes/rcp_missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Recipe not found for id: rcp_missing" }));
    }

    #[tokio::test]
    async fn test_facets_route() {
        let app = app(AppState::for_tests());
        let (status, body) = send(&app, Method::GET, "/recipes/facets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["cuisines"]
            .as_array()
            .unwrap()
            .contains(&json!("Italian")));
    }
}

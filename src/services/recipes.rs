use std::{collections::BTreeSet, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{
        envelope::Envelope,
        recipe::{RecipeDetails, RecipeFacets, SearchRecipesQuery, SearchRecipesResponse},
    },
    services::metrics::RECIPE_SEARCHES,
};

pub const DEFAULT_PAGE_SIZE: usize = 12;

const BUILTIN_RECIPES: &str = include_str!("../../data/recipes.json");

/// Read-only recipe reference data.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<RecipeDetails>,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<RecipeDetails>) -> Self {
        Self { recipes }
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(BUILTIN_RECIPES)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let recipes: Vec<RecipeDetails> = serde_json::from_str(json)?;
        Ok(Self::new(recipes))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read recipes from {}: {e}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn matches(recipe: &RecipeDetails, query: &SearchRecipesQuery, text: Option<&str>, cuisine: Option<&str>) -> bool {
        let text_match = text.map_or(true, |needle| {
            format!(
                "{} {} {} {}",
                recipe.title,
                recipe.description,
                recipe.cuisine,
                recipe.country.as_deref().unwrap_or("")
            )
            .to_lowercase()
            .contains(needle)
        });

        let cuisine_match = cuisine.map_or(true, |c| recipe.cuisine.to_lowercase() == c);
        let min_match = query.min_calories.map_or(true, |min| recipe.calories >= min);
        let max_match = query.max_calories.map_or(true, |max| recipe.calories <= max);
        let tags_match = query
            .dietary_tags
            .iter()
            .all(|tag| recipe.dietary_tags.contains(tag));

        text_match && cuisine_match && min_match && max_match && tags_match
    }

    /// Filter then paginate. `total` counts the filtered set before paging.
    pub fn search(&self, query: &SearchRecipesQuery) -> SearchRecipesResponse {
        let text = query
            .q
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        let cuisine = query
            .cuisine
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        let filtered: Vec<&RecipeDetails> = self
            .recipes
            .iter()
            .filter(|recipe| Self::matches(recipe, query, text.as_deref(), cuisine.as_deref()))
            .collect();

        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total = filtered.len();
        let start = (page - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size);

        SearchRecipesResponse {
            data: filtered
                .into_iter()
                .skip(start)
                .take(page_size)
                .map(RecipeDetails::summary)
                .collect(),
            page,
            page_size,
            total,
            has_more: end < total,
        }
    }

    pub fn details(&self, recipe_id: &str) -> AppResult<RecipeDetails> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == recipe_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Recipe not found for id: {recipe_id}")))
    }

    /// Sorted distinct cuisines and countries.
    pub fn facets(&self) -> RecipeFacets {
        let cuisines: BTreeSet<&str> = self.recipes.iter().map(|r| r.cuisine.as_str()).collect();
        let countries: BTreeSet<&str> = self
            .recipes
            .iter()
            .filter_map(|r| r.country.as_deref())
            .collect();

        RecipeFacets {
            cuisines: cuisines.into_iter().map(String::from).collect(),
            countries: countries.into_iter().map(String::from).collect(),
        }
    }
}

pub struct RecipeService;

impl RecipeService {
    pub async fn search(
        catalog: &RecipeCatalog,
        query: &SearchRecipesQuery,
    ) -> AppResult<SearchRecipesResponse> {
        RECIPE_SEARCHES.inc();
        Ok(catalog.search(query))
    }

    pub async fn details(
        catalog: &RecipeCatalog,
        recipe_id: &str,
    ) -> AppResult<Envelope<RecipeDetails>> {
        catalog.details(recipe_id).map(Envelope::new)
    }

    pub async fn facets(catalog: &RecipeCatalog) -> AppResult<Envelope<RecipeFacets>> {
        Ok(Envelope::new(catalog.facets()))
    }
}

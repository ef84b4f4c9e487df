use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeDietTag {
    Vegan,
    Vegetarian,
    GlutenFree,
    DairyFree,
    HighProtein,
}

impl std::str::FromStr for RecipeDietTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vegan" => Ok(RecipeDietTag::Vegan),
            "vegetarian" => Ok(RecipeDietTag::Vegetarian),
            "gluten-free" => Ok(RecipeDietTag::GlutenFree),
            "dairy-free" => Ok(RecipeDietTag::DairyFree),
            "high-protein" => Ok(RecipeDietTag::HighProtein),
            other => Err(anyhow::anyhow!("Unknown dietary tag: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: String,
    pub title: String,
    pub cuisine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub calories: u32,
    pub dietary_tags: Vec<RecipeDietTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Full catalog record. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: String,
    pub title: String,
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub calories: u32,
    #[serde(default)]
    pub dietary_tags: Vec<RecipeDietTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cook_time_minutes: u32,
    pub servings: u32,
}

impl RecipeDetails {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            cuisine: self.cuisine.clone(),
            country: self.country.clone(),
            calories: self.calories,
            dietary_tags: self.dietary_tags.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Query params for GET /recipes.
#[derive(Debug, Clone, Default)]
pub struct SearchRecipesQuery {
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub min_calories: Option<u32>,
    pub max_calories: Option<u32>,
    pub dietary_tags: Vec<RecipeDietTag>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid {key}: {value}")))
}

impl SearchRecipesQuery {
    /// Build from raw query-string pairs. `dietaryTags` may be comma
    /// separated (`?dietaryTags=vegan,gluten-free`), repeated
    /// (`?dietaryTags=vegan&dietaryTags=gluten-free`) or both. Unknown
    /// keys are ignored; for other repeated keys the last one wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => query.q = Some(value),
                "cuisine" => query.cuisine = Some(value),
                "minCalories" => query.min_calories = Some(parse_number(&key, &value)?),
                "maxCalories" => query.max_calories = Some(parse_number(&key, &value)?),
                "page" => query.page = Some(parse_number(&key, &value)?),
                "pageSize" => query.page_size = Some(parse_number(&key, &value)?),
                "dietaryTags" => {
                    for tag in value.split(',').filter(|s| !s.trim().is_empty()) {
                        let tag: RecipeDietTag = tag
                            .parse()
                            .map_err(|e: anyhow::Error| AppError::Validation(e.to_string()))?;
                        if !query.dietary_tags.contains(&tag) {
                            query.dietary_tags.push(tag);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(query)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecipesResponse {
    pub data: Vec<RecipeSummary>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Distinct filter values offered by the recipe explorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeFacets {
    pub cuisines: Vec<String>,
    pub countries: Vec<String>,
}

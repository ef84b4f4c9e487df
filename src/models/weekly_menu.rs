use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(anyhow::anyhow!("Unknown meal type: {s}")),
        }
    }
}

/// A meal-type assignment within a day. The title is a snapshot taken when
/// the recipe was picked, not a live reference into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMenuRecipeSlot {
    pub id: String,
    pub recipe_id: String,
    pub recipe_title: String,
    pub meal_type: MealType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMenuDay {
    pub id: String,
    /// ISO 8601 date, e.g. "2025-06-02".
    #[serde(rename = "dateISO")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recipes: Vec<WeeklyMenuRecipeSlot>,
}

impl WeeklyMenuDay {
    pub fn slot(&self, meal_type: MealType) -> Option<&WeeklyMenuRecipeSlot> {
        self.recipes.iter().find(|slot| slot.meal_type == meal_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMenuWeek {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "weekStartISO")]
    pub week_start: String,
    #[serde(rename = "weekEndISO")]
    pub week_end: String,
    pub label: String,
    /// Kept sorted ascending by date.
    pub days: Vec<WeeklyMenuDay>,
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
}

impl WeeklyMenuWeek {
    pub fn day(&self, day_id: &str) -> Option<&WeeklyMenuDay> {
        self.days.iter().find(|day| day.id == day_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayRequest {
    #[serde(rename = "dateISO")]
    pub date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeekRequest {
    pub user_id: String,
    #[serde(rename = "weekStartISO")]
    pub week_start: String,
    #[serde(rename = "weekEndISO")]
    pub week_end: String,
    pub label: String,
    #[serde(default)]
    pub days: Vec<CreateDayRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeekRequest {
    pub label: Option<String>,
    #[serde(rename = "weekStartISO")]
    pub week_start: Option<String>,
    #[serde(rename = "weekEndISO")]
    pub week_end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDayRequest {
    #[serde(rename = "dateISO")]
    pub date: Option<String>,
    /// `null` clears the notes.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

/// Body for PUT /weekly-menus/{id}/days/{day_id}/recipes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDayRecipeRequest {
    pub recipe_id: String,
    pub recipe_title: String,
    pub meal_type: MealType,
    pub servings: Option<u32>,
}

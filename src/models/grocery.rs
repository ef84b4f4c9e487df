use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable;

/// Aisle grouping for a grocery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroceryCategory {
    Produce,
    Dairy,
    Protein,
    Pantry,
    Frozen,
    Bakery,
    Beverages,
    Other,
}

impl GroceryCategory {
    pub const ALL: [GroceryCategory; 8] = [
        GroceryCategory::Produce,
        GroceryCategory::Dairy,
        GroceryCategory::Protein,
        GroceryCategory::Pantry,
        GroceryCategory::Frozen,
        GroceryCategory::Bakery,
        GroceryCategory::Beverages,
        GroceryCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GroceryCategory::Produce => "Produce",
            GroceryCategory::Dairy => "Dairy",
            GroceryCategory::Protein => "Protein",
            GroceryCategory::Pantry => "Pantry",
            GroceryCategory::Frozen => "Frozen",
            GroceryCategory::Bakery => "Bakery",
            GroceryCategory::Beverages => "Beverages",
            GroceryCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryListItem {
    pub id: String,
    pub name: String,
    pub category: GroceryCategory,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub bought: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_label: Option<String>,
    pub is_shared: bool,
    /// Generated on first share and kept afterwards, even while unshared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_token: Option<String>,
    pub items: Vec<GroceryListItem>,
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
}

/// One category's items in a grouped view of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: GroceryCategory,
    pub label: &'static str,
    pub items: Vec<GroceryListItem>,
}

impl GroceryList {
    /// Items grouped by category, groups ordered by label. Empty groups are
    /// omitted; in shopping mode bought items are hidden first.
    pub fn grouped_items(&self, shopping_mode: bool) -> Vec<CategoryGroup> {
        let mut categories = GroceryCategory::ALL;
        categories.sort_by_key(|category| category.label());

        categories
            .into_iter()
            .map(|category| CategoryGroup {
                category,
                label: category.label(),
                items: self
                    .items
                    .iter()
                    .filter(|item| item.category == category)
                    .filter(|item| !(shopping_mode && item.bought))
                    .cloned()
                    .collect(),
            })
            .filter(|group| !group.items.is_empty())
            .collect()
    }

    pub fn bought_count(&self) -> usize {
        self.items.iter().filter(|item| item.bought).count()
    }
}

/// Item fields supplied when creating a list or adding an item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroceryItemRequest {
    pub name: String,
    pub category: GroceryCategory,
    pub quantity: f64,
    pub unit: Option<String>,
    #[serde(default)]
    pub bought: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroceryListRequest {
    pub user_id: String,
    pub name: String,
    pub week_label: Option<String>,
    #[serde(default)]
    pub items: Vec<CreateGroceryItemRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroceryListRequest {
    pub name: Option<String>,
    /// `null` clears the label.
    #[serde(default, deserialize_with = "nullable")]
    pub week_label: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroceryItemRequest {
    pub name: Option<String>,
    pub category: Option<GroceryCategory>,
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub unit: Option<Option<String>>,
    pub bought: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub note: Option<Option<String>>,
}

/// Body for PUT /grocery-lists/{id}/shared.
#[derive(Debug, Deserialize)]
pub struct SetSharedRequest {
    pub shared: bool,
}

/// Query params for GET /grocery-lists/{id}/groups.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupsQuery {
    #[serde(default)]
    pub shopping_mode: bool,
}

/// Response body for the grouped view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedGroceryList {
    pub list_id: String,
    pub bought_count: usize,
    pub total_count: usize,
    pub groups: Vec<CategoryGroup>,
}

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    error::AppResult,
    models::{
        grocery::{CreateGroceryItemRequest, CreateGroceryListRequest, GroceryCategory, GroceryList},
        weekly_menu::{CreateDayRequest, CreateWeekRequest, MealType, UpsertDayRecipeRequest, WeeklyMenuWeek},
    },
    services::recipes::RecipeCatalog,
    store::{GroceryStore, WeeklyMenuStore},
};

pub const DEMO_USER_ID: &str = "demo-user";

fn item(name: &str, category: GroceryCategory, quantity: f64, unit: Option<&str>) -> CreateGroceryItemRequest {
    CreateGroceryItemRequest {
        name: name.into(),
        category,
        quantity,
        unit: unit.map(String::from),
        bought: false,
        note: None,
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Seed one weekly menu (dinner every day, picked from the catalog in
/// order) and one grocery list for `user_id`.
pub fn seed(
    groceries: &GroceryStore,
    weekly_menus: &WeeklyMenuStore,
    catalog: &RecipeCatalog,
    user_id: &str,
    today: NaiveDate,
) -> AppResult<(GroceryList, WeeklyMenuWeek)> {
    let monday = week_start(today);
    let sunday = monday + Duration::days(6);
    let label = format!("Week of {}", monday.format("%B %-d"));

    let week = weekly_menus.create(CreateWeekRequest {
        user_id: user_id.into(),
        week_start: monday.to_string(),
        week_end: sunday.to_string(),
        label: label.clone(),
        days: (0..7)
            .map(|offset| CreateDayRequest {
                date: (monday + Duration::days(offset)).to_string(),
                notes: None,
            })
            .collect(),
    });

    let dinners = catalog.search(&Default::default());
    for (day, recipe) in week.days.iter().zip(dinners.data.iter()) {
        weekly_menus.upsert_day_recipe(
            &week.id,
            &day.id,
            UpsertDayRecipeRequest {
                recipe_id: recipe.id.clone(),
                recipe_title: recipe.title.clone(),
                meal_type: MealType::Dinner,
                servings: Some(2),
            },
        )?;
    }

    let list = groceries.create(CreateGroceryListRequest {
        user_id: user_id.into(),
        name: "Weekly shop".into(),
        week_label: Some(label),
        items: vec![
            item("Onions", GroceryCategory::Produce, 3.0, None),
            item("Lemons", GroceryCategory::Produce, 2.0, None),
            item("Greek yogurt", GroceryCategory::Dairy, 500.0, Some("g")),
            item("Eggs", GroceryCategory::Protein, 12.0, None),
            item("Red lentils", GroceryCategory::Pantry, 1.0, Some("kg")),
            item("Sourdough", GroceryCategory::Bakery, 1.0, None),
        ],
    })?;

    tracing::info!("Seeded demo data for user {user_id}");
    Ok((list, weekly_menus.get(&week.id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_start_is_monday() {
        let thursday = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        assert_eq!(week_start(thursday), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_seed_fills_every_dinner() {
        let groceries = GroceryStore::default();
        let weekly_menus = WeeklyMenuStore::default();
        let catalog = RecipeCatalog::builtin().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();

        let (list, week) = seed(&groceries, &weekly_menus, &catalog, DEMO_USER_ID, today).unwrap();

        assert_eq!(week.week_start, "2025-06-02");
        assert_eq!(week.week_end, "2025-06-08");
        assert_eq!(week.days.len(), 7);
        assert!(week
            .days
            .iter()
            .all(|d| d.slot(MealType::Dinner).is_some()));
        assert_eq!(list.items.len(), 6);
        assert_eq!(groceries.list(DEMO_USER_ID).len(), 1);
        assert_eq!(weekly_menus.list(DEMO_USER_ID).len(), 1);
    }
}

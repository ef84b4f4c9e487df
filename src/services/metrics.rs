use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    // ── Event counters (increment on each event) ────────────────────────────
    pub static ref GROCERY_LISTS_CREATED: IntCounter = register_int_counter!(
        "mealplan_grocery_lists_created_total",
        "Grocery lists created"
    ).unwrap();

    pub static ref GROCERY_ITEMS_ADDED: IntCounter = register_int_counter!(
        "mealplan_grocery_items_added_total",
        "Items added to existing grocery lists"
    ).unwrap();

    pub static ref GROCERY_SHARE_TOGGLES: IntCounterVec = register_int_counter_vec!(
        "mealplan_grocery_share_toggles_total",
        "Grocery list sharing changes by new state",
        &["shared"]
    ).unwrap();

    pub static ref WEEKLY_MENUS_CREATED: IntCounter = register_int_counter!(
        "mealplan_weekly_menus_created_total",
        "Weekly menus created"
    ).unwrap();

    pub static ref RECIPE_SLOTS_UPSERTED: IntCounterVec = register_int_counter_vec!(
        "mealplan_recipe_slots_upserted_total",
        "Recipes assigned to a meal by meal type",
        &["meal_type"]
    ).unwrap();

    pub static ref RECIPE_SEARCHES: IntCounter = register_int_counter!(
        "mealplan_recipe_searches_total",
        "Recipe catalog searches"
    ).unwrap();

    pub static ref NOT_FOUND_COUNTER: IntCounter = register_int_counter!(
        "mealplan_not_found_total",
        "Requests answered with 404"
    ).unwrap();
}

/// Render every registered metric in the Prometheus text format.
pub fn render() -> anyhow::Result<String> {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

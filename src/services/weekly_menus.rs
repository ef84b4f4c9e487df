use crate::{
    error::AppResult,
    models::{
        envelope::{Deleted, Envelope},
        weekly_menu::{
            CreateDayRequest, CreateWeekRequest, MealType, UpdateDayRequest, UpdateWeekRequest,
            UpsertDayRecipeRequest, WeeklyMenuWeek,
        },
    },
    services::metrics::{RECIPE_SLOTS_UPSERTED, WEEKLY_MENUS_CREATED},
    store::WeeklyMenuStore,
};

pub struct WeeklyMenuService;

impl WeeklyMenuService {
    pub async fn list_by_user(
        store: &WeeklyMenuStore,
        user_id: &str,
    ) -> AppResult<Envelope<Vec<WeeklyMenuWeek>>> {
        Ok(Envelope::new(store.list(user_id)))
    }

    pub async fn get(store: &WeeklyMenuStore, week_id: &str) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.get(week_id).map(Envelope::new)
    }

    pub async fn create(
        store: &WeeklyMenuStore,
        req: CreateWeekRequest,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        let week = store.create(req);
        WEEKLY_MENUS_CREATED.inc();
        Ok(Envelope::new(week))
    }

    pub async fn update(
        store: &WeeklyMenuStore,
        week_id: &str,
        patch: UpdateWeekRequest,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.update(week_id, patch).map(Envelope::new)
    }

    pub async fn delete(store: &WeeklyMenuStore, week_id: &str) -> AppResult<Deleted> {
        store.delete(week_id)
    }

    pub async fn create_day(
        store: &WeeklyMenuStore,
        week_id: &str,
        req: CreateDayRequest,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.create_day(week_id, req)?;
        Self::get(store, week_id).await
    }

    pub async fn update_day(
        store: &WeeklyMenuStore,
        week_id: &str,
        day_id: &str,
        patch: UpdateDayRequest,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.update_day(week_id, day_id, patch)?;
        Self::get(store, week_id).await
    }

    pub async fn delete_day(
        store: &WeeklyMenuStore,
        week_id: &str,
        day_id: &str,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.delete_day(week_id, day_id)?;
        Self::get(store, week_id).await
    }

    pub async fn upsert_day_recipe(
        store: &WeeklyMenuStore,
        week_id: &str,
        day_id: &str,
        req: UpsertDayRecipeRequest,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        let slot = store.upsert_day_recipe(week_id, day_id, req)?;
        RECIPE_SLOTS_UPSERTED
            .with_label_values(&[&slot.meal_type.to_string()])
            .inc();
        Self::get(store, week_id).await
    }

    pub async fn delete_day_recipe(
        store: &WeeklyMenuStore,
        week_id: &str,
        day_id: &str,
        meal_type: MealType,
    ) -> AppResult<Envelope<WeeklyMenuWeek>> {
        store.delete_day_recipe(week_id, day_id, meal_type)?;
        Self::get(store, week_id).await
    }
}

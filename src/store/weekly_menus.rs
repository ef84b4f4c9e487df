use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    error::{AppError, AppResult},
    models::{
        envelope::Deleted,
        weekly_menu::{
            CreateDayRequest, CreateWeekRequest, MealType, UpdateDayRequest, UpdateWeekRequest,
            UpsertDayRecipeRequest, WeeklyMenuDay, WeeklyMenuRecipeSlot, WeeklyMenuWeek,
        },
    },
    store::{Clock, IdGenerator, RandomIds, SystemClock},
};

fn week_not_found(week_id: &str) -> AppError {
    AppError::NotFound(format!("Weekly menu not found: {week_id}"))
}

fn day_not_found(week_id: &str, day_id: &str) -> AppError {
    AppError::NotFound(format!("Day not found in weekly menu {week_id}: {day_id}"))
}

fn find_day<'a>(week: &'a WeeklyMenuWeek, day_id: &str) -> AppResult<&'a WeeklyMenuDay> {
    week.day(day_id).ok_or_else(|| day_not_found(&week.id, day_id))
}

fn sort_days(days: &mut [WeeklyMenuDay]) {
    days.sort_by(|a, b| a.date.cmp(&b.date));
}

/// In-memory weekly menus keyed by id: week → day → recipe slot.
pub struct WeeklyMenuStore {
    weeks: RwLock<HashMap<String, WeeklyMenuWeek>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for WeeklyMenuStore {
    fn default() -> Self {
        Self::new(Arc::new(RandomIds), Arc::new(SystemClock))
    }
}

impl WeeklyMenuStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            weeks: RwLock::new(HashMap::new()),
            ids,
            clock,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, WeeklyMenuWeek>> {
        self.weeks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, WeeklyMenuWeek>> {
        self.weeks.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Build the next version of a week, re-sort its days, stamp
    /// `updated_at` and store it.
    fn replace<F>(&self, week_id: &str, f: F) -> AppResult<WeeklyMenuWeek>
    where
        F: FnOnce(&WeeklyMenuWeek) -> AppResult<WeeklyMenuWeek>,
    {
        let mut weeks = self.write();
        let current = weeks.get(week_id).ok_or_else(|| week_not_found(week_id))?;
        let mut next = f(current)?;
        sort_days(&mut next.days);
        next.updated_at = self.clock.now();
        weeks.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    fn new_day(&self, input: CreateDayRequest) -> WeeklyMenuDay {
        WeeklyMenuDay {
            id: self.ids.next_id("day"),
            date: input.date,
            notes: input.notes,
            recipes: Vec::new(),
        }
    }

    /// All weeks owned by `user_id`, latest week start first.
    pub fn list(&self, user_id: &str) -> Vec<WeeklyMenuWeek> {
        let mut weeks: Vec<WeeklyMenuWeek> = self
            .read()
            .values()
            .filter(|week| week.user_id == user_id)
            .cloned()
            .collect();
        weeks.sort_by(|a, b| b.week_start.cmp(&a.week_start));
        weeks
    }

    pub fn get(&self, week_id: &str) -> AppResult<WeeklyMenuWeek> {
        self.read()
            .get(week_id)
            .cloned()
            .ok_or_else(|| week_not_found(week_id))
    }

    pub fn create(&self, input: CreateWeekRequest) -> WeeklyMenuWeek {
        let timestamp = self.clock.now();
        let mut days: Vec<WeeklyMenuDay> =
            input.days.into_iter().map(|day| self.new_day(day)).collect();
        sort_days(&mut days);

        let week = WeeklyMenuWeek {
            id: self.ids.next_id("week"),
            user_id: input.user_id,
            week_start: input.week_start,
            week_end: input.week_end,
            label: input.label,
            days,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.write().insert(week.id.clone(), week.clone());
        tracing::info!("Created weekly menu {} for user {}", week.id, week.user_id);
        week
    }

    pub fn update(&self, week_id: &str, patch: UpdateWeekRequest) -> AppResult<WeeklyMenuWeek> {
        self.replace(week_id, |week| {
            let mut next = week.clone();
            if let Some(label) = patch.label {
                next.label = label;
            }
            if let Some(week_start) = patch.week_start {
                next.week_start = week_start;
            }
            if let Some(week_end) = patch.week_end {
                next.week_end = week_end;
            }
            Ok(next)
        })
    }

    pub fn delete(&self, week_id: &str) -> AppResult<Deleted> {
        self.write()
            .remove(week_id)
            .ok_or_else(|| week_not_found(week_id))?;
        tracing::info!("Deleted weekly menu {week_id}");
        Ok(Deleted::yes())
    }

    pub fn create_day(&self, week_id: &str, input: CreateDayRequest) -> AppResult<WeeklyMenuDay> {
        let day = self.new_day(input);
        let day_id = day.id.clone();

        let next = self.replace(week_id, move |week| {
            let mut next = week.clone();
            next.days.push(day);
            Ok(next)
        })?;

        find_day(&next, &day_id).cloned()
    }

    pub fn update_day(
        &self,
        week_id: &str,
        day_id: &str,
        patch: UpdateDayRequest,
    ) -> AppResult<WeeklyMenuDay> {
        let next = self.replace(week_id, |week| {
            find_day(week, day_id)?;
            let mut next = week.clone();
            for day in next.days.iter_mut().filter(|day| day.id == day_id) {
                if let Some(date) = patch.date.clone() {
                    day.date = date;
                }
                if let Some(notes) = patch.notes.clone() {
                    day.notes = notes;
                }
            }
            Ok(next)
        })?;

        find_day(&next, day_id).cloned()
    }

    pub fn delete_day(&self, week_id: &str, day_id: &str) -> AppResult<Deleted> {
        self.replace(week_id, |week| {
            find_day(week, day_id)?;
            let mut next = week.clone();
            next.days.retain(|day| day.id != day_id);
            Ok(next)
        })?;
        Ok(Deleted::yes())
    }

    /// Assign a recipe to a meal of the day. The meal type is the key: an
    /// existing slot keeps its id and takes the new recipe fields, otherwise
    /// a new slot is appended.
    pub fn upsert_day_recipe(
        &self,
        week_id: &str,
        day_id: &str,
        input: UpsertDayRecipeRequest,
    ) -> AppResult<WeeklyMenuRecipeSlot> {
        let meal_type = input.meal_type;

        let next = self.replace(week_id, |week| {
            let day = find_day(week, day_id)?;
            let slot = match day.slot(meal_type) {
                Some(existing) => WeeklyMenuRecipeSlot {
                    recipe_id: input.recipe_id,
                    recipe_title: input.recipe_title,
                    servings: input.servings,
                    ..existing.clone()
                },
                None => WeeklyMenuRecipeSlot {
                    id: self.ids.next_id("slot"),
                    recipe_id: input.recipe_id,
                    recipe_title: input.recipe_title,
                    meal_type,
                    servings: input.servings,
                },
            };

            let mut next = week.clone();
            for day in next.days.iter_mut().filter(|day| day.id == day_id) {
                match day.recipes.iter_mut().find(|s| s.meal_type == meal_type) {
                    Some(existing) => *existing = slot.clone(),
                    None => day.recipes.push(slot.clone()),
                }
            }
            Ok(next)
        })?;

        tracing::debug!("Set {meal_type} on day {day_id} of weekly menu {week_id}");
        find_day(&next, day_id)?
            .slot(meal_type)
            .cloned()
            .ok_or_else(|| day_not_found(week_id, day_id))
    }

    /// Remove the slot for `meal_type`. A day without that meal is left as is.
    pub fn delete_day_recipe(
        &self,
        week_id: &str,
        day_id: &str,
        meal_type: MealType,
    ) -> AppResult<Deleted> {
        self.replace(week_id, |week| {
            find_day(week, day_id)?;
            let mut next = week.clone();
            for day in next.days.iter_mut().filter(|day| day.id == day_id) {
                day.recipes.retain(|slot| slot.meal_type != meal_type);
            }
            Ok(next)
        })?;
        Ok(Deleted::yes())
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SequentialIds, SteppingClock};

    fn store() -> WeeklyMenuStore {
        WeeklyMenuStore::new(
            Arc::new(SequentialIds::default()),
            Arc::new(SteppingClock::default()),
        )
    }

    fn day(date: &str) -> CreateDayRequest {
        CreateDayRequest {
            date: date.into(),
            notes: None,
        }
    }

    fn week(user_id: &str, start: &str, days: Vec<CreateDayRequest>) -> CreateWeekRequest {
        CreateWeekRequest {
            user_id: user_id.into(),
            week_start: start.into(),
            week_end: "2025-06-08".into(),
            label: "First week of June".into(),
            days,
        }
    }

    fn dinner(recipe_id: &str, title: &str, servings: Option<u32>) -> UpsertDayRecipeRequest {
        UpsertDayRecipeRequest {
            recipe_id: recipe_id.into(),
            recipe_title: title.into(),
            meal_type: MealType::Dinner,
            servings,
        }
    }

    fn dates(week: &WeeklyMenuWeek) -> Vec<&str> {
        week.days.iter().map(|d| d.date.as_str()).collect()
    }

    #[test]
    fn test_create_sorts_seed_days() {
        let store = store();
        let created = store.create(week(
            "u1",
            "2025-06-02",
            vec![day("2025-06-04"), day("2025-06-02"), day("2025-06-03")],
        ));

        assert_eq!(dates(&created), vec!["2025-06-02", "2025-06-03", "2025-06-04"]);
        assert!(created.days.iter().all(|d| d.recipes.is_empty()));
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn test_create_day_keeps_days_sorted() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![]));

        for date in ["2025-06-06", "2025-06-02", "2025-06-08", "2025-06-04", "2025-06-03"] {
            store.create_day(&created.id, day(date)).unwrap();
        }

        let after = store.get(&created.id).unwrap();
        assert_eq!(
            dates(&after),
            vec!["2025-06-02", "2025-06-03", "2025-06-04", "2025-06-06", "2025-06-08"]
        );
        assert!(after.updated_at > created.updated_at);
    }

    #[test]
    fn test_update_day_resorts() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![day("2025-06-02"), day("2025-06-03")]));
        let monday = created.days[0].id.clone();

        let updated = store
            .update_day(
                &created.id,
                &monday,
                UpdateDayRequest {
                    date: Some("2025-06-05".into()),
                    notes: Some(Some("Leftovers".into())),
                },
            )
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("Leftovers"));

        let after = store.get(&created.id).unwrap();
        assert_eq!(dates(&after), vec!["2025-06-03", "2025-06-05"]);
        assert_eq!(after.days[1].id, monday);
    }

    #[test]
    fn test_update_day_clears_notes() {
        let store = store();
        let created = store.create(week(
            "u1",
            "2025-06-02",
            vec![CreateDayRequest {
                date: "2025-06-02".into(),
                notes: Some("Busy day".into()),
            }],
        ));
        let day_id = created.days[0].id.clone();

        let untouched = store
            .update_day(&created.id, &day_id, UpdateDayRequest::default())
            .unwrap();
        assert_eq!(untouched.notes.as_deref(), Some("Busy day"));

        let cleared = store
            .update_day(
                &created.id,
                &day_id,
                UpdateDayRequest {
                    date: None,
                    notes: Some(None),
                },
            )
            .unwrap();
        assert_eq!(cleared.notes, None);
        assert_eq!(cleared.date, "2025-06-02");
    }

    #[test]
    fn test_missing_day_is_not_found() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![]));

        let err = store
            .update_day(&created.id, "day_missing", UpdateDayRequest::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Day not found in weekly menu {}: day_missing", created.id)
        );
        assert!(matches!(
            store.delete_day(&created.id, "day_missing"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.upsert_day_recipe(&created.id, "day_missing", dinner("r1", "Soup", None)),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.create_day("week_missing", day("2025-06-02")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_upsert_keeps_one_slot_per_meal_type() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![day("2025-06-02")]));
        let day_id = created.days[0].id.clone();

        let first = store
            .upsert_day_recipe(&created.id, &day_id, dinner("r1", "Lentil soup", None))
            .unwrap();
        let second = store
            .upsert_day_recipe(&created.id, &day_id, dinner("r2", "Pad thai", Some(4)))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.recipe_id, "r2");
        assert_eq!(second.recipe_title, "Pad thai");
        assert_eq!(second.servings, Some(4));

        let after = store.get(&created.id).unwrap();
        let slots = &after.days[0].recipes;
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0], second);
    }

    #[test]
    fn test_upsert_appends_other_meal_types_then_delete() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![day("2025-06-02")]));
        let day_id = created.days[0].id.clone();

        store
            .upsert_day_recipe(&created.id, &day_id, dinner("r1", "Lentil soup", None))
            .unwrap();
        store
            .upsert_day_recipe(
                &created.id,
                &day_id,
                UpsertDayRecipeRequest {
                    meal_type: MealType::Breakfast,
                    ..dinner("r3", "Porridge", Some(2))
                },
            )
            .unwrap();
        assert_eq!(store.get(&created.id).unwrap().days[0].recipes.len(), 2);

        store
            .delete_day_recipe(&created.id, &day_id, MealType::Dinner)
            .unwrap();
        let after = store.get(&created.id).unwrap();
        assert_eq!(after.days[0].recipes.len(), 1);
        assert_eq!(after.days[0].recipes[0].meal_type, MealType::Breakfast);

        // Deleting an unassigned meal is a no-op.
        store
            .delete_day_recipe(&created.id, &day_id, MealType::Lunch)
            .unwrap();
        assert_eq!(store.get(&created.id).unwrap().days[0].recipes.len(), 1);
    }

    #[test]
    fn test_list_orders_by_week_start_descending() {
        let store = store();
        store.create(week("u1", "2025-06-02", vec![]));
        store.create(week("u1", "2025-06-16", vec![]));
        store.create(week("u1", "2025-06-09", vec![]));
        store.create(week("u2", "2025-06-23", vec![]));

        let starts: Vec<_> = store.list("u1").into_iter().map(|w| w.week_start).collect();
        assert_eq!(starts, vec!["2025-06-16", "2025-06-09", "2025-06-02"]);
    }

    #[test]
    fn test_update_delete_and_clear() {
        let store = store();
        let created = store.create(week("u1", "2025-06-02", vec![]));

        let updated = store
            .update(
                &created.id,
                UpdateWeekRequest {
                    label: Some("Holiday week".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.label, "Holiday week");
        assert_eq!(updated.week_start, "2025-06-02");

        store.delete(&created.id).unwrap();
        assert!(matches!(store.get(&created.id), Err(AppError::NotFound(_))));

        store.create(week("u1", "2025-06-09", vec![]));
        store.clear();
        assert!(store.list("u1").is_empty());
    }
}

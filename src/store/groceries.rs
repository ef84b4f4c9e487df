use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    error::{AppError, AppResult},
    models::{
        envelope::Deleted,
        grocery::{
            CreateGroceryItemRequest, CreateGroceryListRequest, GroceryList, GroceryListItem,
            UpdateGroceryItemRequest, UpdateGroceryListRequest,
        },
    },
    store::{Clock, IdGenerator, RandomIds, SystemClock},
};

fn list_not_found(list_id: &str) -> AppError {
    AppError::NotFound(format!("Grocery list not found: {list_id}"))
}

fn item_not_found(item_id: &str) -> AppError {
    AppError::NotFound(format!("Grocery item not found: {item_id}"))
}

fn check_quantity(quantity: f64) -> AppResult<()> {
    if quantity < 0.0 || quantity.is_nan() {
        return Err(AppError::Validation("Quantity must be non-negative".into()));
    }
    Ok(())
}

/// In-memory grocery lists keyed by id.
///
/// Every mutation builds a replacement `GroceryList` and swaps it into the
/// map under one write lock, so readers never see a half-applied change.
pub struct GroceryStore {
    lists: RwLock<HashMap<String, GroceryList>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for GroceryStore {
    fn default() -> Self {
        Self::new(Arc::new(RandomIds), Arc::new(SystemClock))
    }
}

impl GroceryStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            ids,
            clock,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, GroceryList>> {
        self.lists.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, GroceryList>> {
        self.lists.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Build the next version of a list from the current one, stamp
    /// `updated_at` and store it.
    fn replace<F>(&self, list_id: &str, f: F) -> AppResult<GroceryList>
    where
        F: FnOnce(&GroceryList) -> AppResult<GroceryList>,
    {
        let mut lists = self.write();
        let current = lists.get(list_id).ok_or_else(|| list_not_found(list_id))?;
        let mut next = f(current)?;
        next.updated_at = self.clock.now();
        lists.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    fn new_item(&self, input: CreateGroceryItemRequest) -> GroceryListItem {
        GroceryListItem {
            id: self.ids.next_id("gitem"),
            name: input.name,
            category: input.category,
            quantity: input.quantity,
            unit: input.unit,
            bought: input.bought,
            note: input.note,
        }
    }

    /// All lists owned by `user_id`, most recently updated first.
    pub fn list(&self, user_id: &str) -> Vec<GroceryList> {
        let mut lists: Vec<GroceryList> = self
            .read()
            .values()
            .filter(|list| list.user_id == user_id)
            .cloned()
            .collect();
        lists.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        lists
    }

    pub fn get(&self, list_id: &str) -> AppResult<GroceryList> {
        self.read()
            .get(list_id)
            .cloned()
            .ok_or_else(|| list_not_found(list_id))
    }

    pub fn create(&self, input: CreateGroceryListRequest) -> AppResult<GroceryList> {
        for item in &input.items {
            check_quantity(item.quantity)?;
        }

        let timestamp = self.clock.now();
        let list = GroceryList {
            id: self.ids.next_id("glist"),
            user_id: input.user_id,
            name: input.name,
            week_label: input.week_label,
            is_shared: false,
            shared_token: None,
            items: input.items.into_iter().map(|item| self.new_item(item)).collect(),
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.write().insert(list.id.clone(), list.clone());
        tracing::info!("Created grocery list {} for user {}", list.id, list.user_id);
        Ok(list)
    }

    /// Shallow merge of the supplied fields. An explicit `null` label clears it.
    pub fn update(&self, list_id: &str, patch: UpdateGroceryListRequest) -> AppResult<GroceryList> {
        self.replace(list_id, |list| {
            let mut next = list.clone();
            if let Some(name) = patch.name {
                next.name = name;
            }
            if let Some(week_label) = patch.week_label {
                next.week_label = week_label;
            }
            Ok(next)
        })
    }

    pub fn delete(&self, list_id: &str) -> AppResult<Deleted> {
        self.write()
            .remove(list_id)
            .ok_or_else(|| list_not_found(list_id))?;
        tracing::info!("Deleted grocery list {list_id}");
        Ok(Deleted::yes())
    }

    pub fn add_item(
        &self,
        list_id: &str,
        input: CreateGroceryItemRequest,
    ) -> AppResult<GroceryListItem> {
        check_quantity(input.quantity)?;
        let item = self.new_item(input);

        self.replace(list_id, |list| {
            let mut next = list.clone();
            next.items.push(item.clone());
            Ok(next)
        })?;

        tracing::debug!("Added item {} to grocery list {list_id}", item.id);
        Ok(item)
    }

    pub fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        patch: UpdateGroceryItemRequest,
    ) -> AppResult<GroceryListItem> {
        if let Some(quantity) = patch.quantity {
            check_quantity(quantity)?;
        }

        let next = self.replace(list_id, |list| {
            let current = list
                .items
                .iter()
                .find(|item| item.id == item_id)
                .ok_or_else(|| item_not_found(item_id))?;

            let mut merged = current.clone();
            if let Some(name) = patch.name {
                merged.name = name;
            }
            if let Some(category) = patch.category {
                merged.category = category;
            }
            if let Some(quantity) = patch.quantity {
                merged.quantity = quantity;
            }
            if let Some(unit) = patch.unit {
                merged.unit = unit;
            }
            if let Some(bought) = patch.bought {
                merged.bought = bought;
            }
            if let Some(note) = patch.note {
                merged.note = note;
            }

            let mut next = list.clone();
            next.items = list
                .items
                .iter()
                .map(|item| if item.id == item_id { merged.clone() } else { item.clone() })
                .collect();
            Ok(next)
        })?;

        next.items
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| item_not_found(item_id))
    }

    pub fn remove_item(&self, list_id: &str, item_id: &str) -> AppResult<Deleted> {
        self.replace(list_id, |list| {
            if !list.items.iter().any(|item| item.id == item_id) {
                return Err(item_not_found(item_id));
            }
            let mut next = list.clone();
            next.items.retain(|item| item.id != item_id);
            Ok(next)
        })?;
        Ok(Deleted::yes())
    }

    /// Toggle sharing. The token is generated on first enable and kept
    /// across later disable/enable cycles.
    pub fn set_shared(&self, list_id: &str, shared: bool) -> AppResult<GroceryList> {
        let next = self.replace(list_id, |list| {
            let mut next = list.clone();
            next.is_shared = shared;
            if shared && next.shared_token.is_none() {
                next.shared_token = Some(self.ids.next_id("share"));
            }
            Ok(next)
        })?;
        tracing::info!("Grocery list {list_id} shared={shared}");
        Ok(next)
    }

    /// Resolve a share token. Only lists that are currently shared resolve.
    pub fn get_by_share_token(&self, token: &str) -> AppResult<GroceryList> {
        self.read()
            .values()
            .find(|list| list.is_shared && list.shared_token.as_deref() == Some(token))
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("Shared grocery list not found for token: {token}"))
            })
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

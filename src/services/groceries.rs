use crate::{
    error::AppResult,
    models::{
        envelope::{Deleted, Envelope},
        grocery::{
            CreateGroceryItemRequest, CreateGroceryListRequest, GroceryList, GroupedGroceryList,
            UpdateGroceryItemRequest, UpdateGroceryListRequest,
        },
    },
    services::metrics::{GROCERY_ITEMS_ADDED, GROCERY_LISTS_CREATED, GROCERY_SHARE_TOGGLES},
    store::GroceryStore,
};

pub struct GroceryService;

impl GroceryService {
    pub async fn list_by_user(
        store: &GroceryStore,
        user_id: &str,
    ) -> AppResult<Envelope<Vec<GroceryList>>> {
        Ok(Envelope::new(store.list(user_id)))
    }

    pub async fn get(store: &GroceryStore, list_id: &str) -> AppResult<Envelope<GroceryList>> {
        store.get(list_id).map(Envelope::new)
    }

    pub async fn create(
        store: &GroceryStore,
        req: CreateGroceryListRequest,
    ) -> AppResult<Envelope<GroceryList>> {
        let list = store.create(req)?;
        GROCERY_LISTS_CREATED.inc();
        Ok(Envelope::new(list))
    }

    pub async fn update(
        store: &GroceryStore,
        list_id: &str,
        patch: UpdateGroceryListRequest,
    ) -> AppResult<Envelope<GroceryList>> {
        store.update(list_id, patch).map(Envelope::new)
    }

    pub async fn delete(store: &GroceryStore, list_id: &str) -> AppResult<Deleted> {
        store.delete(list_id)
    }

    /// Item operations answer with the whole refreshed list.
    pub async fn add_item(
        store: &GroceryStore,
        list_id: &str,
        req: CreateGroceryItemRequest,
    ) -> AppResult<Envelope<GroceryList>> {
        store.add_item(list_id, req)?;
        GROCERY_ITEMS_ADDED.inc();
        Self::get(store, list_id).await
    }

    pub async fn update_item(
        store: &GroceryStore,
        list_id: &str,
        item_id: &str,
        patch: UpdateGroceryItemRequest,
    ) -> AppResult<Envelope<GroceryList>> {
        store.update_item(list_id, item_id, patch)?;
        Self::get(store, list_id).await
    }

    pub async fn remove_item(
        store: &GroceryStore,
        list_id: &str,
        item_id: &str,
    ) -> AppResult<Envelope<GroceryList>> {
        store.remove_item(list_id, item_id)?;
        Self::get(store, list_id).await
    }

    pub async fn set_shared(
        store: &GroceryStore,
        list_id: &str,
        shared: bool,
    ) -> AppResult<Envelope<GroceryList>> {
        let list = store.set_shared(list_id, shared)?;
        GROCERY_SHARE_TOGGLES
            .with_label_values(&[if shared { "true" } else { "false" }])
            .inc();
        Ok(Envelope::new(list))
    }

    pub async fn get_shared(store: &GroceryStore, token: &str) -> AppResult<Envelope<GroceryList>> {
        store.get_by_share_token(token).map(Envelope::new)
    }

    /// Category-grouped view of a list, optionally hiding bought items.
    pub async fn grouped(
        store: &GroceryStore,
        list_id: &str,
        shopping_mode: bool,
    ) -> AppResult<Envelope<GroupedGroceryList>> {
        let list = store.get(list_id)?;
        Ok(Envelope::new(GroupedGroceryList {
            bought_count: list.bought_count(),
            total_count: list.items.len(),
            groups: list.grouped_items(shopping_mode),
            list_id: list.id,
        }))
    }
}

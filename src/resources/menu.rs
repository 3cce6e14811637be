//! Menu categories and items.

use serde::Deserialize;
use serde_json::Value;

use super::keys;
use crate::api::{decode_data, ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::{MenuCategory, MenuGroup, MenuItem};
use crate::validation::{MenuCategoryForm, MenuItemForm};

/// `/menu` has answered both grouped by category and as a flat item list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MenuPayload {
    Grouped(Vec<MenuGroup>),
    Flat(Vec<MenuItem>),
}

impl Default for MenuPayload {
    fn default() -> Self {
        MenuPayload::Grouped(Vec::new())
    }
}

/// The menu as a list of categories, each carrying its items.
pub async fn menu(client: &ApiClient) -> ApiResult<Vec<MenuCategory>> {
    let data = client
        .get_value(QueryKey::new(keys::MENU), "/menu", &[])
        .await?;
    let payload: MenuPayload = decode_data(data)?;
    Ok(match payload {
        MenuPayload::Grouped(groups) => groups.into_iter().map(|g| g.category).collect(),
        MenuPayload::Flat(items) => group_items(items),
    })
}

/// Build categories from a flat list, in first-seen order.
fn group_items(items: Vec<MenuItem>) -> Vec<MenuCategory> {
    let mut categories: Vec<MenuCategory> = Vec::new();
    for item in items {
        match categories.iter_mut().find(|c| c.id == item.category_id) {
            Some(category) => category.items.push(item),
            None => categories.push(MenuCategory {
                id: item.category_id,
                name: item
                    .category
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                items: vec![item],
            }),
        }
    }
    categories
}

pub fn flatten(categories: &[MenuCategory]) -> Vec<&MenuItem> {
    categories.iter().flat_map(|c| c.items.iter()).collect()
}

/// Search text plus an optional category id. Both must match.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub search: String,
    pub category_id: Option<u64>,
}

impl MenuFilter {
    /// Case-insensitive substring match on the item name, its description or
    /// its category name. Empty search matches everything.
    pub fn matches(&self, item: &MenuItem) -> bool {
        let needle = self.search.trim().to_lowercase();
        let contains = |s: &str| s.to_lowercase().contains(&needle);
        let matches_search = needle.is_empty()
            || contains(&item.item_name)
            || item.description.as_deref().is_some_and(contains)
            || item.category.as_ref().is_some_and(|c| contains(&c.name));
        let matches_category = self.category_id.map_or(true, |id| item.category_id == id);
        matches_search && matches_category
    }

    pub fn apply<'a>(&self, items: &[&'a MenuItem]) -> Vec<&'a MenuItem> {
        items.iter().copied().filter(|i| self.matches(i)).collect()
    }
}

pub fn available_count(items: &[&MenuItem]) -> usize {
    items.iter().filter(|i| i.is_available).count()
}

pub async fn create_category(client: &ApiClient, form: &MenuCategoryForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/menu/categories",
            Some(serde_json::to_value(form)?),
            &[keys::MENU],
        )
        .await
}

pub async fn create_item(client: &ApiClient, form: &MenuItemForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/menu/items",
            Some(serde_json::to_value(form)?),
            &[keys::MENU],
        )
        .await
}

pub async fn update_item(client: &ApiClient, id: u64, form: &MenuItemForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Put,
            &format!("/menu/items/{id}"),
            Some(serde_json::to_value(form)?),
            &[keys::MENU],
        )
        .await
}

pub async fn delete_item(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client
        .mutate(
            HttpMethod::Delete,
            &format!("/menu/items/{id}"),
            None,
            &[keys::MENU],
        )
        .await
}

//! Staff accounts.

use serde_json::Value;

use super::keys;
use crate::api::{ApiClient, HttpMethod};
use crate::cache::QueryKey;
use crate::error::ApiResult;
use crate::models::User;
use crate::validation::UserForm;

pub async fn list_users(client: &ApiClient) -> ApiResult<Vec<User>> {
    client.get_data(QueryKey::new(keys::USERS), "/users", &[]).await
}

pub async fn create_user(client: &ApiClient, form: &UserForm) -> ApiResult<Value> {
    form.validate()?;
    client
        .mutate(
            HttpMethod::Post,
            "/users",
            Some(serde_json::to_value(form)?),
            &[keys::USERS],
        )
        .await
}

//! Login and logout against the backend's auth endpoints.
//!
//! The backend hands back a user record; its id becomes the identity the
//! client sends on every later request. Persisting that id is left to the
//! caller (see [`crate::storage`]).

use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, HttpMethod};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::validation::LoginForm;

/// Find the user id in a login response. Accepts `id`, `userId` or a nested
/// `user` object, as numbers or strings.
pub fn extract_user_id(data: &Value) -> Option<String> {
    fn as_id(v: &Value) -> Option<String> {
        match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    let direct = data
        .get("userId")
        .or_else(|| data.get("id"))
        .and_then(as_id);
    direct.or_else(|| {
        data.get("user")
            .and_then(|u| u.get("id").or_else(|| u.get("userId")))
            .and_then(as_id)
    })
}

/// POST `/auth/login` and switch the client to the returned identity.
pub async fn login(client: &mut ApiClient, form: &LoginForm) -> ApiResult<String> {
    form.validate()?;
    let body = serde_json::to_value(form)?;
    let data = client
        .mutate(HttpMethod::Post, "/auth/login", Some(body), &[])
        .await?;

    let user_id = extract_user_id(&data)
        .ok_or_else(|| ApiError::Decode("login response carried no user id".to_string()))?;
    client.set_session(Session::for_user(user_id.clone()));
    info!("login succeeded");
    Ok(user_id)
}

/// POST `/auth/logout`. The local identity is dropped even when the server
/// call fails; the server error is still reported.
pub async fn logout(client: &mut ApiClient) -> ApiResult<()> {
    let result = client
        .mutate(HttpMethod::Post, "/auth/logout", None, &[])
        .await;
    client.set_session(Session::anonymous());
    match result {
        Ok(_) => {
            info!("logged out");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "server logout failed, local session cleared anyway");
            Err(e)
        }
    }
}

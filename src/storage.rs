//! Persisted identity using the OS credential store.
//!
//! On Windows this uses the Credential Manager (via the `keyring` crate), on
//! macOS Keychain, and on Linux the Secret Service API. Only two values are
//! kept: the logged-in user id and the API base URL it was issued by.

use keyring::Entry;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::session::Session;

const SERVICE_NAME: &str = "restro-dashboard";

// Credential keys
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_BASE_URL: &str = "api_base_url";

const ALL_KEYS: &[&str] = &[KEY_USER_ID, KEY_BASE_URL];

// ---------------------------------------------------------------------------
// Low-level helpers
// ---------------------------------------------------------------------------

/// Retrieve a single credential. Returns `None` when the entry does not
/// exist or the platform store is unavailable.
pub fn get_credential(key: &str) -> Option<String> {
    let entry = match Entry::new(SERVICE_NAME, key) {
        Ok(e) => e,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to create entry");
            return None;
        }
    };
    match entry.get_password() {
        Ok(pw) => Some(pw),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(key, error = %e, "keyring: failed to read credential");
            None
        }
    }
}

pub fn set_credential(key: &str, value: &str) -> ApiResult<()> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| ApiError::Storage(e.to_string()))?;
    entry
        .set_password(value)
        .map_err(|e| ApiError::Storage(e.to_string()))
}

/// Delete a credential. Silently succeeds if the entry does not exist.
pub fn delete_credential(key: &str) -> ApiResult<()> {
    let entry = Entry::new(SERVICE_NAME, key).map_err(|e| ApiError::Storage(e.to_string()))?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(ApiError::Storage(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// High-level API
// ---------------------------------------------------------------------------

/// Session for the persisted identity, anonymous when none is stored.
pub fn load_session() -> Session {
    match get_credential(KEY_USER_ID) {
        Some(id) => Session::for_user(id),
        None => Session::anonymous(),
    }
}

/// Base URL remembered from the last successful login.
pub fn remembered_base_url() -> Option<String> {
    get_credential(KEY_BASE_URL).filter(|v| !v.trim().is_empty())
}

pub fn save_identity(user_id: &str, base_url: &str) -> ApiResult<()> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::Storage("refusing to store an empty user id".into()));
    }
    set_credential(KEY_USER_ID, user_id)?;
    set_credential(KEY_BASE_URL, base_url.trim())?;
    info!("identity stored in credential store");
    Ok(())
}

/// Forget everything this client persisted.
pub fn clear_identity() -> ApiResult<()> {
    info!("clearing stored identity");
    for key in ALL_KEYS {
        delete_credential(key)?;
    }
    Ok(())
}

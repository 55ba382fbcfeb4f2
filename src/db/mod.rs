//! Session-scoped persistence for the playback offset and the one-time
//! toast flag. Web builds use the tab's sessionStorage, so both entries
//! vanish when the tab closes; native builds keep a process-lifetime map
//! with the same semantics so the logic is exercised by `cargo test`.

#[cfg(target_arch = "wasm32")]
use gloo_storage::{errors::StorageError, SessionStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
use once_cell::sync::Lazy;
#[cfg(not(target_arch = "wasm32"))]
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Mutex;

const POSITION_KEY: &str = "undertone.playback_position";
const NOTIFIED_KEY: &str = "undertone.session_notified";

/// Error type for storage operations on native platforms
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct StoreError(String);

#[cfg(not(target_arch = "wasm32"))]
impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl std::error::Error for StoreError {}

#[cfg(not(target_arch = "wasm32"))]
static SESSION_STORE: Lazy<Mutex<HashMap<String, String>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Persist the current playback position. Non-finite values are dropped
/// rather than written, so a bad read from the element never clobbers a
/// usable saved offset.
#[cfg(target_arch = "wasm32")]
pub fn save_position(position: f64) -> Result<(), StorageError> {
    if !position.is_finite() {
        return Ok(());
    }
    SessionStorage::set(POSITION_KEY, position)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_position(position: f64) -> Result<(), StoreError> {
    if !position.is_finite() {
        return Ok(());
    }
    let encoded = serde_json::to_string(&position).map_err(|e| StoreError::new(e.to_string()))?;
    let mut store = SESSION_STORE
        .lock()
        .map_err(|e| StoreError::new(e.to_string()))?;
    store.insert(POSITION_KEY.to_string(), encoded);
    Ok(())
}

/// Last persisted playback position, if one exists. Read/parse failures
/// count as "nothing saved".
#[cfg(target_arch = "wasm32")]
pub fn load_position() -> Option<f64> {
    SessionStorage::get(POSITION_KEY).ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_position() -> Option<f64> {
    let store = SESSION_STORE.lock().ok()?;
    let raw = store.get(POSITION_KEY)?;
    serde_json::from_str(raw).ok()
}

/// Whether the session toast has already been shown.
#[cfg(target_arch = "wasm32")]
pub fn was_notified() -> bool {
    SessionStorage::get::<String>(NOTIFIED_KEY).is_ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn was_notified() -> bool {
    SESSION_STORE
        .lock()
        .map(|store| store.contains_key(NOTIFIED_KEY))
        .unwrap_or(false)
}

#[cfg(target_arch = "wasm32")]
pub fn mark_notified() -> Result<(), StorageError> {
    SessionStorage::set(NOTIFIED_KEY, "1")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn mark_notified() -> Result<(), StoreError> {
    let mut store = SESSION_STORE
        .lock()
        .map_err(|e| StoreError::new(e.to_string()))?;
    store.insert(NOTIFIED_KEY.to_string(), "1".to_string());
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    // Both assertions live in one test because the store is shared
    // process state.
    #[test]
    fn position_round_trips_and_non_finite_values_are_dropped() {
        save_position(123.75).unwrap();
        assert_eq!(load_position(), Some(123.75));

        save_position(f64::NAN).unwrap();
        assert_eq!(load_position(), Some(123.75));

        save_position(f64::NEG_INFINITY).unwrap();
        assert_eq!(load_position(), Some(123.75));
    }

    #[test]
    fn notified_flag_is_set_exactly_once_per_session() {
        assert!(!was_notified());
        mark_notified().unwrap();
        assert!(was_notified());

        // Marking again is harmless and the flag stays set.
        mark_notified().unwrap();
        assert!(was_notified());
    }
}

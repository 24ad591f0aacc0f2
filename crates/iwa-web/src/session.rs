//! UI sessions and the one-analysis-at-a-time rule.

use axum::http::{header, HeaderMap, HeaderValue};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Cookie identifying a browser session.
pub const SESSION_COOKIE: &str = "iwa_session";

/// Read the session id from the request cookies.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Create a fresh session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(id: &str) -> HeaderValue {
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("iwa_session=; Path=/"))
}

/// Sessions with an analysis in flight.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SessionRegistry {
    /// Mark `id` as dispatching. Returns `None` if it already is.
    pub fn try_begin(&self, id: &str) -> Option<InFlightGuard> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(id.to_string()) {
            debug!(session = id, "Analysis already in flight for session");
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .map(|s| s.contains(id))
            .unwrap_or(false)
    }
}

/// Clears the in-flight mark when dropped, even if the handler bails early.
pub struct InFlightGuard {
    registry: SessionRegistry,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut in_flight = self.registry.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; iwa_session=abc-123"));
        assert_eq!(session_id(&headers), Some("abc-123".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("iwa_session="));
        assert_eq!(session_id(&headers), None);

        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_one_in_flight_per_session() {
        let registry = SessionRegistry::default();

        let guard = registry.try_begin("a").unwrap();
        assert!(registry.try_begin("a").is_none());
        assert!(registry.try_begin("b").is_some());
        assert!(registry.is_in_flight("a"));

        drop(guard);
        assert!(!registry.is_in_flight("a"));
        assert!(registry.try_begin("a").is_some());
    }
}

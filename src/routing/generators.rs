//! Built-in content generators that config files can reference by name.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::http::ServiceContext;
use crate::routing::RouteContent;

/// Names accepted in a route's `generator` field.
pub const NAMES: &[&str] = &["timestamp", "request_lines"];

/// Look up a generator by name.
pub fn lookup(name: &str) -> Option<RouteContent> {
    match name {
        "timestamp" => Some(RouteContent::dynamic(timestamp)),
        "request_lines" => Some(RouteContent::dynamic(request_lines)),
        _ => None,
    }
}

/// Current Unix time in seconds, with the fractional part.
pub fn timestamp(_ctx: &ServiceContext, _lines: &[String]) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs_f64().to_string()
}

/// Number of lines in the request head.
pub fn request_lines(_ctx: &ServiceContext, lines: &[String]) -> String {
    format!("{} lines", lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use std::sync::Arc;

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            assert!(lookup(name).is_some(), "{name} should resolve");
        }
        assert!(lookup("fortune").is_none());
    }

    #[test]
    fn timestamp_is_recent_float() {
        let ctx = ServiceContext::new(Arc::new(ServiceConfig::default()), None);
        let value: f64 = timestamp(&ctx, &[]).parse().unwrap();
        assert!(value > 1_600_000_000.0);
    }
}

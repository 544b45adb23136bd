//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the banner can be written as a header value
//! - Check every route has exactly one content source
//! - Detect duplicate route paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::routing::generators;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("address `{0}` is not an IP address")]
    InvalidAddress(String),

    #[error("banner must be non-empty latin-1 text without line breaks")]
    InvalidBanner,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("route #{index} has an empty path")]
    EmptyPath { index: usize },

    #[error("route `{path}` must set exactly one of `content`, `file` or `generator`")]
    AmbiguousContent { path: String },

    #[error("route `{path}` uses unknown generator `{name}`")]
    UnknownGenerator { path: String, name: String },

    #[error("route `{0}` is defined more than once")]
    DuplicatePath(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress(config.address.clone()));
    }

    if !is_valid_banner(&config.banner) {
        errors.push(ValidationError::InvalidBanner);
    }

    if config.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "max_connections" });
    }
    if config.max_line_bytes == 0 {
        errors.push(ValidationError::Zero { field: "max_line_bytes" });
    }

    let mut seen = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.path.is_empty() {
            errors.push(ValidationError::EmptyPath { index });
            continue;
        }

        let sources = [
            route.content.is_some(),
            route.file.is_some(),
            route.generator.is_some(),
        ];
        if sources.iter().filter(|set| **set).count() != 1 {
            errors.push(ValidationError::AmbiguousContent {
                path: route.path.clone(),
            });
        }

        if let Some(name) = &route.generator {
            if generators::lookup(name).is_none() {
                errors.push(ValidationError::UnknownGenerator {
                    path: route.path.clone(),
                    name: name.clone(),
                });
            }
        }

        if !seen.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicatePath(route.path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_banner(banner: &str) -> bool {
    !banner.is_empty()
        && banner
            .chars()
            .all(|c| (c as u32) <= 0xFF && c != '\r' && c != '\n')
}

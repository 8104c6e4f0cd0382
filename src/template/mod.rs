//! Template-driven bucketing of route signatures.
//!
//! A template names buckets and the method/path rules that feed them.
//! Every rule is tried against every observed route, so one route may
//! contribute its samples to several buckets. Routes that match no rule
//! keep a bucket named after their raw signature.
mod buckets;
mod rules;

#[cfg(test)]
mod tests;

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::TemplateError;

pub use buckets::{Bucket, BucketOrigin};
pub use rules::{PathMatcher, RouteRule};

/// The only template version understood.
pub const TEMPLATE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone)]
pub struct Template {
    rules: Vec<RouteRule>,
    bucket_names: Vec<String>,
}

impl Template {
    /// Loads and validates a `.json` or `.toml` template file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when the
    /// document is not a valid template.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(|err| TemplateError::Read {
            path: path.to_path_buf(),
            source: err,
        })?;
        let document: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| TemplateError::ParseJson {
                    path: path.to_path_buf(),
                    source: err,
                })?
            }
            Some("toml") => toml::from_str(&content).map_err(|err| TemplateError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })?,
            Some(ext) => {
                return Err(TemplateError::UnsupportedExtension {
                    ext: ext.to_owned(),
                });
            }
            None => return Err(TemplateError::MissingExtension),
        };
        let template = Self::from_value(&document)?;
        debug!(
            "Loaded template {} with {} rule(s) across {} bucket(s)",
            path.display(),
            template.rules.len(),
            template.bucket_names.len()
        );
        Ok(template)
    }

    /// Validates an in-memory template document.
    ///
    /// # Errors
    ///
    /// Returns an error when the version is unknown, `routes` is not an
    /// array, or any route is malformed.
    pub fn from_value(document: &Value) -> Result<Self, TemplateError> {
        let Value::Object(object) = document else {
            return Err(TemplateError::NotAnObject);
        };
        match object.get("version") {
            Some(Value::String(version)) if version == TEMPLATE_VERSION => {}
            Some(Value::String(version)) => {
                return Err(TemplateError::UnknownVersion {
                    version: version.clone(),
                });
            }
            Some(other) => {
                return Err(TemplateError::UnknownVersion {
                    version: other.to_string(),
                });
            }
            None => {
                return Err(TemplateError::UnknownVersion {
                    version: "(missing)".to_owned(),
                });
            }
        }
        let Some(Value::Array(routes)) = object.get("routes") else {
            return Err(TemplateError::RoutesNotArray);
        };

        let mut bucket_names: Vec<String> = Vec::new();
        let mut rules = Vec::with_capacity(routes.len());
        for (index, route) in routes.iter().enumerate() {
            let parsed = rules::parse_rule(index, route)?;
            let bucket = match bucket_names.iter().position(|name| *name == parsed.name) {
                Some(position) => position,
                None => {
                    bucket_names.push(parsed.name.clone());
                    bucket_names.len().saturating_sub(1)
                }
            };
            rules.push(RouteRule::new(parsed, bucket));
        }
        Ok(Self {
            rules,
            bucket_names,
        })
    }

    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Distinct bucket names in the order they first appear.
    #[must_use]
    pub fn bucket_names(&self) -> &[String] {
        &self.bucket_names
    }
}

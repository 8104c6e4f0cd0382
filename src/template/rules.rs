use regex::Regex;
use serde_json::{Map, Value};

use crate::error::TemplateError;
use crate::processor::RouteKey;

#[derive(Debug, Clone)]
pub enum PathMatcher {
    /// Literal path equality.
    Pattern(String),
    /// Unanchored search within the path.
    Regex(Regex),
}

impl PathMatcher {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Pattern(pattern) => pattern == path,
            Self::Regex(regex) => regex.is_match(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    name: String,
    method: String,
    matcher: PathMatcher,
    bucket: usize,
}

pub(super) struct ParsedRule {
    pub(super) name: String,
    method: String,
    matcher: PathMatcher,
}

impl RouteRule {
    pub(super) fn new(parsed: ParsedRule, bucket: usize) -> Self {
        Self {
            name: parsed.name,
            method: parsed.method,
            matcher: parsed.matcher,
            bucket,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub const fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub(super) const fn bucket(&self) -> usize {
        self.bucket
    }

    /// Method must be equal; the path is tested by the rule's matcher.
    #[must_use]
    pub fn matches(&self, key: &RouteKey) -> bool {
        self.method == key.method && self.matcher.matches(&key.path)
    }
}

pub(super) fn parse_rule(index: usize, route: &Value) -> Result<ParsedRule, TemplateError> {
    let Value::Object(fields) = route else {
        return Err(TemplateError::RouteNotObject { index });
    };
    let (Some(name), Some(method)) = (non_empty(fields, "name"), non_empty(fields, "method"))
    else {
        return Err(TemplateError::MissingNameOrMethod { index });
    };

    let matcher = match (non_empty(fields, "pattern"), non_empty(fields, "regex")) {
        (Some(pattern), None) => PathMatcher::Pattern(pattern.to_owned()),
        (None, Some(source)) => {
            let regex = Regex::new(source).map_err(|err| TemplateError::InvalidRegex {
                name: name.to_owned(),
                source: err,
            })?;
            PathMatcher::Regex(regex)
        }
        (Some(_), Some(_)) | (None, None) => {
            return Err(TemplateError::PatternRegexExclusive {
                name: name.to_owned(),
            });
        }
    };

    Ok(ParsedRule {
        name: name.to_owned(),
        method: method.to_owned(),
        matcher,
    })
}

fn non_empty<'map>(fields: &'map Map<String, Value>, key: &str) -> Option<&'map str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

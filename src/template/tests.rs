use serde_json::{Value, json};
use tempfile::tempdir;

use super::{BucketOrigin, PathMatcher, Template};
use crate::error::{AppError, AppResult, TemplateError};
use crate::processor::RunMetrics;

fn metrics(samples: &[(&str, u16, u64)]) -> RunMetrics {
    let mut metrics = RunMetrics::default();
    for (signature, status, elapsed) in samples {
        metrics.record((*signature).to_owned(), *status, *elapsed);
    }
    metrics
}

fn template(document: &Value) -> AppResult<Template> {
    Ok(Template::from_value(document)?)
}

#[test]
fn validation_rejects_malformed_templates() -> AppResult<()> {
    let cases = [
        (json!({"version": "2.0.0", "routes": []}), "unknown version"),
        (json!({"routes": []}), "missing version"),
        (json!({"version": "1.0.0", "routes": {}}), "routes object"),
        (
            json!({"version": "1.0.0", "routes": [{"method": "GET", "pattern": "/x"}]}),
            "missing name",
        ),
        (
            json!({"version": "1.0.0", "routes": [{"name": "x", "method": "GET"}]}),
            "neither pattern nor regex",
        ),
        (
            json!({"version": "1.0.0", "routes": [
                {"name": "x", "method": "GET", "pattern": "/x", "regex": "^/x"}
            ]}),
            "both pattern and regex",
        ),
        (
            json!({"version": "1.0.0", "routes": [
                {"name": "x", "method": "GET", "regex": "(unclosed"}
            ]}),
            "invalid regex",
        ),
        (json!(["not", "an", "object"]), "array document"),
    ];
    for (document, label) in cases {
        if Template::from_value(&document).is_ok() {
            return Err(AppError::template(format!("Expected {} to fail", label)));
        }
    }
    Ok(())
}

#[test]
fn validation_errors_name_the_route() -> AppResult<()> {
    let document = json!({"version": "1.0.0", "routes": [
        {"name": "users", "method": "GET", "pattern": "/u", "regex": "^/u"}
    ]});
    match Template::from_value(&document) {
        Err(TemplateError::PatternRegexExclusive { name }) if name == "users" => Ok(()),
        Err(err) => Err(AppError::template(format!("Unexpected error {}", err))),
        Ok(_) => Err(AppError::template("Expected exclusivity error")),
    }
}

#[test]
fn pattern_and_regex_rules_compile() -> AppResult<()> {
    let loaded = template(&json!({"version": "1.0.0", "routes": [
        {"name": "home", "method": "GET", "pattern": "/"},
        {"name": "items", "method": "GET", "regex": "^/items/\\d+$"}
    ]}))?;
    let kinds: Vec<bool> = loaded
        .rules()
        .iter()
        .map(|rule| matches!(rule.matcher(), PathMatcher::Regex(_)))
        .collect();
    if kinds != vec![false, true] {
        return Err(AppError::template(format!("Unexpected matchers {:?}", kinds)));
    }
    if !loaded
        .rules()
        .iter()
        .any(|rule| rule.matcher().matches("/items/42"))
    {
        return Err(AppError::template("Expected regex to match /items/42"));
    }
    Ok(())
}

#[test]
fn asterisk_form_urls_reach_rules() -> AppResult<()> {
    let loaded = template(&json!({"version": "1.0.0", "routes": [
        {"name": "preflight", "method": "OPTIONS", "pattern": "*"}
    ]}))?;
    let buckets = loaded.bucketize(&metrics(&[("OPTIONS http://a:80*", 204, 5)]));
    let first = buckets
        .first()
        .ok_or_else(|| AppError::template("Expected one bucket"))?;
    if buckets.len() != 1 || first.name != "preflight" || first.origin != BucketOrigin::Template {
        return Err(AppError::template(format!("Unexpected buckets {:?}", buckets)));
    }
    Ok(())
}

#[test]
fn overlapping_rules_fan_out_samples() -> AppResult<()> {
    let loaded = template(&json!({"version": "1.0.0", "routes": [
        {"name": "exact", "method": "GET", "pattern": "/items/1"},
        {"name": "all-items", "method": "GET", "regex": "^/items/"}
    ]}))?;
    let run = metrics(&[
        ("GET http://a:80/items/1", 200, 10),
        ("GET http://a:80/items/1", 200, 30),
        ("GET http://a:80/items/2", 200, 50),
    ]);
    let buckets = loaded.bucketize(&run);

    let names: Vec<&str> = buckets.iter().map(|bucket| bucket.name.as_str()).collect();
    if names != vec!["exact", "all-items"] {
        return Err(AppError::template(format!("Unexpected buckets {:?}", names)));
    }
    let exact = buckets
        .first()
        .and_then(|bucket| bucket.times.get(200))
        .ok_or_else(|| AppError::template("Missing exact samples"))?;
    if exact != [10, 30] {
        return Err(AppError::template(format!("Unexpected exact {:?}", exact)));
    }
    let all = buckets
        .get(1)
        .and_then(|bucket| bucket.times.get(200))
        .ok_or_else(|| AppError::template("Missing all-items samples"))?;
    if all != [10, 30, 50] {
        return Err(AppError::template(format!("Unexpected all-items {:?}", all)));
    }
    Ok(())
}

#[test]
fn unmatched_routes_follow_template_buckets() -> AppResult<()> {
    let loaded = template(&json!({"version": "1.0.0", "routes": [
        {"name": "unused", "method": "DELETE", "pattern": "/gone"},
        {"name": "posts", "method": "POST", "pattern": "/x"}
    ]}))?;
    let run = metrics(&[
        ("GET http://a:80/x", 200, 5),
        ("POST http://a:80/x", 201, 7),
        ("GET http://a:80/b", 404, 9),
    ]);
    let buckets = loaded.bucketize(&run);
    let layout: Vec<(&str, BucketOrigin)> = buckets
        .iter()
        .map(|bucket| (bucket.name.as_str(), bucket.origin))
        .collect();
    let expected = vec![
        ("posts", BucketOrigin::Template),
        ("GET http://a:80/b", BucketOrigin::Raw),
        ("GET http://a:80/x", BucketOrigin::Raw),
    ];
    if layout != expected {
        return Err(AppError::template(format!("Unexpected layout {:?}", layout)));
    }
    Ok(())
}

#[test]
fn rules_sharing_a_name_merge_into_one_bucket() -> AppResult<()> {
    let loaded = template(&json!({"version": "1.0.0", "routes": [
        {"name": "reads", "method": "GET", "pattern": "/a"},
        {"name": "writes", "method": "POST", "pattern": "/a"},
        {"name": "reads", "method": "GET", "pattern": "/b"}
    ]}))?;
    if loaded.bucket_names() != ["reads", "writes"] {
        return Err(AppError::template(format!(
            "Unexpected names {:?}",
            loaded.bucket_names()
        )));
    }
    let run = metrics(&[
        ("GET http://a:80/a", 200, 1),
        ("GET http://a:80/b", 200, 2),
        ("POST http://a:80/a", 200, 3),
    ]);
    let buckets = loaded.bucketize(&run);
    let reads = buckets
        .first()
        .filter(|bucket| bucket.name == "reads")
        .ok_or_else(|| AppError::template("Expected reads bucket first"))?;
    if reads.times.sample_count() != 2 {
        return Err(AppError::template("Expected both reads merged"));
    }
    Ok(())
}

#[test]
fn load_dispatches_on_extension() -> AppResult<()> {
    let dir = tempdir()?;
    let toml_path = dir.path().join("buckets.toml");
    std::fs::write(
        &toml_path,
        r#"
version = "1.0.0"

[[routes]]
name = "users"
method = "GET"
regex = "^/users/[0-9]+$"
"#,
    )?;
    let loaded = Template::load(&toml_path)?;
    if loaded.rules().len() != 1 || loaded.rules().first().map(|rule| rule.name()) != Some("users")
    {
        return Err(AppError::template("Unexpected TOML template"));
    }

    let json_path = dir.path().join("buckets.json");
    std::fs::write(
        &json_path,
        r#"{"version":"1.0.0","routes":[{"name":"home","method":"GET","pattern":"/"}]}"#,
    )?;
    let loaded = Template::load(&json_path)?;
    if loaded.rules().first().map(|rule| rule.method()) != Some("GET") {
        return Err(AppError::template("Unexpected JSON template"));
    }

    let yaml_path = dir.path().join("buckets.yaml");
    std::fs::write(&yaml_path, "version: 1.0.0")?;
    if !matches!(
        Template::load(&yaml_path),
        Err(TemplateError::UnsupportedExtension { .. })
    ) {
        return Err(AppError::template("Expected unsupported extension"));
    }
    if !matches!(
        Template::load(&dir.path().join("missing.json")),
        Err(TemplateError::Read { .. })
    ) {
        return Err(AppError::template("Expected read error"));
    }
    Ok(())
}

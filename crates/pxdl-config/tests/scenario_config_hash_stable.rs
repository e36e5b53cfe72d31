//! Config hash stability.
//!
//! GREEN when:
//! - identical inputs hash identically
//! - key order inside YAML does not affect the hash
//! - any effective value change changes the hash
//! - an overlay that restates a default hashes the same as no overlay

use pxdl_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
server:
  addr: "127.0.0.1:8080"
market: "twse"
provider:
  base_url: "https://query2.finance.yahoo.com"
  timeout_secs: 30
errors:
  style: "alert"
"#;

const BASE_YAML_REORDERED: &str = r#"
errors:
  style: "alert"
provider:
  timeout_secs: 30
  base_url: "https://query2.finance.yahoo.com"
market: "twse"
server:
  addr: "127.0.0.1:8080"
"#;

const OVERLAY_YAML: &str = r#"
market: "tpex"
errors:
  style: "json"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
    assert_eq!(a.config_hash.len(), 64);
}

#[test]
fn key_order_does_not_change_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn restating_defaults_matches_empty_config() {
    let explicit = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let implicit = load_layered_yaml_from_strings(&[]).unwrap();
    let blank_doc = load_layered_yaml_from_strings(&[""]).unwrap();
    assert_eq!(explicit.config_hash, implicit.config_hash);
    assert_eq!(implicit.config_hash, blank_doc.config_hash);
}

#[test]
fn overlay_changes_hash_and_values() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, merged.config_hash);

    assert_eq!(merged.config.market, pxdl_md::Market::Tpex);
    assert_eq!(merged.config.errors.style, pxdl_config::ErrorStyle::Json);
    // Untouched keys survive the overlay.
    assert_eq!(merged.config.provider.timeout_secs, 30);
    assert_eq!(merged.config.server.addr.to_string(), "127.0.0.1:8080");
}

#[test]
fn shipped_default_yaml_matches_builtin_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("default.yaml");
    let path_s = path.to_string_lossy().to_string();

    let shipped = pxdl_config::load_layered_yaml(&[path_s.as_str()]).unwrap();
    let builtin = load_layered_yaml_from_strings(&[]).unwrap();
    assert_eq!(shipped.config_hash, builtin.config_hash);
}

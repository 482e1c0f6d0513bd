//! Configuration and client tests.
//!
//! Tests actual behavior, not constants.

use std::time::Duration;

use aixiv_insights::client::{ArxivClient, GeminiClient, GenerativeModel};
use aixiv_insights::config::Config;
use aixiv_insights::relay::RelayContext;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_default_has_no_api_key() {
    let config = Config::default();
    assert!(!config.has_api_key());
}

#[test]
fn test_config_with_api_key() {
    let config = Config::new(Some("test-key".to_string()));
    assert!(config.has_api_key());
    assert_eq!(config.api_key.as_deref(), Some("test-key"));
}

#[test]
fn test_config_blank_api_key_is_absent() {
    assert!(!Config::new(Some("   ".to_string())).has_api_key());
}

#[test]
fn test_config_debug_hides_api_key() {
    let config = Config::new(Some("super-secret".to_string()));
    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("has_api_key: true"));
}

#[test]
fn test_config_defaults_validate() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_config_rejects_non_http_url() {
    let mut config = Config::default();
    config.arxiv_api_url = "ftp://export.arxiv.org/api/query".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.gemini_api_url = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_zero_timeout() {
    let mut config = Config::default();
    config.generation_timeout = Duration::ZERO;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_blank_model_keeps_default() {
    let config = Config::default().with_default_model("  ");
    assert_eq!(config.default_model, "gemini-2.0-flash");

    let config = Config::default().with_default_model("gemini-2.5-flash");
    assert_eq!(config.default_model, "gemini-2.5-flash");
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_arxiv_client_creation_succeeds() {
    let client = ArxivClient::new(&Config::default());
    assert!(client.is_ok());
    assert_eq!(client.unwrap().api_url(), "https://export.arxiv.org/api/query");
}

#[test]
fn test_gemini_client_reports_configuration() {
    let client = GeminiClient::new(&Config::new(Some("key".to_string()))).unwrap();
    assert!(client.has_api_key());
    assert!(client.is_configured());

    let client_no_key = GeminiClient::new(&Config::default()).unwrap();
    assert!(!client_no_key.has_api_key());
    assert!(!client_no_key.is_configured());
}

#[test]
fn test_gemini_client_debug_hides_api_key() {
    let client = GeminiClient::new(&Config::new(Some("super-secret".to_string()))).unwrap();
    assert!(!format!("{client:?}").contains("super-secret"));
}

#[test]
fn test_context_uses_configured_default_model() {
    let config = Config::for_testing("http://localhost:9").with_default_model("gemini-2.5-pro");
    let ctx = RelayContext::from_config(&config).unwrap();
    assert_eq!(ctx.themes.default_model(), "gemini-2.5-pro");
}

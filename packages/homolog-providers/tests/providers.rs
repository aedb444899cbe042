use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

use homolog_config::LlmProviderConfig;
use homolog_providers::{Error, disambiguation};

#[test]
fn builds_bearer_auth_header_with_defaults() {
	let mut defaults = Map::new();

	defaults.insert("x-partner".to_string(), Value::String("acme".to_string()));

	let headers =
		homolog_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get(AUTHORIZATION).expect("Missing authorization header."), "Bearer secret");
	assert_eq!(headers.get("x-partner").expect("Missing default header."), "acme");
}

#[test]
fn rejects_non_string_default_header() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = homolog_providers::auth_headers("secret", &defaults).expect_err("Expected error.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn disambiguation_without_options_abstains_without_calling_out() {
	let cfg = LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "key".to_string(),
		path: "/chat/completions".to_string(),
		model: "m".to_string(),
		temperature: 0.1,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	};
	let answer = disambiguation::disambiguate(&cfg, "COROLLA 2020", &[])
		.await
		.expect("Empty options must not reach the network.");

	assert_eq!(answer.selected_id, None);
}

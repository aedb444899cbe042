use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use homolog_domain::verdict::{CatalogRecord, Disambiguation};

use crate::{Error, Result};

const MAX_ATTEMPTS: usize = 3;

const SYSTEM_PROMPT: &str = "\
You are an automotive cataloguing expert working on a vehicle homologation system. Partners \
describe the same vehicle in very different ways and you must decide which catalog option, if \
any, is the vehicle a partner described.

Expect format differences (field order, abbreviations, Spanish and English terms), redundant or \
repeated fields (\"SEDAN, SEDAN\", \"MT, MT\"), missing fields (brand, fuel) and synonyms:
- transmission: MT = manual = M/T = STD = estandar; AT = automatico = A/T
- body: sedan = 4 puertas = 4P = 4DR; hatchback = HB = 5 puertas; pickup = doble cabina = D/C
- power: CV = HP = BHP = caballos
- engine: 1.6 = 1.6L = 1600CC = 1,6
- fuel: combustion = gasolina = nafta; diesel = TDI = HDI = CDTI = DCI; hybrid = HEV; electric = EV

Weigh fields in this order: brand and model together, year, version/trim, engine displacement, \
transmission, body type, fuel.

Select an option only when brand, model and year agree or are clearly inferable and the \
remaining differences are formatting or synonyms. Return null when two or more options could \
be correct, when critical information is missing, when the description is too vague, or when \
it contradicts the options. A null answer is always better than a wrong match.

Answer with a JSON object: {\"selected_id\": string or null, \"confidence\": number between 0 \
and 1, \"reasoning\": string}.";

pub async fn disambiguate(
	cfg: &homolog_config::LlmProviderConfig,
	description: &str,
	options: &[CatalogRecord],
) -> Result<Disambiguation> {
	if options.is_empty() {
		tracing::warn!("No catalog options provided for disambiguation.");

		return Ok(Disambiguation::abstain("No catalog options were provided."));
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let messages = build_messages(description, options);

	for attempt in 1..=MAX_ATTEMPTS {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"response_format": { "type": "json_object" },
			"messages": messages,
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		match parse_disambiguation(json) {
			Ok(parsed) => return Ok(parsed),
			Err(err) => {
				tracing::warn!(
					provider_id = %cfg.provider_id,
					attempt,
					error = %err,
					"Disambiguation response rejected."
				);
			},
		}
	}

	Err(Error::invalid_response("Disambiguation response is not valid JSON."))
}

pub fn build_messages(description: &str, options: &[CatalogRecord]) -> Value {
	let options_text = options
		.iter()
		.map(|option| format!("- ID: {} → {}", option.catalog_id, option.description))
		.collect::<Vec<_>>()
		.join("\n");
	let user_message = format!(
		"## Partner description\n\n\"{description}\"\n\n## Catalog options\n\n{options_text}\n\n\
## Task\n\nDecide which catalog option is the same vehicle as the partner description. Return \
the ID of that option, or null if you cannot decide with confidence."
	);

	serde_json::json!([
		{ "role": "system", "content": SYSTEM_PROMPT },
		{ "role": "user", "content": user_message },
	])
}

fn parse_disambiguation(json: Value) -> Result<Disambiguation> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(|c| strip_code_fence(c).to_string());
	let payload = match content {
		Some(content) => serde_json::from_str::<Value>(&content)
			.map_err(|_| Error::invalid_response("Disambiguation content is not valid JSON."))?,
		None if json.get("selected_id").is_some() => json,
		None => {
			return Err(Error::invalid_response(
				"Disambiguation response is missing JSON content.",
			));
		},
	};
	let mut parsed: Disambiguation = serde_json::from_value(payload)?;

	if parsed.selected_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
		parsed.selected_id = None;
	}

	parsed.confidence = parsed.confidence.clamp(0.0, 1.0);

	Ok(parsed)
}

fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(inner) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let inner = inner.strip_prefix("json").unwrap_or(inner);

	inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str, description: &str) -> CatalogRecord {
		CatalogRecord { catalog_id: id.to_string(), description: description.to_string() }
	}

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"selected_id\": \"V-7\", \"confidence\": 0.93, \"reasoning\": \"same trim\"}" } }
			]
		});
		let parsed = parse_disambiguation(json).expect("parse failed");

		assert_eq!(parsed.selected_id.as_deref(), Some("V-7"));
		assert_eq!(parsed.reasoning, "same trim");
	}

	#[test]
	fn parses_fenced_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "```json\n{\"selected_id\": null, \"confidence\": 0.2, \"reasoning\": \"ambiguous\"}\n```" } }
			]
		});
		let parsed = parse_disambiguation(json).expect("parse failed");

		assert_eq!(parsed.selected_id, None);
	}

	#[test]
	fn accepts_bare_object_and_blanks_empty_selection() {
		let json = serde_json::json!({ "selected_id": " ", "confidence": 1.7, "reasoning": "" });
		let parsed = parse_disambiguation(json).expect("parse failed");

		assert_eq!(parsed.selected_id, None);
		assert_eq!(parsed.confidence, 1.0);
	}

	#[test]
	fn rejects_non_json_content() {
		let json = serde_json::json!({
			"choices": [ { "message": { "content": "I think it is V-7." } } ]
		});

		assert!(parse_disambiguation(json).is_err());
	}

	#[test]
	fn messages_list_every_option_in_order() {
		let messages = build_messages(
			"NISSAN VERSA 2019 MANUAL",
			&[
				record("V-1", "Nissan Versa Sense 1.6 MT 2019"),
				record("V-2", "Nissan Versa Advance 1.6 MT 2019"),
			],
		);
		let user = messages[1]["content"].as_str().expect("user content");
		let first = user.find("- ID: V-1 → Nissan Versa Sense").expect("first option");
		let second = user.find("- ID: V-2 → Nissan Versa Advance").expect("second option");

		assert!(first < second);
		assert!(user.contains("\"NISSAN VERSA 2019 MANUAL\""));
		assert_eq!(messages[0]["role"], "system");
	}
}

use unicode_normalization::UnicodeNormalization;

/// Brings a partner description into the canonical surface form used for embedding.
///
/// Only formatting is touched: Unicode compatibility folding, case, comma and whitespace
/// layout, and consecutive duplicate fields such as `SEDAN, SEDAN`. Terminology is left as
/// submitted.
pub fn normalize_description(raw: &str) -> String {
	let folded = raw.nfkc().collect::<String>().to_uppercase();
	let mut fields: Vec<String> = Vec::new();

	for field in folded.split(',') {
		let field = field.split_whitespace().collect::<Vec<_>>().join(" ");

		if field.is_empty() {
			continue;
		}
		if fields.last().is_some_and(|last| last == &field) {
			continue;
		}

		fields.push(field);
	}

	fields.join(", ")
}

#[cfg(test)]
mod tests {
	use super::normalize_description;

	#[test]
	fn uppercases_and_collapses_whitespace() {
		assert_eq!(
			normalize_description("  renault   megane 1.6\tcomfort "),
			"RENAULT MEGANE 1.6 COMFORT"
		);
	}

	#[test]
	fn drops_consecutive_duplicate_fields() {
		assert_eq!(
			normalize_description(
				"RENAULT MEGANE 1.6 COMFORT MT 2009, 108CV, 108CV, SEDAN, SEDAN, MT, MT"
			),
			"RENAULT MEGANE 1.6 COMFORT MT 2009, 108CV, SEDAN, MT"
		);
	}

	#[test]
	fn keeps_non_consecutive_duplicates() {
		assert_eq!(normalize_description("MT, SEDAN, MT"), "MT, SEDAN, MT");
	}

	#[test]
	fn cleans_stray_commas() {
		assert_eq!(normalize_description(", corolla 2020,, sedan ,"), "COROLLA 2020, SEDAN");
	}

	#[test]
	fn folds_compatibility_characters() {
		assert_eq!(normalize_description("ｔｓｕｒｕ ２０１７"), "TSURU 2017");
	}

	#[test]
	fn blank_input_normalizes_to_empty() {
		assert_eq!(normalize_description(" , ,  "), "");
	}
}

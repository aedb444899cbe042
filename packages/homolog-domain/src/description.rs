use crate::normalize::normalize_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionReject {
	Empty,
}

/// A partner description as submitted, paired with its normalized surface form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
	raw: String,
	normalized: String,
}
impl Description {
	pub fn new(raw: impl Into<String>) -> Result<Self, DescriptionReject> {
		let raw = raw.into();
		let normalized = normalize_description(&raw);

		if normalized.is_empty() {
			return Err(DescriptionReject::Empty);
		}

		Ok(Self { raw, normalized })
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	pub fn normalized(&self) -> &str {
		&self.normalized
	}
}

#[cfg(test)]
mod tests {
	use super::{Description, DescriptionReject};

	#[test]
	fn keeps_raw_text_untouched() {
		let description = Description::new("Corolla 2020 automatico, sedán").expect("valid");

		assert_eq!(description.raw(), "Corolla 2020 automatico, sedán");
		assert_eq!(description.normalized(), "COROLLA 2020 AUTOMATICO, SEDÁN");
	}

	#[test]
	fn rejects_blank_text() {
		assert_eq!(Description::new("   ").unwrap_err(), DescriptionReject::Empty);
		assert_eq!(Description::new(",,").unwrap_err(), DescriptionReject::Empty);
	}
}

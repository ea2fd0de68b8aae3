use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CategoryRecord {
	pub id: i64,
	pub name: String,
	pub slug: String,
	#[serde(default, deserialize_with = "lenient_count")]
	pub product_count: Option<u64>,
}

/// A directory listing as served by the backend. Fields the map does not
/// interpret are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProductRecord {
	pub id: i64,
	pub name: String,
	#[serde(default)]
	pub category_name: Option<String>,
	#[serde(default)]
	pub category_slug: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl ProductRecord {
	pub fn display_field(&self, key: &str) -> Option<&str> {
		self.extra.get(key).and_then(Value::as_str)
	}

	pub fn description(&self) -> Option<&str> {
		self.display_field("description")
	}
}

// COUNT(*) columns come back from Postgres as strings.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::Number(n)) => n.as_u64(),
		Some(Value::String(s)) => s.trim().parse().ok(),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn category_count_accepts_numbers_and_numeric_strings() {
		let cats: Vec<CategoryRecord> = serde_json::from_str(
			r#"[
				{"id": 1, "name": "Cloud", "slug": "cloud", "product_count": 4},
				{"id": 2, "name": "Identity", "slug": "identity", "product_count": "7"},
				{"id": 3, "name": "Storage", "slug": "storage", "product_count": "n/a"},
				{"id": 4, "name": "Edge", "slug": "edge"}
			]"#,
		)
		.unwrap();
		let counts: Vec<_> = cats.iter().map(|c| c.product_count).collect();
		assert_eq!(counts, vec![Some(4), Some(7), None, None]);
	}

	#[test]
	fn product_keeps_unknown_fields_as_payload() {
		let p: ProductRecord = serde_json::from_str(
			r#"{"id": 9, "name": "Vault", "category_slug": "identity",
				"description": "Secrets", "verified_status": true, "language": null}"#,
		)
		.unwrap();
		assert_eq!(p.category_name, None);
		assert_eq!(p.category_slug.as_deref(), Some("identity"));
		assert_eq!(p.description(), Some("Secrets"));
		assert_eq!(p.display_field("language"), None);
		assert_eq!(p.display_field("verified_status"), None);
		assert_eq!(p.extra.len(), 3);
	}
}

use thiserror::Error;

/// Outcome of a failed catalog call. Never fatal; surfaced inline by the page.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
	#[error("no card matched \"{query}\"")]
	NotFound { query: String },

	#[error("catalog unreachable: {0}")]
	Network(String),

	#[error("catalog returned HTTP {0}")]
	Status(u16),

	#[error("malformed catalog response: {0}")]
	Malformed(String),
}

impl CatalogError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, CatalogError::NotFound { .. })
	}
}

impl From<reqwest::Error> for CatalogError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			CatalogError::Malformed(err.to_string())
		} else {
			CatalogError::Network(err.to_string())
		}
	}
}

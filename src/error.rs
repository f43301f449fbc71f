use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("Catalog not loaded: call initialize first")]
	NotLoaded,
	#[error("Malformed catalog document: {0}")]
	Malformed(String),
	#[error("Collection not found: {0}")]
	CollectionNotFound(String),
	#[error("Empty field: {0}")]
	EmptyField(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Storage corruption: {0}")]
	Corruption(String),
}

impl CatalogError {
	pub fn code(&self) -> &str {
		match self {
			Self::NotLoaded => "CATALOG_NOT_LOADED",
			Self::Malformed(_) => "CATALOG_MALFORMED",
			Self::CollectionNotFound(_) => "CATALOG_COLLECTION_NOT_FOUND",
			Self::EmptyField(_) => "CATALOG_EMPTY_FIELD",
			Self::Io(_) => "CATALOG_IO",
			Self::Serialization(_) => "CATALOG_SERIALIZATION",
			Self::Corruption(_) => "CATALOG_CORRUPT",
		}
	}
}

use std::fmt;
use serde::{Deserialize, Serialize};

/// Opaque product identifier shared by the catalog and the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductCode(String);

impl ProductCode {
    /// Builds a code, rejecting blank identifiers.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductCode {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code).ok_or_else(|| "product code must not be blank".to_string())
    }
}

impl From<ProductCode> for String {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product.
///
/// `in_stock` is a read-path view only: it is filled in on the copy handed
/// back by enrichment and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: ProductCode,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub in_stock: bool,
}

/// Payload for registering a new product in the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub code: ProductCode,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Payload for changing catalog attributes of an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

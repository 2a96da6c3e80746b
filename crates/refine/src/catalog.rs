//! Catalog items as supplied by the storefront.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A canonical catalog entry. Read-only to the filter: results are always
/// clones of the items the caller passed in.
///
/// `id` is the identity the model sees and answers with. Exports that only
/// carry a `handle` use it as the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawCatalogItem")]
pub struct CatalogItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Provider fields the filter carries through but never shows the model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawCatalogItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    handle: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "price_from_number_or_string")]
    price: f64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawCatalogItem> for CatalogItem {
    type Error = String;

    fn try_from(raw: RawCatalogItem) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or_else(|| raw.handle.clone())
            .ok_or_else(|| format!("catalog item {:?} has neither id nor handle", raw.title))?;
        Ok(Self {
            id,
            handle: raw.handle,
            title: raw.title,
            description: raw.description,
            price: raw.price,
            extra: raw.extra,
        })
    }
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            handle: None,
            title: title.into(),
            description: description.into(),
            price,
            extra: Map::new(),
        }
    }

    pub fn simplified(&self) -> SimplifiedItem<'_> {
        SimplifiedItem {
            id: &self.id,
            title: &self.title,
            description: &self.description,
            price: self.price,
        }
    }
}

/// Projection of a [`CatalogItem`] sent to the understanding service.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SimplifiedItem<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
}

fn price_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let value = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(value) => value,
        RawPrice::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price {text:?}")))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!("price {value} is not finite")));
    }
    Ok(value)
}

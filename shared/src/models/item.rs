//! Item Model (catalog entry with variations)

use serde::{Deserialize, Serialize};

/// Item category (closed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ItemCategory {
    IceCream,
    Samosa,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IceCream => "ice_cream",
            Self::Samosa => "samosa",
        }
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ice_cream" => Ok(Self::IceCream),
            "samosa" => Ok(Self::Samosa),
            other => Err(format!(
                "Unknown category '{other}', expected one of: ice_cream, samosa"
            )),
        }
    }
}

/// A size/pack option of an item with its own cost, price and stock level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub label: String,
    #[serde(default)]
    pub base_cost: f64,
    pub price: f64,
    /// Stock level
    #[serde(default)]
    pub quantity: i64,
}

/// Item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: ItemCategory,
    /// Ordered variations (embedded JSON document)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub variations: Vec<Variation>,
    /// Ordered image URLs (embedded JSON document)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Item {
    /// Find a variation by its exact label
    pub fn variation(&self, label: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.label == label)
    }
}

/// Create item payload (assembled from the multipart form)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreate {
    pub name: String,
    pub category: ItemCategory,
    pub variations: Vec<Variation>,
    pub images: Vec<String>,
}

/// Update item payload
///
/// `images` are appended to the stored list unless `replace_images` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    pub variations: Option<Vec<Variation>>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub replace_images: bool,
}

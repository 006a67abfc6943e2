use serde::{Deserialize, Serialize};

/// Closed set of point categories, declared in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Stage,
    BusStop,
    Pub,
    Activity,
    Photo,
    FoodTruck,
    Parking,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Stage,
        Category::BusStop,
        Category::Pub,
        Category::Activity,
        Category::Photo,
        Category::FoodTruck,
        Category::Parking,
    ];

    /// Wire key, identical to the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Category::Stage => "stage",
            Category::BusStop => "busStop",
            Category::Pub => "pub",
            Category::Activity => "activity",
            Category::Photo => "photo",
            Category::FoodTruck => "foodTruck",
            Category::Parking => "parking",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.key() == key.trim())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Display attributes shared by every point of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub label: String,
    /// CSS color, e.g. `#ef4444`.
    pub color: String,
}

impl CategoryStyle {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

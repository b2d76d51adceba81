use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Dish {
    pub id: String,
    pub name: String,
    /// path to image
    #[builder(default)]
    #[serde(default)]
    pub image: String,
    #[builder(default)]
    #[serde(default)]
    pub category: String,
    #[builder(default)]
    #[serde(default)]
    pub label: String,
    #[builder(default)]
    #[serde(default)]
    pub price: String,
    #[builder(default)]
    #[serde(default)]
    pub featured: bool,
    #[builder(default)]
    #[serde(default)]
    pub description: String,
    #[builder(default)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

pub const DEFAULT_RATING: u8 = 5;

fn default_rating() -> u8 {
    DEFAULT_RATING
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub author: String,
    pub comment: String,
    #[serde(default = "default_rating")]
    pub rating: u8,
    /// ISO-8601 timestamp of submission
    pub date: String,
}

/// Someone from the restaurant's team, listed on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Leader {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub description: String,
}

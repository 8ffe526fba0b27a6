use serde::{Deserialize, Serialize};

use crate::domain::{AdId, CategoryId, TagId, UserId};
use crate::models::catalog::{Category, Tag};
use crate::models::user::User;

/// An ad with its owner, category and tags resolved.
///
/// This is also the unit stored in the search cache, so it must round-trip
/// through JSON without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: AdId,
    pub title: String,
    pub description: String,
    pub owner: User,
    pub price: f64,
    pub weight_grams: i32,
    pub picture: String,
    pub location: String,
    pub created_at: String,
    pub category: Category,
    pub tags: Vec<Tag>,
}

impl AdRecord {
    /// One-line summary used by the CLI listing.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} | {:.2} €",
            self.id, self.title, self.owner.email, self.price
        )
    }
}

/// Input for creating an ad. Owner, category and tags are references that
/// must resolve before anything is written.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAd {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: UserId,
    pub price: f64,
    #[serde(default)]
    pub weight_grams: i32,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub location: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Partial update. `tag_ids`, when present, replaces the whole tag set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub weight_grams: Option<i32>,
    pub picture: Option<String>,
    pub location: Option<String>,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Option<Vec<TagId>>,
}

/// Fully resolved row handed to the repository for insert-or-update.
#[derive(Debug, Clone, PartialEq)]
pub struct AdWrite {
    pub id: AdId,
    pub title: String,
    pub description: String,
    pub owner_id: UserId,
    pub price: f64,
    pub weight_grams: i32,
    pub picture: String,
    pub location: String,
    pub category_id: CategoryId,
    pub created_at: String,
    pub tag_ids: Vec<TagId>,
}

impl AdWrite {
    /// Starts a write from the current state of an existing ad.
    #[must_use]
    pub fn from_record(record: &AdRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            owner_id: record.owner.id,
            price: record.price,
            weight_grams: record.weight_grams,
            picture: record.picture.clone(),
            location: record.location.clone(),
            category_id: record.category.id,
            created_at: record.created_at.clone(),
            tag_ids: record.tags.iter().map(|t| t.id).collect(),
        }
    }

    /// Applies the scalar fields of a patch. Reference fields are applied by
    /// the caller once they have been resolved.
    pub fn apply_scalars(&mut self, patch: &AdPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(weight) = patch.weight_grams {
            self.weight_grams = weight;
        }
        if let Some(picture) = &patch.picture {
            self.picture.clone_from(picture);
        }
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
    }
}

/// Text search options. `limit: None` means every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSearch {
    pub order: crate::config::SearchOrder,
    pub limit: Option<u64>,
}

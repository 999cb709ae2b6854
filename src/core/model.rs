//! Domain records for the catalog.
//!
//! Field names follow the camelCase read contract used by import files
//! (`compatibleWith`, `dateAdded`, `isCurrent`, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub creator: String,
    /// Category tag, e.g. "clothing" or "prop". Free-form.
    #[serde(rename = "type", default)]
    pub asset_type: String,
    /// Raw price as entered, e.g. "$12.50". Parsed leniently when aggregated.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Avatar base names this asset is made for.
    #[serde(default)]
    pub compatible_with: Vec<String>,
    /// ISO-8601 timestamp, kept raw so a malformed value never blocks a load.
    #[serde(default)]
    pub date_added: Option<String>,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub nsfw: bool,
    /// Variants of a multi-variant product that the user owns.
    #[serde(default)]
    pub owned_variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: String,
    pub name: String,
    /// Rig family the avatar is built on. Compatibility is evaluated per base.
    pub base: String,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub asset_ids: Vec<String>,
    /// Avatars this collection is linked to.
    #[serde(default)]
    pub avatar_ids: Vec<String>,
}

impl Collection {
    /// Adds an asset id, keeping membership a set. Returns false if already present.
    pub fn add_asset(&mut self, asset_id: &str) -> bool {
        if self.asset_ids.iter().any(|id| id == asset_id) {
            return false;
        }
        self.asset_ids.push(asset_id.to_string());
        true
    }

    pub fn link_avatar(&mut self, avatar_id: &str) -> bool {
        if self.avatar_ids.iter().any(|id| id == avatar_id) {
            return false;
        }
        self.avatar_ids.push(avatar_id.to_string());
        true
    }
}

/// Fields needed to create a collection from a selection list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionDraft {
    pub name: String,
    pub description: Option<String>,
}

/// One entry picked from a selection list: either an existing record or a
/// draft for a record to be created.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<D> {
    Existing(String),
    CreateNew(D),
}

/// A point-in-time view of every record in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub avatars: Vec<Avatar>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

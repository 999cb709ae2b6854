//! The single boundary between domain records and their stored form.
//!
//! Stored rows keep the flat shape of the original table layout: flags are
//! `0`/`1` integers and list fields are JSON text columns. Nothing outside
//! this module sees that representation.
use crate::core::model::{Asset, Avatar, Collection};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A domain record that can be written to a named store collection.
pub trait Record: Sized {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn encode(&self) -> Result<Vec<u8>>;
    fn decode(bytes: &[u8]) -> Result<Self>;
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn from_flag(value: u8) -> bool {
    value != 0
}

fn list_column(values: &[String]) -> Result<String> {
    serde_json::to_string(values).context("Failed to encode list column")
}

fn from_list_column(text: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).with_context(|| format!("Malformed list column: {text}"))
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAsset {
    id: String,
    name: String,
    creator: String,
    #[serde(rename = "type")]
    asset_type: String,
    price: Option<String>,
    currency: Option<String>,
    tags: String,
    compatible_with: String,
    date_added: Option<String>,
    favorited: u8,
    nsfw: u8,
    owned_variant: String,
}

impl Record for Asset {
    const COLLECTION: &'static str = "assets";

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let row = StoredAsset {
            id: self.id.clone(),
            name: self.name.clone(),
            creator: self.creator.clone(),
            asset_type: self.asset_type.clone(),
            price: self.price.clone(),
            currency: self.currency.clone(),
            tags: list_column(&self.tags)?,
            compatible_with: list_column(&self.compatible_with)?,
            date_added: self.date_added.clone(),
            favorited: flag(self.favorited),
            nsfw: flag(self.nsfw),
            owned_variant: list_column(&self.owned_variants)?,
        };
        Ok(serde_json::to_vec(&row)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let row: StoredAsset = serde_json::from_slice(bytes).context("Malformed asset row")?;
        Ok(Asset {
            tags: from_list_column(&row.tags)?,
            compatible_with: from_list_column(&row.compatible_with)?,
            owned_variants: from_list_column(&row.owned_variant)?,
            favorited: from_flag(row.favorited),
            nsfw: from_flag(row.nsfw),
            id: row.id,
            name: row.name,
            creator: row.creator,
            asset_type: row.asset_type,
            price: row.price,
            currency: row.currency,
            date_added: row.date_added,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAvatar {
    id: String,
    name: String,
    base: String,
    favorited: u8,
    is_current: u8,
}

impl Record for Avatar {
    const COLLECTION: &'static str = "avatars";

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let row = StoredAvatar {
            id: self.id.clone(),
            name: self.name.clone(),
            base: self.base.clone(),
            favorited: flag(self.favorited),
            is_current: flag(self.is_current),
        };
        Ok(serde_json::to_vec(&row)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let row: StoredAvatar = serde_json::from_slice(bytes).context("Malformed avatar row")?;
        Ok(Avatar {
            id: row.id,
            name: row.name,
            base: row.base,
            favorited: from_flag(row.favorited),
            is_current: from_flag(row.is_current),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCollection {
    id: String,
    name: String,
    description: Option<String>,
    asset_ids: String,
    avatar_ids: String,
}

impl Record for Collection {
    const COLLECTION: &'static str = "collections";

    fn id(&self) -> &str {
        &self.id
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let row = StoredCollection {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            asset_ids: list_column(&self.asset_ids)?,
            avatar_ids: list_column(&self.avatar_ids)?,
        };
        Ok(serde_json::to_vec(&row)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let row: StoredCollection =
            serde_json::from_slice(bytes).context("Malformed collection row")?;
        Ok(Collection {
            asset_ids: from_list_column(&row.asset_ids)?,
            avatar_ids: from_list_column(&row.avatar_ids)?,
            id: row.id,
            name: row.name,
            description: row.description,
        })
    }
}

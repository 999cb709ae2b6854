//! Lookups over a catalog snapshot.
//!
//! Id-based entry points check existence first and fail with
//! [`CatalogError::NotFound`] before any resolution runs.
use crate::core::compat::{self, CompatQuery, CompatibilityMatrix, CompatibilityResult};
use crate::core::error::{CatalogError, RecordKind, Result};
use crate::core::model::{Asset, Avatar, Catalog, Collection};
use std::collections::HashSet;
use tracing::debug;

/// Criteria for listing assets. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub asset_type: Option<String>,
    pub tag: Option<String>,
    pub favorites_only: bool,
    pub hide_nsfw: bool,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        if let Some(asset_type) = &self.asset_type {
            if !asset.asset_type.eq_ignore_ascii_case(asset_type) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !asset.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if self.favorites_only && !asset.favorited {
            return false;
        }
        !(self.hide_nsfw && asset.nsfw)
    }
}

impl Catalog {
    pub fn asset(&self, id: &str) -> Result<&Asset> {
        self.assets
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Asset, id))
    }

    pub fn avatar(&self, id: &str) -> Result<&Avatar> {
        self.avatars
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Avatar, id))
    }

    pub fn collection(&self, id: &str) -> Result<&Collection> {
        self.collections
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Collection, id))
    }

    /// The avatar marked as currently worn, if any.
    pub fn current_avatar(&self) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.is_current)
    }

    pub fn check_asset(
        &self,
        matrix: &CompatibilityMatrix,
        asset_id: &str,
        avatar_id: &str,
    ) -> Result<CompatibilityResult> {
        let asset = self.asset(asset_id)?;
        let avatar = self.avatar(avatar_id)?;
        debug!("Checking asset {} against avatar {}", asset.id, avatar.id);
        Ok(compat::resolve(
            matrix,
            CompatQuery::AssetToAvatar {
                compatible_with: &asset.compatible_with,
                avatar_base: &avatar.base,
            },
        ))
    }

    pub fn check_avatars(
        &self,
        matrix: &CompatibilityMatrix,
        source_id: &str,
        target_id: &str,
    ) -> Result<CompatibilityResult> {
        let source = self.avatar(source_id)?;
        let target = self.avatar(target_id)?;
        debug!("Checking avatar {} against avatar {}", source.id, target.id);
        Ok(compat::resolve(
            matrix,
            CompatQuery::AvatarToAvatar {
                source_base: &source.base,
                target_base: &target.base,
            },
        ))
    }

    /// Assets made for the avatar's base, plus assets in collections linked
    /// to the avatar. Catalog order, no duplicates.
    pub fn assets_for_avatar(&self, avatar_id: &str) -> Result<Vec<&Asset>> {
        let avatar = self.avatar(avatar_id)?;
        let linked: HashSet<&str> = self
            .collections
            .iter()
            .filter(|c| c.avatar_ids.iter().any(|id| id == avatar_id))
            .flat_map(|c| c.asset_ids.iter().map(String::as_str))
            .collect();

        Ok(self
            .assets
            .iter()
            .filter(|a| {
                a.compatible_with.iter().any(|base| *base == avatar.base)
                    || linked.contains(a.id.as_str())
            })
            .collect())
    }

    pub fn filter_assets(&self, filter: &AssetFilter) -> Vec<&Asset> {
        self.assets.iter().filter(|a| filter.matches(a)).collect()
    }
}

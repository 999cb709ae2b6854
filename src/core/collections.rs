//! Collection membership and avatar links, written through the store.
use crate::core::error::{CatalogError, RecordKind};
use crate::core::model::{Asset, Avatar, Collection, CollectionDraft, Selection};
use crate::store::CatalogStore;
use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

/// Adds an asset to every selected collection, creating the `CreateNew` ones.
/// Returns the ids of the collections the asset now belongs to.
pub fn assign_asset(
    store: &CatalogStore,
    asset_id: &str,
    selections: &[Selection<CollectionDraft>],
) -> Result<Vec<String>> {
    if store.get::<Asset>(asset_id)?.is_none() {
        return Err(CatalogError::not_found(RecordKind::Asset, asset_id).into());
    }

    let mut assigned = Vec::with_capacity(selections.len());
    for selection in selections {
        let mut collection = match selection {
            Selection::Existing(id) => store
                .get::<Collection>(id)?
                .ok_or_else(|| CatalogError::not_found(RecordKind::Collection, id))?,
            Selection::CreateNew(draft) => {
                let collection = Collection {
                    id: new_collection_id(store, &draft.name)?,
                    name: draft.name.clone(),
                    description: draft.description.clone(),
                    ..Default::default()
                };
                info!("Creating collection {} ({})", collection.name, collection.id);
                collection
            }
        };

        if collection.add_asset(asset_id) {
            debug!("Added {asset_id} to collection {}", collection.id);
        }
        store.put(&collection)?;
        assigned.push(collection.id);
    }
    Ok(assigned)
}

/// Links a collection to an avatar. Both must exist.
pub fn link_avatar(store: &CatalogStore, collection_id: &str, avatar_id: &str) -> Result<()> {
    let mut collection = store
        .get::<Collection>(collection_id)?
        .ok_or_else(|| CatalogError::not_found(RecordKind::Collection, collection_id))?;
    if store.get::<Avatar>(avatar_id)?.is_none() {
        return Err(CatalogError::not_found(RecordKind::Avatar, avatar_id).into());
    }

    if collection.link_avatar(avatar_id) {
        store.put(&collection)?;
        info!("Linked collection {collection_id} to avatar {avatar_id}");
    }
    Ok(())
}

/// Slug of the name plus a timestamp suffix, bumped until unused.
fn new_collection_id(store: &CatalogStore, name: &str) -> Result<String> {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "collection" } else { slug };

    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = format!("{slug}-{stamp:x}");
        if store.get::<Collection>(&id)?.is_none() {
            return Ok(id);
        }
        stamp += 1;
    }
}

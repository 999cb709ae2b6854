use crate::core::collections;
use crate::core::model::{CollectionDraft, Selection};
use crate::store::CatalogStore;
use anyhow::{Result, bail};

/// Adds an asset to existing collections (`to`) and to new ones named in `new`.
pub fn run_add(store: &CatalogStore, asset_id: &str, to: &[String], new: &[String]) -> Result<()> {
    if to.is_empty() && new.is_empty() {
        bail!("Pick at least one collection with --to or --new");
    }

    let selections: Vec<Selection<CollectionDraft>> = to
        .iter()
        .map(|id| Selection::Existing(id.clone()))
        .chain(new.iter().map(|name| {
            Selection::CreateNew(CollectionDraft {
                name: name.clone(),
                description: None,
            })
        }))
        .collect();

    let assigned = collections::assign_asset(store, asset_id, &selections)?;
    println!("Added {asset_id} to: {}", assigned.join(", "));
    Ok(())
}

pub fn run_link(store: &CatalogStore, collection_id: &str, avatar_id: &str) -> Result<()> {
    collections::link_avatar(store, collection_id, avatar_id)?;
    println!("Linked {collection_id} to {avatar_id}");
    Ok(())
}

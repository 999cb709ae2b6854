pub mod cli;
pub mod core;
pub mod store;

use crate::core::catalog::AssetFilter;
use crate::core::config::AppConfig;
use crate::store::CatalogStore;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands that operate on a loaded config and an open catalog.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Import {
        path: PathBuf,
    },
    Assets(AssetFilter),
    Avatars,
    Wearable {
        avatar_id: Option<String>,
    },
    Stats {
        currency: Option<String>,
    },
    CompatAsset {
        asset_id: String,
        avatar_id: String,
    },
    CompatAvatars {
        source_id: String,
        target_id: String,
    },
    CollectionAdd {
        asset_id: String,
        to: Vec<String>,
        new: Vec<String>,
    },
    CollectionLink {
        collection_id: String,
        avatar_id: String,
    },
    Setting {
        key: String,
        value: Option<String>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => {
            let path = AppConfig::default_config_path()?;
            if path.exists() {
                AppConfig::load_from_path(&path)
            } else {
                debug!("No config at {}, using defaults", path.display());
                Ok(AppConfig::default())
            }
        }
    }
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("avtr starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");
    let store = CatalogStore::open(&config)?;

    match command {
        AppCommand::Import { path } => cli::import::run(&store, &path).map(|_| ()),
        AppCommand::Assets(filter) => cli::list::run_assets(&store, &filter),
        AppCommand::Avatars => cli::list::run_avatars(&store),
        AppCommand::Wearable { avatar_id } => {
            cli::list::run_wearable(&store, avatar_id.as_deref())
        }
        AppCommand::Stats { currency } => cli::stats::run(&store, &config, currency.as_deref()),
        AppCommand::CompatAsset {
            asset_id,
            avatar_id,
        } => cli::compat::run_asset(&store, &config.matrix(), &asset_id, &avatar_id),
        AppCommand::CompatAvatars {
            source_id,
            target_id,
        } => cli::compat::run_avatars(&store, &config.matrix(), &source_id, &target_id),
        AppCommand::CollectionAdd { asset_id, to, new } => {
            cli::collection::run_add(&store, &asset_id, &to, &new)
        }
        AppCommand::CollectionLink {
            collection_id,
            avatar_id,
        } => cli::collection::run_link(&store, &collection_id, &avatar_id),
        AppCommand::Setting { key, value } => cli::setting::run(&store, &key, value.as_deref()),
    }
}

use anyhow::Result;
use avtr::core::catalog::AssetFilter;
use avtr::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Import assets, avatars and collections from a JSON file
    Import { path: PathBuf },
    /// List assets
    Assets {
        /// Only assets of this type
        #[arg(long = "type")]
        asset_type: Option<String>,
        /// Only assets with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Only favorited assets
        #[arg(long)]
        favorites: bool,
        /// Leave out NSFW assets
        #[arg(long)]
        hide_nsfw: bool,
    },
    /// List avatars
    Avatars,
    /// List assets an avatar can wear
    Wearable {
        /// Avatar id (defaults to the current avatar)
        avatar_id: Option<String>,
    },
    /// Display spending per currency, category and month
    Stats {
        /// Currency to break down (remembered for next time)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Check compatibility
    #[command(subcommand)]
    Compat(CompatCommands),
    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommands),
    /// Show or change a setting
    Setting { key: String, value: Option<String> },
}

#[derive(Subcommand)]
enum CompatCommands {
    /// Check an asset against an avatar
    Asset { asset_id: String, avatar_id: String },
    /// Check one avatar's base against another's
    Avatars {
        source_id: String,
        target_id: String,
    },
}

#[derive(Subcommand)]
enum CollectionCommands {
    /// Add an asset to collections
    Add {
        asset_id: String,
        /// Existing collection id
        #[arg(long)]
        to: Vec<String>,
        /// Name of a collection to create
        #[arg(long)]
        new: Vec<String>,
    },
    /// Link a collection to an avatar
    Link {
        collection_id: String,
        avatar_id: String,
    },
}

impl From<Commands> for avtr::AppCommand {
    fn from(cmd: Commands) -> avtr::AppCommand {
        match cmd {
            Commands::Import { path } => avtr::AppCommand::Import { path },
            Commands::Assets {
                asset_type,
                tag,
                favorites,
                hide_nsfw,
            } => avtr::AppCommand::Assets(AssetFilter {
                asset_type,
                tag,
                favorites_only: favorites,
                hide_nsfw,
            }),
            Commands::Avatars => avtr::AppCommand::Avatars,
            Commands::Wearable { avatar_id } => avtr::AppCommand::Wearable { avatar_id },
            Commands::Stats { currency } => avtr::AppCommand::Stats { currency },
            Commands::Compat(CompatCommands::Asset {
                asset_id,
                avatar_id,
            }) => avtr::AppCommand::CompatAsset {
                asset_id,
                avatar_id,
            },
            Commands::Compat(CompatCommands::Avatars {
                source_id,
                target_id,
            }) => avtr::AppCommand::CompatAvatars {
                source_id,
                target_id,
            },
            Commands::Collection(CollectionCommands::Add { asset_id, to, new }) => {
                avtr::AppCommand::CollectionAdd { asset_id, to, new }
            }
            Commands::Collection(CollectionCommands::Link {
                collection_id,
                avatar_id,
            }) => avtr::AppCommand::CollectionLink {
                collection_id,
                avatar_id,
            },
            Commands::Setting { key, value } => avtr::AppCommand::Setting { key, value },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => avtr::cli::setup::setup(),
        Some(cmd) => avtr::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

use super::ui;
use crate::core::catalog::AssetFilter;
use crate::core::model::{Asset, Avatar};
use crate::store::CatalogStore;
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn run_assets(store: &CatalogStore, filter: &AssetFilter) -> Result<()> {
    let catalog = store.snapshot()?;
    let assets = catalog.filter_assets(filter);
    if assets.is_empty() {
        println!("No assets found.");
        return Ok(());
    }
    println!("{}", render_assets(&assets));
    Ok(())
}

pub fn run_avatars(store: &CatalogStore) -> Result<()> {
    let catalog = store.snapshot()?;
    if catalog.avatars.is_empty() {
        println!("No avatars found.");
        return Ok(());
    }
    println!("{}", render_avatars(&catalog.avatars));
    Ok(())
}

/// Lists the assets an avatar can wear: made for its base, or in a
/// collection linked to it. Without an id the current avatar is used.
pub fn run_wearable(store: &CatalogStore, avatar_id: Option<&str>) -> Result<()> {
    let catalog = store.snapshot()?;
    let avatar = match avatar_id {
        Some(id) => catalog.avatar(id)?,
        None => catalog
            .current_avatar()
            .context("No current avatar; pass an avatar id")?,
    };

    let assets = catalog.assets_for_avatar(&avatar.id)?;
    println!(
        "{} {} ({})\n",
        ui::style_text("Wearable by", ui::StyleType::TotalLabel),
        avatar.name,
        avatar.base
    );
    if assets.is_empty() {
        println!("No assets found.");
        return Ok(());
    }
    println!("{}", render_assets(&assets));
    Ok(())
}

pub fn render_assets(assets: &[&Asset]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Type"),
        ui::header_cell("Creator"),
        ui::header_cell("Price"),
        ui::header_cell("Bases"),
        ui::header_cell("Tags"),
    ]);

    for asset in assets {
        let name = if asset.favorited {
            format!("★ {}", asset.name)
        } else {
            asset.name.clone()
        };
        let price = asset.price.as_deref().filter(|p| !p.trim().is_empty()).map(|p| {
            match asset.currency.as_deref() {
                Some(currency) => format!("{p} {currency}"),
                None => p.to_string(),
            }
        });

        table.add_row(vec![
            Cell::new(ui::style_text(&asset.id, ui::StyleType::Subtle)),
            Cell::new(name),
            Cell::new(&asset.asset_type),
            Cell::new(&asset.creator),
            ui::format_optional_cell(price, |p| p),
            Cell::new(asset.compatible_with.join(", ")),
            Cell::new(asset.tags.join(", ")),
        ]);
    }

    format!(
        "{}\n\n{table}\n\n{} {}",
        ui::style_text("Assets", ui::StyleType::Title),
        ui::style_text("Total:", ui::StyleType::TotalLabel),
        assets.len()
    )
}

pub fn render_avatars(avatars: &[Avatar]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Base"),
        ui::header_cell("Current"),
    ]);

    for avatar in avatars {
        let name = if avatar.favorited {
            format!("★ {}", avatar.name)
        } else {
            avatar.name.clone()
        };
        let current = if avatar.is_current {
            ui::style_text("yes", ui::StyleType::TotalValue)
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(ui::style_text(&avatar.id, ui::StyleType::Subtle)),
            Cell::new(name),
            Cell::new(&avatar.base),
            Cell::new(current),
        ]);
    }

    format!(
        "{}\n\n{table}",
        ui::style_text("Avatars", ui::StyleType::Title)
    )
}

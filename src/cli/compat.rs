use super::ui;
use crate::core::compat::{CompatibilityMatrix, CompatibilityResult};
use crate::store::CatalogStore;
use anyhow::Result;
use comfy_table::Cell;

/// Asset kinds listed in the reference table under a compatibility result.
const REFERENCE_ROWS: [&str; 3] = ["Clothing", "Accessories", "Animations"];

pub fn run_asset(
    store: &CatalogStore,
    matrix: &CompatibilityMatrix,
    asset_id: &str,
    avatar_id: &str,
) -> Result<()> {
    let catalog = store.snapshot()?;
    let result = catalog.check_asset(matrix, asset_id, avatar_id)?;
    let asset = catalog.asset(asset_id)?;
    let avatar = catalog.avatar(avatar_id)?;

    let title = format!("{} on {} ({})", asset.name, avatar.name, avatar.base);
    println!("{}", render(&title, &result));
    Ok(())
}

pub fn run_avatars(
    store: &CatalogStore,
    matrix: &CompatibilityMatrix,
    source_id: &str,
    target_id: &str,
) -> Result<()> {
    let catalog = store.snapshot()?;
    let result = catalog.check_avatars(matrix, source_id, target_id)?;
    let source = catalog.avatar(source_id)?;
    let target = catalog.avatar(target_id)?;

    let title = format!("{} -> {}", source.base, target.base);
    println!("{}", render(&title, &result));
    Ok(())
}

pub fn render(title: &str, result: &CompatibilityResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Aspect"),
        ui::header_cell("Status"),
        ui::header_cell("Details"),
    ]);
    for aspect in &result.aspects {
        table.add_row(vec![
            Cell::new(aspect.name),
            ui::status_cell(aspect.status),
            Cell::new(&aspect.detail),
        ]);
    }

    let level = result.reference_level();
    let mut reference = ui::new_styled_table();
    reference.set_header(vec![
        ui::header_cell("Asset kind"),
        ui::header_cell("Expected fit"),
    ]);
    for row in REFERENCE_ROWS {
        reference.add_row(vec![Cell::new(row), ui::level_cell(level)]);
    }

    format!(
        "Compatibility: {}\n\n{table}\n\nOverall: {}\n\n{reference}",
        ui::style_text(title, ui::StyleType::Title),
        ui::style_overall(result.overall),
    )
}

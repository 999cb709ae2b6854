use super::ui;
use crate::core::config::AppConfig;
use crate::core::spend::{SpendAggregator, SpendReport, format_amount};
use crate::store::CatalogStore;
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

/// Setting holding the currency last picked for the detailed breakdown.
pub const STATS_CURRENCY: &str = "stats.currency";

const BAR_WIDTH: usize = 24;

pub fn run(store: &CatalogStore, config: &AppConfig, currency: Option<&str>) -> Result<()> {
    let selected = match currency {
        Some(code) => {
            store.put_setting(STATS_CURRENCY, code)?;
            Some(code.to_string())
        }
        None => store.setting(STATS_CURRENCY)?,
    };
    debug!("Stats currency: {selected:?}");

    let catalog = store.snapshot()?;
    let report = SpendAggregator::new(&config.currency).aggregate(&catalog.assets);
    println!("{}", render(&report, selected.as_deref()));
    Ok(())
}

/// Renders the report. With `currency` set, only that currency gets the
/// category and monthly breakdowns; otherwise every currency does.
pub fn render(report: &SpendReport, currency: Option<&str>) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Spending", ui::StyleType::Title));

    if report.currency_totals.is_empty() {
        output.push_str(&format!(
            "No paid assets yet. Free assets: {}\n",
            report.free_count
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Items"),
        ui::header_cell("Total"),
        ui::header_cell("Average"),
        ui::header_cell("Max"),
    ]);
    for bucket in &report.currency_totals {
        let code = bucket.currency.as_str();
        table.add_row(vec![
            Cell::new(code),
            ui::amount_cell(bucket.count.to_string()),
            ui::amount_cell(bucket.display.clone()),
            ui::format_optional_cell(report.average_price.get(code), |v| format_amount(*v, code)),
            ui::format_optional_cell(report.max_price.get(code), |v| format_amount(*v, code)),
        ]);
    }
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {}\n",
        ui::style_text("Free assets:", ui::StyleType::TotalLabel),
        report.free_count
    ));

    let codes: Vec<&str> = match currency {
        Some(code) if report.currency(code).is_some() => vec![code],
        Some(code) => {
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text(
                    &format!("No paid assets in {code}; showing all currencies"),
                    ui::StyleType::Error
                )
            ));
            report.currency_totals.iter().map(|b| b.currency.as_str()).collect()
        }
        None => report.currency_totals.iter().map(|b| b.currency.as_str()).collect(),
    };

    for code in codes {
        output.push_str(&ui::separator());
        output.push_str(&render_categories(report, code));
        output.push_str(&render_months(report, code));
    }
    output
}

fn render_categories(report: &SpendReport, code: &str) -> String {
    let Some(rows) = report.categories.get(code) else {
        return String::new();
    };
    let total = report.currency(code).map_or(0.0, |b| b.total);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Items"),
        ui::header_cell("Total"),
        ui::header_cell("Share"),
    ]);
    for row in rows {
        let share = if total > 0.0 {
            row.total / total * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(&row.category),
            ui::amount_cell(row.count.to_string()),
            ui::amount_cell(format_amount(row.total, code)),
            ui::amount_cell(format!("{share:.2}%")),
        ]);
    }

    format!(
        "\n{}\n{table}\n",
        ui::style_text(&format!("By category ({code})"), ui::StyleType::TotalLabel)
    )
}

fn render_months(report: &SpendReport, code: &str) -> String {
    let Some(series) = report.monthly.get(code) else {
        return String::new();
    };
    let max = series.iter().map(|m| m.total).fold(0.0, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Items"),
        ui::header_cell("Total"),
        ui::header_cell(""),
    ]);
    for month in series {
        table.add_row(vec![
            Cell::new(month.key()),
            ui::amount_cell(month.count.to_string()),
            ui::amount_cell(format_amount(month.total, code)),
            Cell::new(ui::bar(month.total, max, BAR_WIDTH)),
        ]);
    }

    format!(
        "\n{}\n{table}\n",
        ui::style_text(&format!("By month ({code})"), ui::StyleType::TotalLabel)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Asset;
    use crate::core::spend::aggregate;

    fn asset(id: &str, asset_type: &str, price: &str, currency: &str, date: &str) -> Asset {
        Asset {
            id: id.to_string(),
            name: id.to_string(),
            asset_type: asset_type.to_string(),
            price: Some(price.to_string()),
            currency: Some(currency.to_string()),
            date_added: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn report() -> SpendReport {
        aggregate(&[
            asset("a", "clothing", "12.50", "USD", "2024-01-05"),
            asset("b", "hair", "7.5", "USD", "2024-02-11"),
            asset("c", "prop", "30", "EUR", "2024-02-11"),
            Asset {
                id: "free".to_string(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_render_all_currencies() {
        let output = render(&report(), None);
        assert!(output.contains("$20.00"));
        assert!(output.contains("€30.00"));
        assert!(output.contains("Free assets:"));
        assert!(output.contains("By category (USD)"));
        assert!(output.contains("By category (EUR)"));
        assert!(output.contains("2024-02"));
        assert!(output.contains("62.50%"));
    }

    #[test]
    fn test_currency_sections_are_separated() {
        let line = ui::separator();
        assert_eq!(render(&report(), None).matches(&line).count(), 2);
        assert_eq!(render(&report(), Some("USD")).matches(&line).count(), 1);
    }

    #[test]
    fn test_render_selected_currency() {
        let output = render(&report(), Some("EUR"));
        assert!(output.contains("By month (EUR)"));
        assert!(!output.contains("By month (USD)"));
    }

    #[test]
    fn test_render_unknown_currency_falls_back() {
        let output = render(&report(), Some("JPY"));
        assert!(output.contains("No paid assets in JPY"));
        assert!(output.contains("By category (USD)"));
    }

    #[test]
    fn test_render_empty() {
        let output = render(&aggregate(&[]), None);
        assert!(output.contains("No paid assets yet"));
    }

    #[test]
    fn test_run_saves_selected_currency() {
        let store = CatalogStore::in_memory();
        let config = AppConfig::default();
        run(&store, &config, Some("EUR")).unwrap();
        assert_eq!(
            store.setting(STATS_CURRENCY).unwrap().as_deref(),
            Some("EUR")
        );
        run(&store, &config, None).unwrap();
    }
}

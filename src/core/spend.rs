//! Aggregates asset spend into per-currency, per-category and per-month buckets.
//!
//! Amounts in different currencies are never summed together. Aggregates keep
//! full `f64` precision; rounding to two decimals happens only in
//! [`format_amount`].
use crate::core::model::Asset;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const OTHER_CATEGORY: &str = "Other";
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Categories kept per currency before the rest fold into [`OTHER_CATEGORY`].
pub const TOP_CATEGORIES: usize = 5;
/// Monthly buckets kept per currency.
pub const MONTH_WINDOW: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyBucket {
    pub currency: String,
    pub total: f64,
    pub count: usize,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: String,
    pub currency: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSpend {
    pub year: i32,
    pub month: u32,
    pub currency: String,
    pub total: f64,
    pub count: usize,
}

impl MonthSpend {
    /// Year-month key, e.g. `2024-03`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpendReport {
    /// Sorted by total, largest first.
    pub currency_totals: Vec<CurrencyBucket>,
    pub free_count: usize,
    pub max_price: BTreeMap<String, f64>,
    pub average_price: BTreeMap<String, f64>,
    /// Per currency, sorted by total with the tail folded into "Other".
    pub categories: BTreeMap<String, Vec<CategorySpend>>,
    /// Per currency, chronological, at most [`MONTH_WINDOW`] entries.
    pub monthly: BTreeMap<String, Vec<MonthSpend>>,
}

impl SpendReport {
    pub fn priced_count(&self) -> usize {
        self.currency_totals.iter().map(|b| b.count).sum()
    }

    pub fn currency(&self, code: &str) -> Option<&CurrencyBucket> {
        self.currency_totals.iter().find(|b| b.currency == code)
    }
}

#[derive(Default)]
struct Tally {
    total: f64,
    count: usize,
    max: f64,
}

impl Tally {
    fn add(&mut self, price: f64) {
        self.total += price;
        self.count += 1;
        if price > self.max {
            self.max = price;
        }
    }
}

/// Builds [`SpendReport`]s. Holds no state between calls besides the
/// currency assumed for assets that do not name one.
#[derive(Debug, Clone)]
pub struct SpendAggregator {
    default_currency: String,
}

impl Default for SpendAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl SpendAggregator {
    pub fn new(default_currency: &str) -> Self {
        Self {
            default_currency: default_currency.to_string(),
        }
    }

    pub fn aggregate(&self, assets: &[Asset]) -> SpendReport {
        let mut free_count = 0;
        let mut by_currency: BTreeMap<String, Tally> = BTreeMap::new();
        let mut by_category: BTreeMap<String, BTreeMap<String, Tally>> = BTreeMap::new();
        let mut by_month: BTreeMap<String, BTreeMap<(i32, u32), Tally>> = BTreeMap::new();

        for asset in assets {
            let Some(price) = parse_price(asset.price.as_deref()).filter(|p| *p > 0.0) else {
                free_count += 1;
                continue;
            };
            let currency = self.currency_of(asset);
            let category = if asset.asset_type.trim().is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                asset.asset_type.clone()
            };

            by_currency.entry(currency.clone()).or_default().add(price);
            by_category
                .entry(currency.clone())
                .or_default()
                .entry(category)
                .or_default()
                .add(price);

            match asset.date_added.as_deref().and_then(parse_date) {
                Some(date) => by_month
                    .entry(currency)
                    .or_default()
                    .entry((date.year(), date.month()))
                    .or_default()
                    .add(price),
                None => debug!("Asset {} has no usable date, skipping monthly bucket", asset.id),
            }
        }

        let mut report = SpendReport {
            free_count,
            ..Default::default()
        };

        for (currency, tally) in &by_currency {
            report.max_price.insert(currency.clone(), tally.max);
            report
                .average_price
                .insert(currency.clone(), tally.total / tally.count as f64);
            report.currency_totals.push(CurrencyBucket {
                currency: currency.clone(),
                total: tally.total,
                count: tally.count,
                display: format_amount(tally.total, currency),
            });
        }
        report.currency_totals.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.currency.cmp(&b.currency))
        });

        for (currency, categories) in by_category {
            let folded = fold_categories(&currency, categories);
            report.categories.insert(currency, folded);
        }

        for (currency, months) in by_month {
            // BTreeMap iteration is already chronological.
            let mut series: Vec<MonthSpend> = months
                .into_iter()
                .map(|((year, month), tally)| MonthSpend {
                    year,
                    month,
                    currency: currency.clone(),
                    total: tally.total,
                    count: tally.count,
                })
                .collect();
            let excess = series.len().saturating_sub(MONTH_WINDOW);
            series.drain(..excess);
            report.monthly.insert(currency, series);
        }

        debug!(
            "Aggregated {} assets: {} priced across {} currencies, {} free",
            assets.len(),
            report.priced_count(),
            report.currency_totals.len(),
            report.free_count
        );
        report
    }

    fn currency_of(&self, asset: &Asset) -> String {
        match asset.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => self.default_currency.clone(),
        }
    }
}

/// Aggregates with [`DEFAULT_CURRENCY`] assumed for assets without a currency.
pub fn aggregate(assets: &[Asset]) -> SpendReport {
    SpendAggregator::default().aggregate(assets)
}

fn fold_categories(currency: &str, categories: BTreeMap<String, Tally>) -> Vec<CategorySpend> {
    let mut rows: Vec<CategorySpend> = categories
        .into_iter()
        .map(|(category, tally)| CategorySpend {
            category,
            currency: currency.to_string(),
            total: tally.total,
            count: tally.count,
        })
        .collect();
    // Stable sort over name-ordered input, so ties stay alphabetical.
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));

    if rows.len() <= TOP_CATEGORIES {
        return rows;
    }

    let rest = rows.split_off(TOP_CATEGORIES);
    let total: f64 = rest.iter().map(|r| r.total).sum();
    let count: usize = rest.iter().map(|r| r.count).sum();
    if total > 0.0 {
        rows.push(CategorySpend {
            category: OTHER_CATEGORY.to_string(),
            currency: currency.to_string(),
            total,
            count,
        });
    }
    rows
}

/// Parses a price leniently: every character other than digits and `.` is
/// stripped and the longest numeric prefix is used, so `"$1,299.00"` is
/// `1299.0` and `"abc"` is `None`.
pub fn parse_price(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut seen_dot = false;
    let numeric: String = cleaned
        .chars()
        .take_while(|c| {
            if *c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    numeric.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an acquisition date. Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and plain `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Formats an amount for display, rounded to two decimals.
pub fn format_amount(value: f64, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{symbol}{value:.2}"),
        None => format!("{value:.2} {currency}"),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, asset_type: &str, price: Option<&str>, currency: Option<&str>) -> Asset {
        Asset {
            id: id.to_string(),
            name: id.to_string(),
            asset_type: asset_type.to_string(),
            price: price.map(str::to_string),
            currency: currency.map(str::to_string),
            ..Default::default()
        }
    }

    fn dated(mut asset: Asset, date: &str) -> Asset {
        asset.date_added = Some(date.to_string());
        asset
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(Some("12.50")), Some(12.5));
        assert_eq!(parse_price(Some("$1,299.00")), Some(1299.0));
        assert_eq!(parse_price(Some("€ 7")), Some(7.0));
        assert_eq!(parse_price(Some("1.2.3")), Some(1.2));
        assert_eq!(parse_price(Some("$0.00")), Some(0.0));
        assert_eq!(parse_price(Some("abc")), None);
        assert_eq!(parse_price(Some("")), None);
        assert_eq!(parse_price(Some(".")), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09T10:00:00Z"), Some(expected));
        assert_eq!(parse_date("2024-03-09T10:00:00.123+00:00"), Some(expected));
        assert_eq!(parse_date("2024-03-09 10:00:00"), Some(expected));
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("last tuesday"), None);
    }

    #[test]
    fn test_free_assets_are_equivalent() {
        let assets = vec![
            asset("null", "clothing", None, Some("USD")),
            asset("zero", "clothing", Some("$0.00"), Some("USD")),
            asset("paid", "clothing", Some("10"), Some("USD")),
        ];
        let report = aggregate(&assets);
        assert_eq!(report.free_count, 2);
        let usd = report.currency("USD").unwrap();
        assert_eq!(usd.total, 10.0);
        assert_eq!(usd.count, 1);
    }

    #[test]
    fn test_malformed_price_is_treated_as_free() {
        let with_bad = vec![
            asset("a", "prop", Some("5"), None),
            asset("b", "prop", Some("abc"), None),
            asset("c", "hair", Some("7.25"), None),
        ];
        let with_null = vec![
            asset("a", "prop", Some("5"), None),
            asset("b", "prop", None, None),
            asset("c", "hair", Some("7.25"), None),
        ];
        let bad = aggregate(&with_bad);
        let null = aggregate(&with_null);
        assert_eq!(bad.currency_totals, null.currency_totals);
        assert_eq!(bad.free_count, 1);
    }

    #[test]
    fn test_currencies_are_kept_apart() {
        let assets = vec![
            asset("a", "prop", Some("5"), Some("EUR")),
            asset("b", "prop", Some("20"), Some("USD")),
            asset("c", "prop", Some("15"), Some("EUR")),
            asset("d", "prop", Some("1"), None),
            asset("e", "prop", Some("3"), Some("  ")),
        ];
        let report = aggregate(&assets);

        let order: Vec<&str> = report
            .currency_totals
            .iter()
            .map(|b| b.currency.as_str())
            .collect();
        assert_eq!(order, vec!["USD", "EUR"]);
        assert_eq!(report.currency("USD").unwrap().total, 24.0);
        assert_eq!(report.currency("USD").unwrap().count, 3);
        assert_eq!(report.currency("EUR").unwrap().display, "€20.00");
        assert_eq!(report.max_price["EUR"], 15.0);
        assert_eq!(report.average_price["EUR"], 10.0);
        assert_eq!(report.average_price["USD"], 8.0);
    }

    #[test]
    fn test_configured_default_currency() {
        let assets = vec![asset("a", "prop", Some("5"), None)];
        let report = SpendAggregator::new("JPY").aggregate(&assets);
        assert_eq!(report.currency_totals[0].currency, "JPY");
    }

    #[test]
    fn test_top_five_categories_fold_into_other() {
        let values = [10, 9, 8, 7, 6, 5, 4];
        let mut assets = Vec::new();
        for (i, value) in values.iter().enumerate() {
            let category = format!("cat{i}");
            assets.push(asset(
                &format!("a{i}"),
                &category,
                Some(&value.to_string()),
                Some("USD"),
            ));
        }
        // A second item in a folded category so the Other count is a sum of counts.
        assets.push(asset("extra", "cat6", Some("0.5"), Some("USD")));

        let report = aggregate(&assets);
        let rows = &report.categories["USD"];
        assert_eq!(rows.len(), 6);

        let top: Vec<(&str, f64)> = rows[..5]
            .iter()
            .map(|r| (r.category.as_str(), r.total))
            .collect();
        assert_eq!(
            top,
            vec![
                ("cat0", 10.0),
                ("cat1", 9.0),
                ("cat2", 8.0),
                ("cat3", 7.0),
                ("cat4", 6.0)
            ]
        );
        let other = &rows[5];
        assert_eq!(other.category, OTHER_CATEGORY);
        assert_eq!(other.total, 9.5);
        assert_eq!(other.count, 3);
    }

    #[test]
    fn test_five_categories_do_not_fold() {
        let assets: Vec<Asset> = (0..5)
            .map(|i| asset(&format!("a{i}"), &format!("cat{i}"), Some("1"), None))
            .collect();
        let report = aggregate(&assets);
        let rows = &report.categories["USD"];
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.category != OTHER_CATEGORY));
    }

    #[test]
    fn test_blank_type_is_uncategorized() {
        let report = aggregate(&[asset("a", "", Some("2"), None)]);
        assert_eq!(report.categories["USD"][0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_monthly_series_keeps_last_twelve() {
        let mut assets = Vec::new();
        // 15 consecutive months: 2023-01 .. 2024-03
        for i in 0..15 {
            let year = 2023 + i / 12;
            let month = i % 12 + 1;
            assets.push(dated(
                asset(&format!("a{i}"), "prop", Some("1"), Some("USD")),
                &format!("{year}-{month:02}-15T00:00:00Z"),
            ));
        }
        // Unparseable date still counts toward totals.
        assets.push(dated(asset("odd", "prop", Some("4"), Some("USD")), "soon"));

        let report = aggregate(&assets);
        let series = &report.monthly["USD"];
        assert_eq!(series.len(), MONTH_WINDOW);
        assert_eq!(series.first().unwrap().key(), "2023-04");
        assert_eq!(series.last().unwrap().key(), "2024-03");
        assert_eq!(report.currency("USD").unwrap().total, 19.0);
        assert_eq!(report.currency("USD").unwrap().count, 16);
    }

    #[test]
    fn test_monthly_window_is_trimmed_per_currency() {
        let mut assets = Vec::new();
        // USD: 2022-01 .. 2023-02, EUR: 2023-07 .. 2024-08, 14 months each.
        for i in 0..14 {
            let (year, month) = (2022 + i / 12, i % 12 + 1);
            assets.push(dated(
                asset(&format!("u{i}"), "prop", Some("1"), Some("USD")),
                &format!("{year}-{month:02}-01"),
            ));
            let (year, month) = (2023 + (i + 6) / 12, (i + 6) % 12 + 1);
            assets.push(dated(
                asset(&format!("e{i}"), "prop", Some("2"), Some("EUR")),
                &format!("{year}-{month:02}-01"),
            ));
        }

        let report = aggregate(&assets);
        let usd = &report.monthly["USD"];
        assert_eq!(usd.len(), MONTH_WINDOW);
        assert_eq!(usd.first().unwrap().key(), "2022-03");
        assert_eq!(usd.last().unwrap().key(), "2023-02");
        assert!(usd.iter().all(|m| m.currency == "USD"));

        let eur = &report.monthly["EUR"];
        assert_eq!(eur.len(), MONTH_WINDOW);
        assert_eq!(eur.first().unwrap().key(), "2023-09");
        assert_eq!(eur.last().unwrap().key(), "2024-08");
        assert!(eur.iter().all(|m| m.total == 2.0));
    }

    #[test]
    fn test_monthly_window_counts_data_points_not_calendar() {
        let assets = vec![
            dated(asset("a", "prop", Some("1"), None), "2019-06-01"),
            dated(asset("b", "prop", Some("2"), None), "2024-06-01"),
            dated(asset("c", "prop", Some("3"), None), "2024-06-20"),
        ];
        let report = aggregate(&assets);
        let series = &report.monthly["USD"];
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key(), "2019-06");
        assert_eq!(series[1].total, 5.0);
        assert_eq!(series[1].count, 2);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let assets = vec![
            asset("a", "prop", Some("0.1"), None),
            asset("b", "prop", Some("0.2"), None),
            asset("c", "hair", Some("0.3"), Some("EUR")),
        ];
        let aggregator = SpendAggregator::default();
        let first = aggregator.aggregate(&assets);
        let second = aggregator.aggregate(&assets);
        assert_eq!(first, second);
        assert_eq!(
            first.currency("USD").unwrap().total.to_bits(),
            second.currency("USD").unwrap().total.to_bits()
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.346, "USD"), "$12.35");
        assert_eq!(format_amount(3.0, "gbp"), "£3.00");
        assert_eq!(format_amount(1.5, "CAD"), "1.50 CAD");
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&[]);
        assert_eq!(report, SpendReport::default());
    }
}

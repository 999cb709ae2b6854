use crate::core::compat::{AspectStatus, Overall, Rating, ReferenceLevel};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for numbers and amounts.
pub fn amount_cell(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(Cell::new("N/A").fg(Color::DarkGrey), |v| Cell::new(format_fn(v)))
}

fn rating_color(rating: Rating) -> Color {
    match rating {
        Rating::Yes => Color::Green,
        Rating::Mostly => Color::Cyan,
        Rating::Partial => Color::Yellow,
        Rating::No => Color::Red,
    }
}

/// Cell for an aspect status, colored by how good the rating is.
pub fn status_cell(status: AspectStatus) -> Cell {
    let cell = Cell::new(status.to_string()).add_attribute(Attribute::Bold);
    match status {
        AspectStatus::Rated(rating) => cell.fg(rating_color(rating)),
        AspectStatus::Info => cell.fg(Color::DarkGrey),
    }
}

/// Styled overall status for summary lines.
pub fn style_overall(overall: Overall) -> String {
    let text = overall.to_string().to_uppercase();
    match overall {
        Overall::Known(Rating::Yes) => style(text).green().bold().to_string(),
        Overall::Known(Rating::Mostly) => style(text).cyan().bold().to_string(),
        Overall::Known(Rating::Partial) => style(text).yellow().bold().to_string(),
        Overall::Known(Rating::No) => style(text).red().bold().to_string(),
        Overall::Unknown => style(text).dim().bold().to_string(),
    }
}

pub fn level_cell(level: ReferenceLevel) -> Cell {
    let color = match level {
        ReferenceLevel::High => Color::Green,
        ReferenceLevel::Medium => Color::Yellow,
        ReferenceLevel::Low => Color::Red,
    };
    Cell::new(level.to_string()).fg(color)
}

/// Horizontal bar scaled so `max` fills `width` characters.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    };

    let pb = ProgressBar::new(len);
    let progress_style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(progress_style);
    pb
}

/// A separator line matching the terminal width, 80 columns when not a tty.
pub fn separator() -> String {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    format!("\n{}\n", "─".repeat(term_width))
}

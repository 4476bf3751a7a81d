//! Table output formatting for CLI commands, using comfy-table.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::domain::models::{Citation, QueryResult};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Format ranked query results, one row per hit.
pub fn format_query_results(results: &[QueryResult]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Text").add_attribute(Attribute::Bold),
    ]);

    for (i, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&result.id),
            Cell::new(format!("{:.4}", result.score)),
            Cell::new(truncate_text(result.text.as_deref().unwrap_or(""), 60)),
        ]);
    }

    table.to_string()
}

/// Format answer citations, one row per retrieved chunk.
pub fn format_citations(citations: &[Citation]) -> String {
    let mut table = base_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Snippet").add_attribute(Attribute::Bold),
    ]);

    for citation in citations {
        table.add_row(vec![
            Cell::new(citation.index),
            Cell::new(&citation.id),
            Cell::new(format!("{:.4}", citation.score)),
            Cell::new(truncate_text(&citation.snippet, 60)),
        ]);
    }

    table.to_string()
}

/// Format a list of model ids.
pub fn format_models(models: &[String]) -> String {
    let mut table = base_table();
    table.set_header(vec![Cell::new("Model").add_attribute(Attribute::Bold)]);
    for model in models {
        table.add_row(vec![Cell::new(model)]);
    }
    table.to_string()
}

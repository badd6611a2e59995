//! Console summary table for a QC run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::pipeline::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Source: {}", outcome.source.display());
    println!("Period: {}", outcome.period);
    match &outcome.report {
        Some(path) => println!("Report: {}", path.display()),
        None => println!("Report: not written (dry run)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Total"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("N/A"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_failed = 0usize;
    let mut total_errors = 0usize;
    for summary in &outcome.summaries {
        total_failed += summary.failed;
        total_errors += summary.errors;
        table.add_row(vec![
            Cell::new(&summary.check)
                .fg(comfy_table::Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.total),
            count_cell(summary.passed, comfy_table::Color::Green),
            count_cell(summary.failed, comfy_table::Color::Red),
            dim_cell(summary.not_applicable),
            count_cell(summary.errors, comfy_table::Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(comfy_table::Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_failed, comfy_table::Color::Red).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_errors, comfy_table::Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if !outcome.errors.is_empty() {
        eprintln!("Check errors:");
        for error in &outcome.errors {
            eprintln!("- {error}");
        }
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: comfy_table::Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(comfy_table::Color::DarkGrey)
}

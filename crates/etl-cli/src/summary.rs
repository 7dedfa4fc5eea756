use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use etl_core::BatchSummary;

pub fn print_summary(summary: &BatchSummary) {
    if !summary.tables.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Table"),
            header_cell("Source"),
            header_cell("Rows"),
            header_cell("Partitions"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Right);
        for written in &summary.tables {
            table.add_row(vec![
                Cell::new(&written.table),
                Cell::new(written.source.display()),
                Cell::new(written.rows),
                Cell::new(written.partitions),
            ]);
        }
        println!("{table}");
    }

    for skipped in &summary.skipped {
        println!("Skipped {} ({})", skipped.path.display(), skipped.reason);
    }
    for failure in &summary.failures {
        println!("Failed {}: {}", failure.path.display(), failure.detail);
    }
    if let Some(log) = &summary.failure_log {
        println!("Failure log: {}", log.display());
    }
    println!(
        "{} tables, {} rows, {} skipped, {} failed",
        summary.tables.len(),
        summary.rows_written(),
        summary.skipped.len(),
        summary.failures.len()
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

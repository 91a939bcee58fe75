//! Plain-text rendering of report tables and KPIs.

use enforcelog_core::report::aggregate::SummaryTable;
use enforcelog_core::report::kpi::format_change;
use enforcelog_core::{CellValue, KpiSummary};

/// Prints rows as left-aligned columns under `title`.
pub fn print_table(title: &str, header: &[String], rows: &[Vec<String>]) {
    println!("\n## {title}");
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }

    println!("{}", format_row(header, &widths));
    println!(
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in rows {
        println!("{}", format_row(row, &widths));
    }
}

pub fn print_summary(title: &str, summary: &SummaryTable) {
    let header: Vec<String> = summary.columns().into_iter().map(str::to_string).collect();
    let rows: Vec<Vec<String>> = summary
        .rows()
        .iter()
        .map(|row| {
            row.keys
                .iter()
                .map(ToString::to_string)
                .chain(std::iter::once(row.quantity.to_string()))
                .collect()
        })
        .collect();
    print_table(title, &header, &rows);
}

/// Prints raw stored rows; the first row is treated as the header.
pub fn print_values(title: &str, values: &[Vec<CellValue>]) {
    let mut rows = values
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>());
    let header = rows.next().unwrap_or_default();
    print_table(title, &header, &rows.collect::<Vec<_>>());
}

pub fn print_kpis(kpis: &KpiSummary, change_label: &str, periods_label: &str) {
    println!("\n## KPIs");
    match &kpis.top_enforcer {
        Some(top) => println!(
            "Most productive enforcer : {} ({} actions)",
            top.name, top.quantity
        ),
        None => println!("Most productive enforcer : -"),
    }
    println!("% of enforcers active    : {:.1}%", kpis.percent_active);
    println!("Active enforcers         : {}", kpis.active_enforcers);
    println!("{periods_label:<25}: {}", kpis.active_periods);
    println!(
        "{change_label:<25}: {} actions ({})",
        kpis.total,
        format_change(kpis.change_pct)
    );
    println!("Cumulative total (YTD)   : {}", kpis.ytd_total);
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<w$}", w = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

//! Summary command - monthly totals per category

use anyhow::Result;
use budgetmap_core::adapters::TracingObserver;
use rust_decimal::Decimal;

use super::get_context;
use crate::output;

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summary = ctx.summary_service.monthly(&TracingObserver)?;

    if json {
        return output::print_json(&summary);
    }

    if summary.months.is_empty() {
        output::info("No mapped rows yet");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Month", "Category", "Rows", "Total"]);
    for total in &summary.categories {
        table.add_row(vec![
            total.month.clone(),
            total.category.clone(),
            total.count.to_string(),
            money(total.total),
        ]);
    }
    println!("{table}");
    println!();

    let mut months = output::create_table();
    months.set_header(vec!["Month", "Rows", "Total"]);
    for month in &summary.months {
        months.add_row(vec![month.month.clone(), month.count.to_string(), money(month.total)]);
    }
    println!("{months}");

    if summary.skipped_rows > 0 {
        output::warning(&format!("{} mapped row(s) without a readable date or amount", summary.skipped_rows));
    }
    Ok(())
}

//! Plain-text report layout.

use std::io::{self, Write};

use marketsim_core::Month;
use marketsim_reporting::{BestSellerSeries, CustomerReport, ItemReport, Series};

pub fn best_sellers(out: &mut impl Write, report: &[BestSellerSeries]) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "No orders.");
    }
    writeln!(out, "Best sellers")?;
    for (rank, best) in report.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{:>2}. {} ({} units)", rank + 1, best.title, best.total)?;
        two_series(out, ("units", &best.sales_per_month), ("amount", &best.purchases_per_month))?;
    }
    Ok(())
}

pub fn item(out: &mut impl Write, report: &ItemReport) -> io::Result<()> {
    writeln!(out, "Item {}", report.title)?;
    writeln!(out, "{:<10} {:>8} {:>10} {:>10}", "month", "units", "amount", "mean")?;
    let rows = report
        .sales_per_month
        .points()
        .iter()
        .zip(report.purchases_per_month.points())
        .zip(report.mean_price_per_month.points());
    for ((units, amount), mean) in rows {
        let mean = match mean.value {
            Some(mean) => format!("{mean:.2}"),
            None => "-".to_owned(),
        };
        writeln!(
            out,
            "{:<10} {:>8} {:>10} {:>10}",
            units.key.name(),
            units.value,
            amount.value,
            mean
        )?;
    }
    Ok(())
}

pub fn customer(out: &mut impl Write, report: &CustomerReport) -> io::Result<()> {
    writeln!(out, "Customer {}", report.customer_id)?;
    two_series(out, ("units", &report.orders_per_month), ("amount", &report.amount_per_month))?;
    writeln!(out)?;
    writeln!(out, "{:<10} {:>10}", "item", "amount")?;
    for point in report.amount_per_item.points() {
        writeln!(out, "{:<10} {:>10}", point.key, point.value)?;
    }
    Ok(())
}

fn two_series(
    out: &mut impl Write,
    (left_label, left): (&str, &Series<Month, u64>),
    (right_label, right): (&str, &Series<Month, u64>),
) -> io::Result<()> {
    writeln!(out, "    {:<10} {:>8} {:>10}", "month", left_label, right_label)?;
    for (l, r) in left.points().iter().zip(right.points()) {
        writeln!(out, "    {:<10} {:>8} {:>10}", l.key.name(), l.value, r.value)?;
    }
    Ok(())
}

#![allow(dead_code)]

use chrono::NaiveDate;
use configuration::ReportSettings;
use core_types::{AggregationView, CellValue, FilterSource, ViewRow, ViewSchema};
use orchestrator::{Orchestrator, ViewCatalog};
use rust_decimal_macros::dec;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_ORDER: [&str; 3] = ["MonthlyTrend", "StateOrders", "ShipModeShare"];

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn month(label: &str, sales: rust_decimal::Decimal, orders: i64) -> ViewRow {
    ViewRow::new([label], [CellValue::Decimal(sales), CellValue::Integer(orders)])
}

pub fn monthly_trend() -> AggregationView {
    AggregationView::new(
        "MonthlyTrend",
        ViewSchema::new(["month"], ["totalSales", "orderCount"]),
    )
    .with_row(month("2017-01", dec!(43971.37), 79))
    .with_row(month("2017-02", dec!(20301.13), 51))
    .with_row(month("2017-03", dec!(58872.35), 94))
}

pub fn state_orders() -> AggregationView {
    AggregationView::new("StateOrders", ViewSchema::new(["state"], ["orderCount"]))
        .with_row(ViewRow::new(["California"], [412_i64]))
        .with_row(ViewRow::new(["Texas"], [208_i64]))
        .with_row(ViewRow::new(["New York"], [301_i64]))
}

pub fn ship_mode_share() -> AggregationView {
    AggregationView::new("ShipModeShare", ViewSchema::new(["shipMode"], ["orderCount"]))
        .with_row(ViewRow::new(["Standard Class"], [600_i64]))
        .with_row(ViewRow::new(["Second Class"], [190_i64]))
        .with_row(ViewRow::new(["First Class"], [150_i64]))
        .with_row(ViewRow::new(["Same Day"], [60_i64]))
}

pub fn category_sales() -> AggregationView {
    AggregationView::new("CategorySales", ViewSchema::new(["category"], ["totalSales"]))
        .with_row(ViewRow::new(["Furniture"], [dec!(741999.80)]))
        .with_row(ViewRow::new(["Office Supplies"], [dec!(719047.03)]))
        .with_row(ViewRow::new(["Technology"], [dec!(836154.03)]))
}

pub fn catalog() -> Arc<ViewCatalog> {
    Arc::new(ViewCatalog::from_views([
        monthly_trend(),
        state_orders(),
        ship_mode_share(),
        category_sales(),
    ]))
}

pub fn settings(destination: &Path, order: &[&str]) -> ReportSettings {
    let mut settings = ReportSettings::new(order.iter().copied());
    settings.destination = destination.to_path_buf();
    settings
}

pub fn orchestrator(destination: &Path, filters: Arc<dyn FilterSource>) -> Orchestrator {
    Orchestrator::new(settings(destination, &DEFAULT_ORDER), filters, catalog()).unwrap()
}

/// The text of one section, from its banner up to the next banner.
pub fn section<'a>(report: &'a str, title: &str) -> &'a str {
    let banner = format!("║ {} ║", title);
    let start = report
        .find(&banner)
        .unwrap_or_else(|| panic!("section '{}' not found in:\n{}", title, report));
    let rest = &report[start + banner.len()..];
    let end = rest.find('╔').map_or(report.len(), |i| start + banner.len() + i);
    &report[start..end]
}

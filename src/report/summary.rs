//! Console rendering of the analysis report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::columns::RISCO_ALTO;
use crate::pipeline::{
    CorrelationMatrix, CorrelationView, DescriptiveStats, EdaReport, GroupRate, OutlierAnalysis,
    PaymentStatus,
};

/// Print every section of the report
pub fn display_report(report: &EdaReport) {
    display_overview(report);
    display_status(report);
    display_values(&report.value_stats);
    display_rates("DEFAULT RATE BY SPECIES", "Species", &report.species);
    display_outliers(report);
    display_temporal(report);
    display_cnae(report);
    display_correlations(report);
    display_profiles(report);
    display_extreme_cases(report);
}

fn section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn percent(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

fn number(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn rate_color(rate: f64) -> Color {
    if rate >= 0.5 {
        Color::Red
    } else if rate >= 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn display_overview(report: &EdaReport) {
    section("📋", "OVERVIEW");

    let overview = &report.overview;
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("📁 Invoices"),
        Cell::new(overview.total_invoices),
    ]);
    table.add_row(vec![Cell::new("👥 Payers"), Cell::new(report.payers)]);
    table.add_row(vec![
        Cell::new("💰 Total nominal value"),
        Cell::new(format!("{:.2}", overview.total_nominal_value)),
    ]);
    table.add_row(vec![
        Cell::new("⚠️  Default rate"),
        Cell::new(percent(overview.default_rate))
            .fg(overview.default_rate.map(rate_color).unwrap_or(Color::White))
            .add_attribute(Attribute::Bold),
    ]);
    print_indented(&table);
}

fn display_status(report: &EdaReport) {
    section("📌", "PAYMENT STATUS");

    let mut table = new_table(&["Status", "Invoices", "Share"]);
    for share in &report.status_distribution {
        let color = match share.status.parse::<PaymentStatus>() {
            Ok(PaymentStatus::EmAberto) => Color::Red,
            Ok(PaymentStatus::PagoAtrasado) => Color::Yellow,
            _ => Color::Green,
        };
        table.add_row(vec![
            Cell::new(&share.status).fg(color),
            Cell::new(share.count),
            Cell::new(format!("{:.2}%", share.percent)),
        ]);
    }
    print_indented(&table);
}

fn display_values(stats: &[DescriptiveStats]) {
    section("💵", "INVOICE VALUES");

    let mut table = new_table(&["Column", "Count", "Mean", "Std", "Min", "Median", "Max", "Sum"]);
    for s in stats {
        table.add_row(vec![
            Cell::new(&s.column),
            Cell::new(s.count),
            Cell::new(number(s.mean)),
            Cell::new(number(s.std)),
            Cell::new(number(s.min)),
            Cell::new(number(s.median)),
            Cell::new(number(s.max)),
            Cell::new(format!("{:.2}", s.sum)),
        ]);
    }
    print_indented(&table);
}

fn display_rates(title: &str, key_header: &str, groups: &[GroupRate]) {
    section("📊", title);

    if groups.is_empty() {
        println!("      {}", style("No data available").dim());
        return;
    }

    let mut table = new_table(&[key_header, "Invoices", "Defaults", "Default rate"]);
    for group in groups {
        table.add_row(vec![
            Cell::new(&group.key),
            Cell::new(group.invoices),
            Cell::new(group.defaults),
            Cell::new(format!("{:.2}%", group.rate * 100.0)).fg(rate_color(group.rate)),
        ]);
    }
    print_indented(&table);
}

fn display_outliers(report: &EdaReport) {
    section("🔎", "HIGH-VALUE OUTLIERS");

    let outliers = &report.outliers;
    let table = outlier_table(outliers, report.overview.total_invoices);
    print_indented(&table);

    if let Some(multiplier) = outliers.risk_multiplier() {
        println!();
        println!(
            "      Outliers default {} as often as the whole portfolio",
            style(format!("{:.2}x", multiplier)).yellow().bold()
        );
    }
}

/// The "All invoices" row counts every invoice, matching `overall_rate`
fn outlier_table(outliers: &OutlierAnalysis, total_invoices: usize) -> Table {
    let mut table = new_table(&["Group", "Invoices", "Default rate"]);
    table.add_row(vec![
        Cell::new(format!(
            "Above p{} ({})",
            outliers.quantile * 100.0,
            number(outliers.threshold)
        )),
        Cell::new(outliers.outlier_invoices),
        Cell::new(percent(outliers.outlier_rate)),
    ]);
    table.add_row(vec![
        Cell::new("Regular"),
        Cell::new(outliers.regular_invoices),
        Cell::new(percent(outliers.regular_rate)),
    ]);
    table.add_row(vec![
        Cell::new("All invoices"),
        Cell::new(total_invoices),
        Cell::new(percent(outliers.overall_rate)),
    ]);
    table
}

fn display_temporal(report: &EdaReport) {
    display_rates("DEFAULT RATE BY ISSUE MONTH", "Month", &report.temporal.monthly);

    if let Some(peak) = report.temporal.peak() {
        println!();
        println!(
            "      Peak month {} with {}",
            style(&peak.key).cyan().bold(),
            style(format!("{:.2}%", peak.rate * 100.0)).yellow().bold()
        );
    }
    let top: Vec<&str> = report
        .temporal
        .top_months
        .iter()
        .map(|g| g.key.as_str())
        .collect();
    if !top.is_empty() {
        println!("      Top months: {}", style(top.join(", ")).dim());
    }
}

fn display_cnae(report: &EdaReport) {
    let cnae = &report.cnae;
    display_rates("DEFAULT RATE BY CNAE CATEGORY", "CNAE", &cnae.top_categories);
    println!();
    println!(
        "      {} categories with at least {} invoices, {} excluded",
        style(cnae.eligible.len()).yellow().bold(),
        cnae.min_invoices,
        style(cnae.excluded_categories).dim()
    );
}

fn display_matrix(title: &str, matrix: &CorrelationMatrix) {
    println!();
    println!("      {}", style(title).yellow());

    let mut headers = vec![""];
    headers.extend(matrix.columns.iter().map(|c| c.as_str()));
    let mut table = new_table(&headers);
    for (name, row) in matrix.columns.iter().zip(matrix.values.iter()) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|value| match value {
            Some(r) if r.abs() >= 0.5 => Cell::new(format!("{:.2}", r)).fg(Color::Red),
            Some(r) => Cell::new(format!("{:.2}", r)),
            None => Cell::new("-").fg(Color::DarkGrey),
        }));
        table.add_row(cells);
    }
    print_indented(&table);
}

fn anchored_table(view: &CorrelationView) -> Table {
    let header = format!("Correlation with {}", view.anchor);
    let mut table = new_table(&["Rank", "Indicator", header.as_str()]);
    for (rank, entry) in view.anchored.iter().enumerate() {
        let value = match entry.correlation {
            Some(r) if r >= 0.0 => Cell::new(format!("{:+.3}", r)).fg(Color::Red),
            Some(r) => Cell::new(format!("{:+.3}", r)).fg(Color::Green),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.column),
            value,
        ]);
    }
    table
}

fn display_view(title: &str, view: &CorrelationView) {
    display_matrix(title, &view.matrix);
    println!();
    println!("      {}", style(format!("Ranked by correlation with {}", view.anchor)).dim());
    print_indented(&anchored_table(view));
}

fn display_correlations(report: &EdaReport) {
    section("🔗", "PAYER CORRELATIONS");
    display_view("Default rate vs scores", &report.correlations.initial);
    display_view("Default rate vs risk indicators", &report.correlations.risk);
    display_view("Default rate vs liquidity", &report.correlations.liquidity);
}

fn display_profiles(report: &EdaReport) {
    section("📦", "INDICATORS BY RISK GROUP");

    let mut table = new_table(&["Indicator", "Group", "Count", "Min", "Q1", "Median", "Q3", "Max"]);
    for profile in &report.risk_profiles {
        for group in &profile.groups {
            let color = if group.group == RISCO_ALTO {
                Color::Red
            } else {
                Color::Green
            };
            table.add_row(vec![
                Cell::new(&profile.indicator),
                Cell::new(&group.group).fg(color),
                Cell::new(group.count),
                Cell::new(number(group.min)),
                Cell::new(number(group.q1)),
                Cell::new(number(group.median)),
                Cell::new(number(group.q3)),
                Cell::new(number(group.max)),
            ]);
        }
    }
    print_indented(&table);
}

fn display_extreme_cases(report: &EdaReport) {
    section("🧭", "EXTREME CASES");
    println!(
        "      {} low-risk payers with 1-month liquidity below {:.2}",
        style(report.extreme_cases.payers).yellow().bold(),
        report.extreme_cases.liquidity_threshold
    );
}

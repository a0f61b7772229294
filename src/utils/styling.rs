//! Terminal styling for the analysis run

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::AnalysisConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██████╗  ██████╗ ██╗     ███████╗████████╗ ██████╗
    ██╔══██╗██╔═══██╗██║     ██╔════╝╚══██╔══╝██╔═══██╗
    ██████╔╝██║   ██║██║     █████╗     ██║   ██║   ██║
    ██╔══██╗██║   ██║██║     ██╔══╝     ██║   ██║   ██║
    ██████╔╝╚██████╔╝███████╗███████╗   ██║   ╚██████╔╝
    ╚═════╝  ╚═════╝ ╚══════╝╚══════╝   ╚═╝    ╚═════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("EDA").magenta().bold(),
        style("Receivables default analysis").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card for an analysis run
pub fn print_config(boletos: &Path, auxiliar: &Path, report: Option<&Path>, config: &AnalysisConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Boletos:  {:<37}│", FOLDER, truncate_path(boletos, 36));
    println!("    │  {} Auxiliar: {:<37}│", FOLDER, truncate_path(auxiliar, 36));
    if let Some(report) = report {
        println!("    │  {} Report:   {:<37}│", SAVE, truncate_path(report, 36));
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {} Outlier quantile:      {:<24}│",
        CHART,
        style(format!("{:.3}", config.outlier_quantile)).yellow()
    );
    println!(
        "    │  {} Min CNAE invoices:     {:<24}│",
        CHART,
        style(config.min_category_invoices).yellow()
    );
    println!(
        "    │  {} Low liquidity below:   {:<24}│",
        CHART,
        style(format!("{:.2}", config.low_liquidity_threshold)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {} {}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion(total: Duration) {
    println!();
    println!(
        "    {} {} {}",
        ROCKET,
        style("Analysis complete!").green().bold(),
        style(format!("({:.2}s)", total.as_secs_f64())).dim()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

//! Progress display module
//!
//! Console messages, the file progress bar and the end-of-run statistics.

use crate::coordinator::{BatchSummary, FileResult};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print the application banner
pub fn print_banner() {
    let banner = format!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                     DUMP-CLEANER v{:<10}                 ║
║          Batch line filter for compressed SQL dumps          ║
╚══════════════════════════════════════════════════════════════╝
"#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar counting finished files
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} files {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Print the per-file line once a pipeline finishes
pub fn print_file_result(result: &FileResult) {
    match &result.result {
        Ok(report) if report.is_complete() => print_success(&format!(
            "{} done -> {} ({} of {} lines kept)",
            result.name,
            report.output.display(),
            format_number(report.counts.written),
            format_number(report.counts.read)
        )),
        Ok(report) => print_warning(&format!(
            "{} failed mid-stream, partial output left at {}",
            result.name,
            report.output.display()
        )),
        Err(e) => print_error(&format!("{} failed: {}", result.name, e)),
    }
}

/// Lines per second over a run
pub fn lines_per_second(lines: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        lines as f64 / secs
    } else {
        0.0
    }
}

/// Print final statistics
pub fn print_summary(summary: &BatchSummary) {
    let totals = summary.totals();

    println!();
    println!("{}", "═".repeat(60).green());
    println!("{}", "                    PROCESSING COMPLETE".green().bold());
    println!("{}", "═".repeat(60).green());
    println!();

    println!(
        "  {} {}/{}",
        "Files cleaned:  ".green(),
        summary.completed(),
        summary.results.len()
    );
    if summary.partial() > 0 {
        println!(
            "  {} {}",
            "Partial:        ".yellow(),
            summary.partial().to_string().yellow()
        );
    }
    if summary.failed() > 0 {
        println!(
            "  {} {}",
            "Failed:         ".red(),
            summary.failed().to_string().red()
        );
    }
    println!();

    println!("  {} {}", "Lines read:     ".green(), format_number(totals.read));
    println!("  {} {}", "Lines removed:  ".green(), format_number(totals.removed));
    println!(
        "  {} {} ({} blocks)",
        "Lines skipped:  ".green(),
        format_number(totals.skipped),
        format_number(summary.blocks())
    );
    println!(
        "  {} {}",
        "Lines written:  ".green().bold(),
        format_number(totals.written).green().bold()
    );

    let failures = summary.failures();
    if !failures.is_empty() {
        println!();
        for (name, reason) in failures {
            println!("  {} {}: {}", "✖".red(), name, reason);
        }
    }

    println!();
    println!("  {} {}", "Duration:       ".green(), format_duration(summary.elapsed));
    println!(
        "  {} {:.2} lines/sec",
        "Throughput:     ".green(),
        lines_per_second(totals.read, summary.elapsed)
    );
    println!();
    println!("{}", "═".repeat(60).green());
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

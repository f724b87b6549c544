//! Statistics reporting.

use console::style;

use crate::download::RunReport;

/// Print statistics for a finished run.
pub fn print_run_stats(report: &RunReport) {
    let stats = &report.stats;

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Statistics for {}:", report.title)).bold()
    );
    println!("  Chapters:   {}", stats.chapters);
    println!(
        "  Pages:      {}/{} downloaded",
        stats.pages_downloaded, stats.pages_scheduled
    );
    if stats.pages_failed > 0 {
        println!("  Failed:     {}", style(stats.pages_failed).red());
    }
    println!(
        "  Size:       {:.1} MiB",
        stats.bytes_downloaded as f64 / (1024.0 * 1024.0)
    );
    println!("  Archives:   {}", report.archives.archived.len());
    if !report.archives.failures.is_empty() {
        println!(
            "  Archive errors: {}",
            style(report.archives.failures.len()).red()
        );
    }
    println!("  Folder:     {}", report.title_dir.display());
    println!("{}", style("═".repeat(50)).dim());
}

/// Print the completion line with the elapsed wall-clock time.
pub fn print_done(report: &RunReport) {
    println!(
        "{} Done in {:.2} minutes",
        style("OK").green().bold(),
        report.elapsed_minutes()
    );
}

//! Sizes, durations, and the per-artifact build summary.

use std::path::Path;
use std::time::Duration;

use console::Term;
use lamina_bundler::{BuildReport, OutputReport, OutputStatus};
use owo_colors::OwoColorize;

use super::colors_enabled;

/// Human-readable size using binary units (B, KB, MB, GB).
///
/// # Arguments
///
/// * `bytes` - Size in bytes
///
/// # Returns
///
/// Formatted string (e.g., "1.50 MB"); plain bytes carry no decimals.
///
/// # Examples
///
/// ```
/// use lamina_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Human-readable duration: `ms` below one second, seconds below a minute.
///
/// # Arguments
///
/// * `duration` - Duration to format
///
/// # Returns
///
/// Formatted string (e.g., "50ms", "1.50s", "2m 30s")
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lamina_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print one line per artifact, grouped by target, then the totals.
///
/// # Arguments
///
/// * `report` - Finished build report
/// * `root` - Project root; artifact paths under it are shown relative to it
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use lamina_bundler::BuildReport;
/// use lamina_cli::ui::print_build_summary;
///
/// print_build_summary(&BuildReport::default(), Path::new("."));
/// ```
pub fn print_build_summary(report: &BuildReport, root: &Path) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let rule = "─".repeat(width);

    eprintln!();
    if colors_enabled() {
        eprintln!("{}", "Build Summary".bold().underline());
    } else {
        eprintln!("Build Summary");
    }
    eprintln!("{rule}");

    for target in &report.targets {
        eprintln!("  {} ({})", target.name, format_duration(target.duration));
        for output in &target.outputs {
            eprintln!("    {}", artifact_line(output, root));
        }
        if let Some(error) = &target.error {
            eprintln!("    {}", paint_failure(&format!("stopped: {error}")));
        }
    }

    eprintln!("{rule}");
    let written = report.written().count();
    let totals = format!(
        "{} artifact(s), {} in {}",
        written,
        format_size(report.total_bytes()),
        format_duration(report.duration)
    );
    if colors_enabled() {
        eprintln!("  {} {}", "Total:".bold(), totals.green());
    } else {
        eprintln!("  Total: {totals}");
    }

    let (warnings, errors) = (report.warning_count(), report.error_count());
    if warnings + errors > 0 {
        eprintln!("  {warnings} warning(s), {errors} transform error(s)");
    }
}

fn artifact_line(output: &OutputReport, root: &Path) -> String {
    let path = output.path.strip_prefix(root).unwrap_or(&output.path);
    match &output.status {
        OutputStatus::Written => {
            let size = format_size(output.bytes);
            if colors_enabled() {
                format!(
                    "{} {} {} {}",
                    "▸".blue(),
                    path.display().bright_white().bold(),
                    output.kind.dimmed(),
                    size.dimmed()
                )
            } else {
                format!("▸ {} {} {}", path.display(), output.kind, size)
            }
        }
        OutputStatus::Failed(reason) => {
            paint_failure(&format!("✗ {} {}: {}", path.display(), output.kind, reason))
        }
    }
}

fn paint_failure(text: &str) -> String {
    if colors_enabled() {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

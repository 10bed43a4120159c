//! Terminal output: status lines and the build summary.
//!
//! Everything goes to stderr so `lamina build --json` can keep stdout for the
//! machine-readable report.
//!
//! ```no_run
//! use lamina_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Build complete");
//! ui::error("Failed to parse lamina.toml");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether status lines are colored.
///
/// `no_color` (the `--no-color` flag) always wins; otherwise `NO_COLOR`,
/// `FORCE_COLOR` and terminal detection decide.
pub fn init_colors(no_color: bool) {
    COLORS.store(
        !no_color && crate::logger::should_use_colors(),
        Ordering::Relaxed,
    );
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

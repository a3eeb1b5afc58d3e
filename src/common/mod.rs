pub mod units;

use std::path::Path;
use tracing::Level;

// image formats where the renderer embeds every datapoint instead of
// rasterizing, so oversized inputs bloat the output file
const VECTOR_FORMATS: &[&str] = &["svg", "ps", "eps", "pdf"];

/// Returns true if the destination produces a vector image, judged by the
/// file extension.
pub fn is_vector_format(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VECTOR_FORMATS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Initializes the stderr debug log. The verbosity count maps onto the log
/// level the same way across all subcommands.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_format_detection() {
        assert!(is_vector_format(Path::new("plots/offset.svg")));
        assert!(is_vector_format(Path::new("offset.PDF")));
        assert!(is_vector_format(Path::new("offset.eps")));
        assert!(is_vector_format(Path::new("offset.ps")));

        assert!(!is_vector_format(Path::new("offset.png")));
        assert!(!is_vector_format(Path::new("offset.json")));
        assert!(!is_vector_format(Path::new("offset")));
    }
}

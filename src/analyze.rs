//! Parsing of `otool -L` listings.

/// Parse `otool -L` output into the linked library paths, in listing order.
///
/// Example otool output:
/// ```text
/// App.app/Contents/MacOS/App:
/// 	/usr/local/lib/libfoo.dylib (compatibility version 1.0.0, current version 1.2.3)
/// 	/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1319.0.0)
/// ```
///
/// The first line echoes the target and is dropped, as are the per-architecture
/// banners printed for universal binaries.
pub fn parse_otool_output(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(|line| match line.find(" (") {
            Some(end) => line[..end].to_string(),
            None => line.to_string(),
        })
        .collect()
}

//! Locates the goohost report file from the tool's captured stdout.
//!
//! goohost ends a run with `Results saved in file <path>`, relative to the
//! directory it was started from. The first location found sticks for the
//! lifetime of the locator.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static RESULTS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Results saved in file (\S+)").expect("results marker pattern is valid")
});

/// One-shot report locator.
#[derive(Debug, Default, Clone)]
pub struct ReportLocator {
    location: Option<PathBuf>,
}

impl ReportLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The report location, if one has been found.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Find the report path in `captured_output`.
    ///
    /// Returns `None` when the marker is absent, meaning the report is not
    /// ready yet. Once a path has been found it is returned for every later
    /// call without looking at the new output.
    pub fn locate(&mut self, captured_output: &str, working_dir: &Path) -> Option<&Path> {
        if self.location.is_none() {
            let relative = find_marker(captured_output)?;
            let path = join_report_path(working_dir, relative);
            tracing::debug!(path = %path.display(), "Located goohost report");
            self.location = Some(path);
        }
        self.location.as_deref()
    }
}

/// The path token following the first results marker.
pub fn find_marker(captured_output: &str) -> Option<&str> {
    RESULTS_MARKER
        .captures(captured_output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `working_dir + "/" + relative`, as the tool reports paths relative to
/// its own working directory.
fn join_report_path(working_dir: &Path, relative: &str) -> PathBuf {
    let base = working_dir.as_os_str();
    let mut joined = match base.as_encoded_bytes().strip_suffix(b"/") {
        // SAFETY: the bytes come from an `OsStr` and are split right before
        // an ASCII `/`, which is a valid boundary.
        Some(trimmed) => unsafe { OsStr::from_encoded_bytes_unchecked(trimmed) }.to_os_string(),
        None => base.to_os_string(),
    };
    joined.push("/");
    joined.push(relative);
    PathBuf::from(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_report_relative_to_working_dir() {
        let mut locator = ReportLocator::new();
        let output = "Starting scan...\nResults saved in file out/report.txt\nDone.\n";
        let path = locator.locate(output, Path::new("/tmp/run1"));
        assert_eq!(path, Some(Path::new("/tmp/run1/out/report.txt")));
    }

    #[test]
    fn missing_marker_is_not_ready() {
        let mut locator = ReportLocator::new();
        assert_eq!(locator.locate("Starting scan...\nDone.\n", Path::new("/tmp/run1")), None);
        assert_eq!(locator.location(), None);
    }

    #[test]
    fn location_is_memoized() {
        let mut locator = ReportLocator::new();
        let first = locator
            .locate("Results saved in file a.txt", Path::new("/tmp/run1"))
            .map(Path::to_path_buf);
        let second = locator
            .locate("Results saved in file b.txt", Path::new("/tmp/run2"))
            .map(Path::to_path_buf);
        assert_eq!(first, Some(PathBuf::from("/tmp/run1/a.txt")));
        assert_eq!(first, second);

        // Output without a marker still returns the stored location.
        assert_eq!(
            locator.locate("", Path::new("/elsewhere")),
            Some(Path::new("/tmp/run1/a.txt"))
        );
    }

    #[test]
    fn failed_search_does_not_stick() {
        let mut locator = ReportLocator::new();
        assert!(locator.locate("still running", Path::new("/tmp/run1")).is_none());
        assert_eq!(
            locator.locate("Results saved in file report-1.txt", Path::new("/tmp/run1")),
            Some(Path::new("/tmp/run1/report-1.txt"))
        );
    }

    #[test]
    fn first_marker_wins() {
        assert_eq!(
            find_marker("Results saved in file one.txt\nResults saved in file two.txt"),
            Some("one.txt")
        );
    }

    #[test]
    fn marker_token_stops_at_whitespace() {
        assert_eq!(
            find_marker("Results saved in file report.txt (42 hosts)"),
            Some("report.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_working_dir_is_kept_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let mut locator = ReportLocator::new();
        let dir = Path::new(OsStr::from_bytes(b"/tmp/run\xff"));
        let path = locator.locate("Results saved in file r.txt", dir);
        assert_eq!(
            path.map(|p| p.as_os_str().as_bytes()),
            Some(&b"/tmp/run\xff/r.txt"[..])
        );

        let with_slash = join_report_path(Path::new(OsStr::from_bytes(b"/tmp/run\xff/")), "r.txt");
        assert_eq!(with_slash.as_os_str().as_bytes(), b"/tmp/run\xff/r.txt");
    }

    #[test]
    fn trailing_slash_in_working_dir() {
        assert_eq!(
            join_report_path(Path::new("/tmp/run1/"), "report.txt"),
            PathBuf::from("/tmp/run1/report.txt")
        );
    }
}

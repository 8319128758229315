//! Best-effort enumeration of per-day log files.
//!
//! The device has no guaranteed directory-listing endpoint: which
//! endpoints exist varies by firmware and deployment configuration. The
//! lister therefore runs an explicit ordered chain of strategies with a
//! uniform signature, trying each only when the previous one failed or
//! matched nothing, and logging which strategy produced the result:
//!
//! 1. `file_reader.php` with the directory as its query parameter,
//!    scanning whatever body comes back for filename-grammar matches.
//! 2. The archive HTML page, scanning for filenames whose embedded date
//!    matches the `/YYYY/MM/DD` suffix of the requested directory.
//!
//! Zero results from every strategy is "no cycles this day", not an
//! error; a transport failure inside one strategy demotes to the next
//! rather than propagating.

use std::collections::HashSet;

use tracing::{debug, warn};

use scilog_types::{filename, FileInfo};

use crate::client::Autoclave;
use crate::error::Result;
use crate::transport::Transport;

/// Ordered fallback strategies for directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingStrategy {
    /// Generic file-reader endpoint queried with the directory path.
    FileReader,
    /// Archive page scan filtered by the directory's date suffix.
    ArchivePage,
}

impl<T: Transport> Autoclave<T> {
    /// Enumerate log filenames under an on-device directory.
    ///
    /// `dir_path` is an absolute device path such as
    /// `/opt/data/scilog/2025/10/08`. Matches are de-duplicated and
    /// returned in order of first appearance. An empty result means the
    /// device holds no logs for that day (or exposes neither listing
    /// endpoint); callers must tolerate it.
    pub async fn list_directory_files(&self, dir_path: &str) -> Result<Vec<String>> {
        for strategy in [ListingStrategy::FileReader, ListingStrategy::ArchivePage] {
            let outcome = match strategy {
                ListingStrategy::FileReader => self.list_via_file_reader(dir_path).await,
                ListingStrategy::ArchivePage => self.list_via_archive_page(dir_path).await,
            };
            match outcome {
                Ok(files) if !files.is_empty() => {
                    debug!(?strategy, count = files.len(), dir_path, "directory listed");
                    return Ok(files);
                }
                Ok(_) => debug!(?strategy, dir_path, "strategy found no files"),
                Err(e) => warn!(?strategy, dir_path, error = %e, "listing strategy failed"),
            }
        }
        Ok(Vec::new())
    }

    async fn list_via_file_reader(&self, dir_path: &str) -> Result<Vec<String>> {
        let url = self.url(&format!("/data/file_reader.php?filename={dir_path}"));
        let response = self
            .transport()
            .get("list_directory_files", &url, self.discovery_timeout())
            .await?;
        if !response.is_success() {
            return Ok(Vec::new());
        }
        Ok(dedupe(filename::scan_file_names(&response.body)))
    }

    async fn list_via_archive_page(&self, dir_path: &str) -> Result<Vec<String>> {
        let Some((year, month, day)) = date_suffix(dir_path) else {
            debug!(dir_path, "directory path carries no date suffix");
            return Ok(Vec::new());
        };

        let url = self.url("/us/archives.php");
        let response = self
            .transport()
            .get("list_directory_files", &url, self.data_timeout())
            .await?;
        if !response.is_success() {
            return Ok(Vec::new());
        }

        let names = filename::scan_file_names(&response.body)
            .into_iter()
            .filter(|name| {
                FileInfo::parse(name)
                    .is_some_and(|f| f.year == year && f.month == month && f.day == day)
            })
            .collect();
        Ok(dedupe(names))
    }
}

/// Interpret the trailing `/YYYY/MM/DD` segments of a directory path.
fn date_suffix(dir_path: &str) -> Option<(i32, u8, u8)> {
    let mut segments = dir_path
        .trim_end_matches('/')
        .rsplit('/')
        .filter(|s| !s.is_empty());
    let day: u8 = segments.next()?.parse().ok()?;
    let month: u8 = segments.next()?.parse().ok()?;
    let year: i32 = segments.next()?.parse().ok()?;
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month, day))
}

/// De-duplicate while preserving first-appearance order.
fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn device(transport: MockTransport) -> Autoclave<MockTransport> {
        Autoclave::with_transport("10.0.0.2", 80, transport).unwrap()
    }

    const DAY_DIR: &str = "/opt/data/scilog/2025/10/08";

    #[test]
    fn test_date_suffix() {
        assert_eq!(date_suffix(DAY_DIR), Some((2025, 10, 8)));
        assert_eq!(date_suffix("/opt/data/scilog/2025/10/08/"), Some((2025, 10, 8)));
        assert_eq!(date_suffix("/opt/data/scilog"), None);
        assert_eq!(date_suffix("/opt/data/scilog/2025/13/08"), None);
        assert_eq!(date_suffix(""), None);
    }

    #[tokio::test]
    async fn test_file_reader_strategy_wins() {
        let transport = MockTransport::new();
        transport.respond(
            "/data/file_reader.php",
            200,
            "S20251008_01755_710123B00004.txt\nS20251008_01755_710123B00004.cpt\n\
             S20251008_01755_710123B00004.txt\n",
        );
        let device = device(transport);
        let files = device.list_directory_files(DAY_DIR).await.unwrap();
        assert_eq!(
            files,
            vec![
                "S20251008_01755_710123B00004.txt",
                "S20251008_01755_710123B00004.cpt",
            ],
        );
        // The archive fallback must not have been touched.
        assert_eq!(device.transport().call_count("/us/archives.php"), 0);
        assert_eq!(device.transport().call_count("/data/file_reader.php"), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_empty_primary() {
        let transport = MockTransport::new();
        transport.respond("/data/file_reader.php", 200, "no logs here");
        transport.respond(
            "/us/archives.php",
            200,
            "<tr><td>S20251008_01755_710123B00004</td></tr>\
             <tr><td>S20251007_01754_710123B00004</td></tr>",
        );
        let device = device(transport);
        let files = device.list_directory_files(DAY_DIR).await.unwrap();
        // Only the file dated 2025/10/08 matches the requested directory.
        assert_eq!(files, vec!["S20251008_01755_710123B00004"]);
        assert_eq!(device.transport().call_count("/us/archives.php"), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_primary_http_error() {
        let transport = MockTransport::new();
        transport.respond("/data/file_reader.php", 404, "");
        transport.respond(
            "/us/archives.php",
            200,
            "S20251008_01755_710123B00004.txt",
        );
        let files = device(transport).list_directory_files(DAY_DIR).await.unwrap();
        assert_eq!(files, vec!["S20251008_01755_710123B00004.txt"]);
    }

    #[tokio::test]
    async fn test_fallback_on_primary_timeout() {
        let transport = MockTransport::new();
        transport.time_out("/data/file_reader.php");
        transport.respond(
            "/us/archives.php",
            200,
            "S20251008_01755_710123B00004.txt",
        );
        let files = device(transport).list_directory_files(DAY_DIR).await.unwrap();
        assert_eq!(files, vec!["S20251008_01755_710123B00004.txt"]);
    }

    #[tokio::test]
    async fn test_all_strategies_empty_is_ok() {
        let transport = MockTransport::new();
        transport.respond("/data/file_reader.php", 200, "");
        transport.respond("/us/archives.php", 200, "<html></html>");
        let files = device(transport).list_directory_files(DAY_DIR).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_undated_directory_skips_archive_strategy() {
        let transport = MockTransport::new();
        transport.respond("/data/file_reader.php", 200, "");
        let device = device(transport);
        let files = device.list_directory_files("/opt/data/scilog").await.unwrap();
        assert!(files.is_empty());
        assert_eq!(device.transport().call_count("/us/archives.php"), 0);
    }
}

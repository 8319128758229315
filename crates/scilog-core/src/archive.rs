//! Cycle index fetcher: scraping the device's archive page.
//!
//! The device exposes no machine-readable export of its cycle catalog.
//! The `/us/archives.php` page embeds a JavaScript array literal
//! (`cyclesInfo = [...];`) that the page's own script renders into a
//! table; this module extracts that literal and parses it as the
//! catalog. The extraction is deliberately confined to one narrow
//! function, [`extract_cycles_info`], so a firmware change to the page
//! structure means revising exactly one place — and callers already
//! treat "no catalog" as a valid state (a freshly commissioned unit has
//! zero cycles).

use tracing::{debug, warn};

use scilog_types::CycleInfo;

use crate::client::Autoclave;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Marker preceding the embedded catalog literal.
const CYCLES_INFO_MARKER: &str = "cyclesInfo";

impl<T: Transport> Autoclave<T> {
    /// Retrieve the full catalog of cycles known to the device.
    ///
    /// An absent `cyclesInfo` marker or an unparseable literal yields an
    /// empty catalog, not an error. Transport failures and non-2xx
    /// statuses still propagate — an unreachable device is a fault, an
    /// empty archive is not.
    pub async fn fetch_all_cycles(&self) -> Result<Vec<CycleInfo>> {
        let url = self.url("/us/archives.php");
        let response = self
            .transport()
            .get("fetch_all_cycles", &url, self.data_timeout())
            .await?;
        if !response.is_success() {
            return Err(Error::http_status(response.status));
        }

        let cycles = extract_cycles_info(&response.body).unwrap_or_default();
        debug!(count = cycles.len(), "fetched archive catalog");
        Ok(cycles)
    }
}

/// Extract and parse the `cyclesInfo = [...]` literal from archive HTML.
///
/// Returns `None` when the marker is absent or the literal does not
/// parse; both are logged and treated by callers as an empty catalog.
pub(crate) fn extract_cycles_info(html: &str) -> Option<Vec<CycleInfo>> {
    let literal = match extract_array_literal(html, CYCLES_INFO_MARKER) {
        Some(literal) => literal,
        None => {
            warn!("archive page has no cyclesInfo array");
            return None;
        }
    };
    match serde_json::from_str(literal) {
        Ok(cycles) => Some(cycles),
        Err(e) => {
            warn!(error = %e, "cyclesInfo literal did not parse");
            None
        }
    }
}

/// Locate `marker = [...]` in `text` and return the balanced `[...]`
/// slice.
///
/// The scan is bracket-balanced and string-aware so array contents may
/// contain brackets inside quoted values.
fn extract_array_literal<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let marker_at = text.find(marker)?;
    let after = &text[marker_at + marker.len()..];

    // Expect `= [` with arbitrary whitespace.
    let mut rest = after.trim_start();
    rest = rest.strip_prefix('=')?.trim_start();
    if !rest.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Filter a catalog to cycles that started on the given UTC calendar
/// date.
///
/// When `day` is `None`, the whole month matches. Entries with an
/// out-of-range epoch are excluded.
#[must_use]
pub fn filter_by_date(
    cycles: &[CycleInfo],
    year: i32,
    month: u8,
    day: Option<u8>,
) -> Vec<CycleInfo> {
    cycles
        .iter()
        .filter(|c| c.matches_date(year, month, day))
        .cloned()
        .collect()
}

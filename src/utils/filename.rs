//! Local filename derivation

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Extension used for every downloaded file
pub const MEDIA_EXTENSION: &str = "mp4";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("static pattern"));

/// Build `<author>_<YYYY-MM-DD>_<id>.mp4`.
///
/// The parts are used exactly as given: nothing is escaped, so a handle or id
/// carrying path separators ends up in the name as is. Use [`has_unsafe_chars`]
/// to detect that case.
pub fn build_filename(author: &str, create_time: i64, id: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        author,
        format_create_date(create_time),
        id,
        MEDIA_EXTENSION
    )
}

/// Convert epoch seconds to a UTC calendar date.
///
/// Values chrono cannot represent map to the epoch date.
pub fn format_create_date(create_time: i64) -> String {
    DateTime::<Utc>::from_timestamp(create_time, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

/// Check whether a filename contains characters most filesystems reject
pub fn has_unsafe_chars(filename: &str) -> bool {
    UNSAFE_CHARS.is_match(filename)
}

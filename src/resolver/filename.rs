//! Output file name derivation from a video title.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9._\-]").expect("file name regex is valid") // Static pattern, safe to panic
});

/// Builds the output file name for a video.
///
/// The title is lowercased, spaces become underscores, `.{container}` is
/// appended, and every character outside `[A-Za-z0-9._-]` is removed from the
/// result.
#[must_use]
pub fn derive_file_name(title: &str, container: &str) -> String {
    let stem = title.to_lowercase().replace(' ', "_");
    let joined = format!("{stem}.{container}");
    DISALLOWED_CHARS.replace_all(&joined, "").into_owned()
}

//! Token normalization for part identifiers and display names.
//!
//! Raw tokens arrive from heterogeneous tabular sources and carry the usual
//! artifacts: surrounding whitespace, runs of internal whitespace, and
//! identifiers that passed through a numeric spreadsheet cell and picked up a
//! trailing `.0`. Normalization is applied once at the boundary so every
//! comparison downstream operates on a canonical form, while the original
//! spelling stays available for display.

/// Normalize a raw token: trim, collapse internal whitespace runs to a single
/// space, and strip spreadsheet float artifacts (`"123.0"` -> `"123"`).
///
/// Case is preserved; use [`fold_token`] for case-insensitive comparison.
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw.trim());
    strip_float_artifact(&collapsed)
}

/// Case-folded form of an already-normalized token, used by the
/// case-insensitive resolution stage.
#[must_use]
pub fn fold_token(normalized: &str) -> String {
    normalized.to_lowercase()
}

/// Collapse every run of whitespace to a single ASCII space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a trailing `.0` (or `.00`, ...) from an otherwise all-digit token.
///
/// Spreadsheet loaders hand numeric cells over as floats, so the part number
/// `0114032` round-trips as `0114032.0`. Only purely numeric tokens are
/// rewritten; `rev 1.0` and `A.0` pass through untouched.
fn strip_float_artifact(s: &str) -> String {
    if let Some((int_part, frac_part)) = s.split_once('.') {
        if !int_part.is_empty()
            && int_part.chars().all(|c| c.is_ascii_digit())
            && !frac_part.is_empty()
            && frac_part.chars().all(|c| c == '0')
        {
            return int_part.to_string();
        }
    }
    s.to_string()
}

//! Revision identifier matching

/// Shortest abbreviation git itself accepts.
pub const MIN_ABBREV_LEN: usize = 4;

/// Longest object id (SHA-256 repositories).
pub const MAX_REVISION_LEN: usize = 64;

/// Whether `current` satisfies a pin on `pinned`.
///
/// A pin is satisfied when the current revision equals it or starts with it,
/// so abbreviated pins match full object ids. Comparison ignores ASCII case.
/// An empty pin never matches.
pub fn revision_satisfies(current: &str, pinned: &str) -> bool {
    let current = current.trim();
    let pinned = pinned.trim();
    if pinned.is_empty() {
        return false;
    }

    current.eq_ignore_ascii_case(pinned)
        || current
            .get(..pinned.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(pinned))
}

/// Whether `candidate` looks like a full or abbreviated object id.
pub fn is_revision_id(candidate: &str) -> bool {
    (MIN_ABBREV_LEN..=MAX_REVISION_LEN).contains(&candidate.len())
        && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc123def456", "abc123def", true)]
    #[case("abc123def", "abc123def", true)]
    #[case("ABC123DEF456", "abc123", true)]
    #[case("cafebabe", "deadbeef", false)]
    #[case("abc", "abc123", false)]
    #[case("abc123\n", "abc123", true)]
    #[case("abc123", "", false)]
    fn satisfies(#[case] current: &str, #[case] pinned: &str, #[case] expected: bool) {
        assert_eq!(revision_satisfies(current, pinned), expected);
    }

    #[rstest]
    #[case("deadbeef", true)]
    #[case("DEADBEEF", true)]
    #[case("abc", false)]
    #[case("main", false)]
    #[case("v1.0", false)]
    #[case("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", true)]
    #[case("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", false)]
    fn revision_ids(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_revision_id(candidate), expected);
    }
}

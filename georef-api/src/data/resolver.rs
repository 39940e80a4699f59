//! Identifier resolution
//!
//! Turns a caller-supplied identifier (numeric id or alias, any case) into a
//! canonical region id. Region and commune lookups both go through
//! [`resolve_region_id`], so one identifier always names the same region.

use super::RegionIndex;

/// Is `s` a plain integer or decimal number?
///
/// Accepts an optional sign, ASCII digits and at most one decimal point with
/// at least one digit overall: `"7"`, `"-3"`, `"01"`, `"2.5"`, `".5"`, `"5."`.
/// Rejects empty or whitespace-only input, inner or surrounding whitespace,
/// exponents, hex, `"Infinity"` and `"NaN"`.
pub fn is_numeric(s: &str) -> bool {
    let body = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);

    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body, None),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return false;
    }

    match frac_part {
        None => !int_part.is_empty(),
        Some(frac) => all_digits(frac) && !(int_part.is_empty() && frac.is_empty()),
    }
}

/// Resolve an identifier to a region id
///
/// Numeric identifiers are returned as-is (compared as strings later, so
/// `"1"` and `"01"` differ) without consulting aliases. Anything else is
/// lower-cased and matched against region aliases; the first-loaded region
/// carrying the alias wins. `None` when no alias matches.
///
/// A numeric result is not checked against the index here; callers treat an
/// unknown id the same as a failed resolution.
pub fn resolve_region_id(regions: &RegionIndex, identifier: &str) -> Option<String> {
    let needle = identifier.to_lowercase();

    if is_numeric(&needle) {
        return Some(needle);
    }

    // Stored aliases are never empty
    if needle.is_empty() {
        return None;
    }

    regions.id_for_alias(&needle).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Region;

    fn region(id: &str, aliases: &[&str]) -> Region {
        Region {
            id: id.to_string(),
            name: format!("Region {}", id),
            alias: aliases.iter().map(|a| a.to_string()).collect(),
            capital: String::new(),
            climate: String::new(),
            coordinates: String::new(),
        }
    }

    fn index(regions: Vec<Region>) -> RegionIndex {
        regions.into_iter().collect()
    }

    #[test]
    fn test_is_numeric_accepts_integers_and_decimals() {
        for s in ["0", "1", "01", "999", "-3", "+4", "2.5", ".5", "5."] {
            assert!(is_numeric(s), "{:?} should be numeric", s);
        }
    }

    #[test]
    fn test_is_numeric_rejects_non_numbers() {
        for s in [
            "", " ", "\t", ".", "-", "+", "1 ", " 1", "1 2", "1e3", "0x10", "infinity", "nan",
            "1.2.3", "rm", "1a",
        ] {
            assert!(!is_numeric(s), "{:?} should not be numeric", s);
        }
    }

    #[test]
    fn test_alias_match_is_case_insensitive() {
        let regions = index(vec![region("1", &["rm", "metropolitana"])]);

        assert_eq!(resolve_region_id(&regions, "RM"), Some("1".to_string()));
        assert_eq!(
            resolve_region_id(&regions, "Metropolitana"),
            Some("1".to_string())
        );
        assert_eq!(resolve_region_id(&regions, "santiago"), None);
    }

    #[test]
    fn test_numeric_identifier_kept_as_string() {
        let regions = index(vec![region("1", &[])]);

        assert_eq!(resolve_region_id(&regions, "1"), Some("1".to_string()));
        assert_eq!(resolve_region_id(&regions, "01"), Some("01".to_string()));
        // Resolves even when absent; the index lookup decides
        assert_eq!(resolve_region_id(&regions, "999"), Some("999".to_string()));
    }

    #[test]
    fn test_numeric_path_takes_precedence_over_numeric_alias() {
        let regions = index(vec![region("5", &["13"]), region("13", &[])]);

        assert_eq!(resolve_region_id(&regions, "13"), Some("13".to_string()));
    }

    #[test]
    fn test_empty_identifier_never_matches() {
        let regions = index(vec![region("1", &[]), region("2", &["x"])]);

        assert_eq!(resolve_region_id(&regions, ""), None);
    }

    #[test]
    fn test_shared_alias_resolves_to_first_loaded() {
        let regions = index(vec![region("8", &["x"]), region("2", &["x"])]);

        assert_eq!(resolve_region_id(&regions, "x"), Some("8".to_string()));
        assert_eq!(resolve_region_id(&regions, "X"), Some("8".to_string()));
    }

    #[test]
    fn test_alias_map_agrees_with_linear_scan() {
        let regions = index(vec![
            region("1", &["a", "b"]),
            region("2", &["b", "c"]),
            region("3", &["c", "d"]),
        ]);

        for alias in ["a", "b", "c", "d", "e"] {
            let scanned = regions
                .iter()
                .find(|r| r.has_alias(alias))
                .map(|r| r.id.clone());
            assert_eq!(resolve_region_id(&regions, alias), scanned);
        }
    }
}

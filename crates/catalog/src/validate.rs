/// Checks that `code` matches `DDDD.DDDD` — four ASCII digits, a dot, four ASCII digits.
///
/// A hand-rolled scan rather than a `regex` dependency: the pattern is fixed-width,
/// checked once per record at load time (not a hot path), and a one-pass byte scan is
/// both clearer and cheaper than compiling a pattern for this.
pub fn is_valid_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != 9 {
        return false;
    }
    bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'.'
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

/// Splits a validated code into its hierarchy prefixes, mirroring the original
/// `parse_nco_code` helper: division (1 digit), sub-division (2), minor group (3),
/// unit group (4).
pub fn hierarchy_prefixes(code: &str) -> Option<(&str, &str, &str, &str)> {
    if !is_valid_code(code) {
        return None;
    }
    Some((&code[..1], &code[..2], &code[..3], &code[..4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_codes() {
        assert!(is_valid_code("7212.0100"));
        assert!(is_valid_code("0000.0000"));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(!is_valid_code("721.0100"));
        assert!(!is_valid_code("7212-0100"));
        assert!(!is_valid_code("7212.010"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abcd.efgh"));
    }

    #[test]
    fn prefixes_match_spec() {
        let (division, sub_division, minor_group, unit_group) =
            hierarchy_prefixes("7212.0100").unwrap();
        assert_eq!(division, "7");
        assert_eq!(sub_division, "72");
        assert_eq!(minor_group, "721");
        assert_eq!(unit_group, "7212");
    }
}

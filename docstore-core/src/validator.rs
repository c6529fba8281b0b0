use once_cell::sync::Lazy;
use regex::Regex;

static DB_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());
static REV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]*-[0-9a-f]{32,}$").unwrap());

/// Pure predicates over names, revisions, and request shapes. None of these
/// touch any stored state; they only decide whether a request is shaped
/// correctly enough to reach the store.
pub struct Validator;

impl Validator {
    pub fn is_valid_db_name(name: &str) -> bool {
        name.len() >= 2 && DB_NAME_RE.is_match(name)
    }

    pub fn is_valid_rev(rev: &str) -> bool {
        REV_RE.is_match(rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_names() {
        assert!(Validator::is_valid_db_name("testdb"));
        assert!(Validator::is_valid_db_name("a1"));
        assert!(!Validator::is_valid_db_name("a"));
        assert!(!Validator::is_valid_db_name("$3213324"));
        assert!(!Validator::is_valid_db_name("Testdb"));
        assert!(!Validator::is_valid_db_name("1abc"));
    }

    #[test]
    fn revisions() {
        assert!(Validator::is_valid_rev(
            "1-abcdef0123456789abcdef0123456789"
        ));
        assert!(!Validator::is_valid_rev("1"));
        assert!(!Validator::is_valid_rev("1-34234234"));
        assert!(!Validator::is_valid_rev("0-abcdef0123456789abcdef0123456789"));
        assert!(!Validator::is_valid_rev("1-ABCDEF0123456789abcdef0123456789"));
    }
}

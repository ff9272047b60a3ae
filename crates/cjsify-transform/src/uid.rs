//! File-unique identifier allocation.

use std::collections::HashSet;

/// Hands out `_name`, `_name2`, ... identifiers that collide with nothing
/// already used in the file.
///
/// One generator per rewritten file; it is seeded with every identifier the
/// program mentions and remembers every name it returns.
#[derive(Debug, Default)]
pub struct UidGenerator {
    used: HashSet<String>,
}

impl UidGenerator {
    pub fn new(used: HashSet<String>) -> Self {
        Self { used }
    }

    /// Allocate a fresh identifier derived from `hint`.
    pub fn generate(&mut self, hint: &str) -> String {
        let base = to_identifier(hint);
        let base = base.trim_start_matches('_').trim_end_matches(|c: char| c.is_ascii_digit());

        let mut i = 1;
        loop {
            let candidate = if i > 1 {
                format!("_{}{}", base, i)
            } else {
                format!("_{}", base)
            };
            if self.used.insert(candidate.clone()) {
                log::trace!("generated identifier {} for {:?}", candidate, hint);
                return candidate;
            }
            i += 1;
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// Squash arbitrary text (usually a module source) into identifier form:
/// `./foo-bar` becomes `fooBar`, `@scope/pkg` becomes `scopePkg`.
pub(crate) fn to_identifier(input: &str) -> String {
    let dashed: String = input
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '-' })
        .collect();
    let trimmed = dashed.trim_start_matches(|c: char| c == '-' || c.is_ascii_digit());

    // Drop each run of separators and upper-case the character after it
    let mut name = String::with_capacity(trimmed.len());
    let mut upper_next = false;
    for c in trimmed.chars() {
        if c == '-' || c.is_whitespace() {
            upper_next = true;
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }

    if name.is_empty() {
        "_".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("a"), "a");
        assert_eq!(to_identifier("./foo-bar"), "fooBar");
        assert_eq!(to_identifier("../lib/index.js"), "libIndexJs");
        assert_eq!(to_identifier("@babel/runtime/helpers/x"), "babelRuntimeHelpersX");
        assert_eq!(to_identifier("123abc"), "abc");
        assert_eq!(to_identifier("trailing/"), "trailing");
        assert_eq!(to_identifier(""), "_");
        assert_eq!(to_identifier("lodash.merge"), "lodashMerge");
    }

    #[test]
    fn test_generate_sequence() {
        let mut uids = UidGenerator::default();
        assert_eq!(uids.generate("a"), "_a");
        assert_eq!(uids.generate("a"), "_a2");
        assert_eq!(uids.generate("a"), "_a3");
        assert_eq!(uids.generate("./b"), "_b");
    }

    #[test]
    fn test_generate_strips_underscores_and_digits() {
        let mut uids = UidGenerator::default();
        assert_eq!(uids.generate("_a_key"), "_a_key");
        assert_eq!(uids.generate("__x2"), "_x");
        assert_eq!(uids.generate("module"), "_module");
    }

    #[test]
    fn test_generate_skips_used_names() {
        let mut uids = UidGenerator::new(["_a", "_a2", "_b"].map(String::from).into());
        assert_eq!(uids.generate("a"), "_a3");
        assert_eq!(uids.generate("b"), "_b2");
        // generated names are taken too
        assert_eq!(uids.generate("b"), "_b3");
    }
}

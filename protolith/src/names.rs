//! Case/underscore-insensitive field-name matching, used by the generated
//! string-keyed `has`/`reset` hooks.

/// Fold a field name into its canonical form: lowercase with underscores
/// stripped. `"foo_bar"`, `"FooBar"`, and `"FOOBAR"` all canonicalize to the
/// same string, so init/accessor name matching is case- and
/// underscore-insensitive.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn folds_case_and_underscores() {
        assert_eq!(canonicalize("foo_bar"), "foobar");
        assert_eq!(canonicalize("FooBar"), "foobar");
        assert_eq!(canonicalize("FOO_BAR"), "foobar");
    }
}

//! Join name canonicalization.

/// Canonical form of a join name: letters and digits only, lower-cased.
///
/// `Upper_Pascal`, `upperPascal` and `upper-pascal` all canonicalize to
/// `upperpascal`.
pub fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

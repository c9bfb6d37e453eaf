use alloc::string::String;
use alloc::vec::Vec;

/// Canonicalizes a navigation location into a snapshot key.
///
/// Query parameters are sorted by name (then value); pairs whose value is
/// empty or equals a known default are dropped. Two locations differing only
/// in parameter order or in the presence of a default-valued parameter map
/// to the same key.
pub fn canonical_location_key(
    pathname: &str,
    query: &[(&str, &str)],
    defaults: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(&str, &str)> = query
        .iter()
        .copied()
        .filter(|(name, value)| {
            !value.is_empty() && !defaults.iter().any(|(dn, dv)| dn == name && dv == value)
        })
        .collect();
    pairs.sort_unstable();
    pairs.dedup();

    let mut out = String::from(pathname);
    for (i, (name, value)) in pairs.iter().enumerate() {
        out.push(if i == 0 { '?' } else { '&' });
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
    out
}

/// Prefixes a canonical location key with a navigation-index token.
///
/// History-index keys survive reloads where URL state may not; savers and
/// lookups try this key before the plain location key.
pub fn nav_key(nav_index: u64, location_key: &str) -> String {
    alloc::format!("nav:{nav_index}:{location_key}")
}

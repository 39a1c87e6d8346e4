use super::Platform;

/// Expand expected link names for the given platform.
///
/// On Windows every name `n` is followed by its `n.cmd` shim, in input order.
/// Elsewhere the names are returned unchanged.
pub fn expand<S: AsRef<str>>(names: &[S], platform: Platform) -> Vec<String> {
    if !platform.is_windows() {
        return names.iter().map(|n| n.as_ref().to_string()).collect();
    }

    names
        .iter()
        .flat_map(|n| {
            let name = n.as_ref();
            [name.to_string(), format!("{}.cmd", name)]
        })
        .collect()
}

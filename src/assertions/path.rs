//! Field lookup by dotted path.

use serde_json::Value;

/// Resolve `path` inside `root`.
///
/// Segments are separated by `.`; `a[0]` is shorthand for `a.0`. Numeric
/// segments index arrays and are ordinary keys on objects. An empty path
/// resolves to nothing.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = segments(path);
    if segments.is_empty() {
        return None;
    }

    segments.iter().try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn segments(path: &str) -> Vec<&str> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty())
        .collect()
}

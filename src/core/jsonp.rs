//! JSONP unwrapping: `widgetCallback(<payload>);` → `<payload>`.

pub const DEFAULT_CALLBACK: &str = "widgetCallback";

/// Strips `callback(` and one trailing `);` from a feed body.
///
/// Each side is removed only when it matches, so text without the wrapper
/// comes back untouched and the JSON parse that follows is expected to fail.
/// Whitespace after the closing `);` is tolerated.
pub fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> &'a str {
    let inner = body
        .strip_prefix(callback)
        .and_then(|rest| rest.strip_prefix('('))
        .unwrap_or(body);

    match inner.trim_end().strip_suffix(");") {
        Some(payload) => payload,
        None => inner,
    }
}

//! SDK script injection.

use chrono::{DateTime, Utc};

use crate::host::{PageHost, ScriptLoad, ScriptTag, SCRIPT_ELEMENT_ID};

/// Append the cache-busting `t=<unix millis>` query to `url`.
#[must_use]
pub fn script_src(url: &str, now: DateTime<Utc>) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={}", now.timestamp_millis())
}

/// Build the SDK script tag for `url`.
#[must_use]
pub fn script_tag(url: &str, now: DateTime<Utc>) -> ScriptTag {
    ScriptTag {
        id: SCRIPT_ELEMENT_ID.to_string(),
        src: script_src(url, now),
        async_load: true,
    }
}

/// Append the SDK script to the page and report how it settled.
///
/// `on_settled` runs once, after the browser fires `load` or `error`. There
/// is no retry. Returns the full script source that was injected.
pub fn inject_script(
    host: &dyn PageHost,
    url: &str,
    on_settled: impl FnOnce(ScriptLoad) + 'static,
) -> String {
    let tag = script_tag(url, Utc::now());
    let src = tag.src.clone();

    tracing::debug!(src = %src, id = SCRIPT_ELEMENT_ID, "injecting payments SDK script");
    host.append_script(tag, Box::new(on_settled));

    src
}

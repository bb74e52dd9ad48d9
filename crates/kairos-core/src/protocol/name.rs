//! Metric name composition.

/// Join name components with `.`, skipping absent or empty parts.
///
/// ```
/// use kairos_core::protocol::name::metric_name;
///
/// assert_eq!(metric_name(Some("app"), ["db.timer", "p99"]), "app.db.timer.p99");
/// assert_eq!(metric_name(None, ["gauge", ""]), "gauge");
/// ```
pub fn metric_name<'a, I>(prefix: Option<&'a str>, components: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    let parts = prefix.into_iter().chain(components);
    for part in parts.filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(part);
    }
    out
}

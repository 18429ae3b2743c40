//! Device-class validation shared by the entity adapters.

/// Validate a configured device class against a platform's allowed set.
///
/// Unknown values are dropped with a warning instead of failing setup; a
/// misspelled class should not take the whole entity down.
pub(crate) fn validate(
    platform: &'static str,
    allowed: &[&str],
    value: Option<&str>,
) -> Option<String> {
    let value = value?;
    if allowed.contains(&value) {
        Some(value.to_owned())
    } else {
        tracing::warn!(platform, device_class = value, "ignoring unknown device class");
        None
    }
}

//! Host-name placeholders in tag values.
//!
//! `${host.name}` expands to the machine hostname and `${host.name.short}`
//! to its first label. Other text is kept as-is and validated later as a tag.

use kairos_core::error::{KairosError, Result};

const HOST_NAME: &str = "${host.name}";
const HOST_NAME_SHORT: &str = "${host.name.short}";

/// Expand host placeholders in `template`.
pub fn resolve_host_template(template: &str) -> Result<String> {
    if !template.contains(HOST_NAME) && !template.contains(HOST_NAME_SHORT) {
        return Ok(template.to_string());
    }

    let host = local_hostname()?;
    let short = host.split('.').next().unwrap_or(host.as_str());
    Ok(template
        .replace(HOST_NAME_SHORT, short)
        .replace(HOST_NAME, &host))
}

fn local_hostname() -> Result<String> {
    hostname::get()?
        .into_string()
        .map_err(|_| KairosError::Config("hostname is not valid UTF-8".into()))
}

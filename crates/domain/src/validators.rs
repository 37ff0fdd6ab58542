use crate::errors::DomainError;

pub const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_URL_LEN: usize = 2048;

/// Normalises a user- or list-supplied domain into the form the decision
/// cascade looks up: trimmed, lowercase, no trailing root dot.
pub fn normalize_domain(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(DomainError::InvalidDomainName("domain cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_DOMAIN_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "domain exceeds {MAX_DOMAIN_LEN} characters"
        )));
    }

    let domain = trimmed.to_ascii_lowercase();
    for label in domain.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "invalid label in '{domain}'"
            )));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(DomainError::InvalidDomainName(format!(
                "invalid character in '{domain}'"
            )));
        }
    }

    Ok(domain)
}

/// Checks a blocklist source URL: http or https, a host, no whitespace.
/// Returns the trimmed URL.
pub fn validate_source_url(input: &str) -> Result<String, DomainError> {
    let url = input.trim();
    if url.len() > MAX_URL_LEN {
        return Err(DomainError::InvalidSourceUrl(format!(
            "URL cannot exceed {MAX_URL_LEN} characters"
        )));
    }

    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return Err(DomainError::InvalidSourceUrl(
            "URL must start with http:// or https://".to_string(),
        ));
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return Err(DomainError::InvalidSourceUrl(format!("no host in '{url}'")));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidSourceUrl(format!(
            "whitespace in '{url}'"
        )));
    }

    Ok(url.to_string())
}

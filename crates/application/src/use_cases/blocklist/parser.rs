use ferrous_shield_domain::validators::normalize_domain;
use ferrous_shield_domain::BlockedDomain;
use std::collections::HashSet;

/// Extracts the domain token from one blocklist line.
///
/// Supported formats:
/// - `# comment`, `! comment` or blank → None
/// - `0.0.0.0 domain` / `127.0.0.1 domain` / `:: domain` → domain
/// - `domain` → domain
///
/// Trailing `# comments` are ignored. Self-referential hosts entries
/// (`localhost`, `broadcasthost`, ...) are skipped.
pub fn parse_blocklist_line(line: &str) -> Option<&str> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('!') {
        return None;
    }

    let mut parts = line.split_whitespace();
    let first = parts.next()?;

    match parts.next() {
        Some(domain) if matches!(first, "0.0.0.0" | "127.0.0.1" | "::" | "::1") => {
            if matches!(
                domain,
                "localhost" | "localhost.localdomain" | "0.0.0.0" | "broadcasthost"
                    | "ip6-localhost" | "ip6-loopback"
            ) {
                return None;
            }
            Some(domain)
        }
        Some(_) => None,
        None => Some(first),
    }
}

/// Parses a whole blocklist into classified, normalised, de-duplicated
/// records. Returns the records and the number of non-comment lines that
/// were rejected.
pub fn parse_blocklist(content: &str) -> (Vec<BlockedDomain>, usize) {
    let mut seen = HashSet::new();
    let mut domains = Vec::new();
    let mut rejected = 0usize;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let Some(token) = parse_blocklist_line(trimmed) else {
            rejected += 1;
            continue;
        };

        match normalize_domain(token) {
            Ok(domain) => {
                if seen.insert(domain.clone()) {
                    domains.push(BlockedDomain::classified(&domain));
                }
            }
            Err(_) => rejected += 1,
        }
    }

    (domains, rejected)
}

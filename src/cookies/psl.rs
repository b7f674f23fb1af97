//! Domain rules: Public Suffix List lookups and RFC 6265 domain matching.
//!
//! Prevents supercookie attacks by rejecting cookies set on public
//! suffixes like `.com`, `.co.uk`, etc., and decides whether a cookie
//! host belongs to the same party as the scanned site.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

use psl::{List, Psl};

/// Check if a domain is exactly a public suffix (e.g., "com", "co.uk").
///
/// Returns false for registrable domains ("example.com"), for domains
/// under an unlisted TLD and for plain hostnames like "localhost".
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    let domain_bytes = domain_lower.as_bytes();

    match List.suffix(domain_bytes) {
        // Unlisted TLDs are reported with an implicit "*" rule; those don't count.
        Some(suffix) => suffix.is_known() && suffix.as_bytes() == domain_bytes,
        None => false,
    }
}

/// Check if the domain ends in a suffix that is on the list.
pub fn has_listed_suffix(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    List.suffix(domain_lower.as_bytes())
        .is_some_and(|suffix| suffix.is_known())
}

/// Get the registrable domain (eTLD+1) for a domain.
/// For "sub.example.com", returns "example.com".
/// For "example.com", returns "example.com".
/// For "com" (public suffix), returns None.
pub fn registrable_domain(domain: &str) -> Option<String> {
    let domain_lower = domain.to_lowercase();
    List.domain(domain_lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// RFC 6265 section 5.1.3 domain matching.
///
/// `cookie_domain` matches `host` when they are identical, or when the
/// labels of `cookie_domain` are the rightmost labels of `host` and `host`
/// is a host name rather than an IP literal. Both sides are compared
/// case-insensitively; a `cookie_domain` ending in "." never suffix-matches.
pub fn match_domain(cookie_domain: &str, host: &str) -> bool {
    let cookie_domain = cookie_domain.to_lowercase();
    let host = host.to_lowercase();

    if cookie_domain == host {
        return true;
    }

    if cookie_domain.ends_with('.') || is_ip_literal(&host) {
        return false;
    }

    // www.example.com -> ["com", "example", "www"]
    let mut host_labels = host.rsplit('.');
    cookie_domain
        .rsplit('.')
        .all(|label| host_labels.next() == Some(label))
}

/// Bracketed IPv6 or dotted IPv4 (anything whose last label is all digits).
fn is_ip_literal(host: &str) -> bool {
    if host.starts_with('[') {
        return true;
    }

    match host.rsplit_once('.') {
        Some((_, last)) => !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Same eTLD+1 means same party.
///
/// When `domain` ends in a listed public suffix, the registrable domains are
/// compared. Otherwise (intranet names, "localhost") only the last labels
/// are compared.
pub fn is_first_party(domain: &str, first_party_domain: &str) -> bool {
    if has_listed_suffix(domain) {
        return registrable_domain(domain) == registrable_domain(first_party_domain);
    }

    let last_label = |d: &str| d.rsplit('.').next().map(str::to_lowercase);
    last_label(domain) == last_label(first_party_domain)
}

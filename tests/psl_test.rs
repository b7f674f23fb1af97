//! Domain rule integration tests: public suffixes, domain matching, first-party checks.

use cookiescan::cookies::psl::{
    is_first_party, is_public_suffix, match_domain, registrable_domain,
};

#[test]
fn test_tld_is_public_suffix() {
    assert!(is_public_suffix("com"));
    assert!(is_public_suffix("org"));
    assert!(is_public_suffix("co.uk"));
    assert!(is_public_suffix("pvt.k12.ma.us"));
}

#[test]
fn test_domain_not_public_suffix() {
    assert!(!is_public_suffix("example.com"));
    assert!(!is_public_suffix("localhost"));
    assert!(!is_public_suffix("bbc.co.uk"));
    assert!(!is_public_suffix(""));
}

#[test]
fn test_registrable_domain_extraction() {
    assert_eq!(
        registrable_domain("www.example.com"),
        Some("example.com".to_string())
    );
    assert_eq!(
        registrable_domain("www.bbc.co.uk"),
        Some("bbc.co.uk".to_string())
    );
    assert_eq!(registrable_domain("com"), None);
}

#[test]
fn test_match_domain_is_reflexive() {
    let domains = [
        "com",
        "example.com",
        "www.example.com",
        "bbc.co.uk",
        "localhost",
        "127.0.0.1",
        "[::1]",
        "pvt.k12.ma.us",
    ];
    for domain in domains {
        assert!(match_domain(domain, domain), "{} should match itself", domain);
    }
}

#[test]
fn test_match_domain_suffix() {
    assert!(match_domain("example.com", "www.example.com"));
    assert!(match_domain("example.com", "a.b.example.com"));
    assert!(match_domain("EXAMPLE.com", "www.Example.COM"));
    assert!(!match_domain("www.example.com", "example.com"));
    assert!(!match_domain("ample.com", "example.com"));
    assert!(!match_domain("other.com", "example.com"));
}

#[test]
fn test_match_domain_ip_literals() {
    let cases = [
        ("0.0.1", "10.0.0.1"),
        ("1", "192.168.0.1"),
        ("168.0.1", "192.168.0.1"),
        ("1]", "[::1]"),
        ("example.com", "[2001:db8::1]"),
    ];
    for (cookie_domain, host) in cases {
        assert!(
            !match_domain(cookie_domain, host),
            "{} must not match IP literal {}",
            cookie_domain,
            host
        );
    }
}

#[test]
fn test_first_party() {
    assert!(is_first_party("cdn.example.com", "example.com"));
    assert!(is_first_party("www.bbc.co.uk", "bbc.co.uk"));
    assert!(!is_first_party("tracker.net", "example.com"));
    assert!(!is_first_party("example.co.uk", "bbc.co.uk"));
}

#[test]
fn test_first_party_unlisted_suffix() {
    assert!(is_first_party("intranet.corp", "wiki.corp"));
    assert!(!is_first_party("intranet.corp", "example.com"));
}

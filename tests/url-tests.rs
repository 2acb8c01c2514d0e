#![cfg(feature = "url")]

use indexmap::indexmap;
use scour::matcher::Matcher;
use scour::policy::{AttrRule, Limits, Policy, TagRule};
use scour::recover::AttributeStrategy;
use scour::sanitize;
use scour::url::{build_allowed_url_regex, classify_host, HostKind};

#[test]
fn classifies_the_three_host_kinds() {
    assert_eq!(classify_host("example.com"), Some(HostKind::Domain));
    assert_eq!(classify_host("10.0.0.1"), Some(HostKind::Ipv4));
    assert_eq!(classify_host("2001:db8::1"), Some(HostKind::Ipv6));
    assert_eq!(classify_host("[2001:db8::1]"), Some(HostKind::Ipv6));
    assert_eq!(classify_host("no spaces allowed"), None);
}

#[test]
fn generated_pattern_drives_an_href_rule() {
    let allowed = build_allowed_url_regex(&["https"], &["example.com"], true).unwrap();

    let mut policy = Policy::default();
    policy.tags.insert(
        "a".to_string(),
        TagRule {
            attributes: indexmap! {
                "href".to_string() => AttrRule::Simple {
                    value: Matcher::Pattern(allowed),
                    default_value: None,
                    max_length: None,
                    required: false,
                },
            },
            limits: Limits::default(),
        },
    );
    policy.error_handling.attribute = Some(AttributeStrategy::DiscardAttribute);

    assert_eq!(
        sanitize("<a href='https://example.com/page'>ok</a>", &policy).unwrap(),
        "<a href=\"https://example.com/page\">ok</a>"
    );
    assert_eq!(
        sanitize("<a href='/local/page'>ok</a>", &policy).unwrap(),
        "<a href=\"/local/page\">ok</a>"
    );
    assert_eq!(
        sanitize("<a href='javascript:alert(1)'>bad</a>", &policy).unwrap(),
        "<a>bad</a>"
    );
    assert_eq!(
        sanitize("<a href='https://evil.example'>bad</a>", &policy).unwrap(),
        "<a>bad</a>"
    );
}

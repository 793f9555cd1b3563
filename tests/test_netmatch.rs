use clawscan::netmatch::{extract_ipv4_literals, in_cidr, is_ipv4, matches_blocklist_entry};

#[test]
fn valid_ipv4_literals_are_accepted() {
    assert!(is_ipv4("185.220.101.42"));
    assert!(is_ipv4("0.0.0.0"));
    assert!(is_ipv4("255.255.255.255"));
}

#[test]
fn trailing_junk_is_rejected() {
    // §8 boundary case: trailing non-digit junk must not be treated as IPv4.
    assert!(!is_ipv4("185.220.101.42x"));
    assert!(!is_ipv4("185.220.101.420"));
    assert!(!is_ipv4("256.1.1.1"));
    assert!(!is_ipv4("1.2.3"));
    assert!(!is_ipv4("1.2.3.4.5"));
    assert!(!is_ipv4("-1.2.3.4"));
}

#[test]
fn cidr_containment_respects_prefix() {
    assert!(in_cidr("185.220.101.42", "185.220.101.0/24"));
    assert!(!in_cidr("185.220.102.42", "185.220.101.0/24"));
    assert!(in_cidr("1.2.3.4", "0.0.0.0/0"));
}

#[test]
fn literal_base_address_does_not_fuzzy_match_neighbor() {
    // §8 boundary case: 185.220.101.4 must not match CIDR 185.220.101.0/24
    // via substring confusion with a different host (it legitimately *is*
    // inside that /24, so this checks the distinct base-address case).
    assert!(!matches_blocklist_entry("185.220.101.42", "185.220.101.4"));
    assert!(matches_blocklist_entry("185.220.101.4", "185.220.101.4"));
}

#[test]
fn blocklist_entry_without_slash_is_exact_match() {
    assert!(matches_blocklist_entry("10.0.0.1", "10.0.0.1"));
    assert!(!matches_blocklist_entry("10.0.0.2", "10.0.0.1"));
}

#[test]
fn extract_ipv4_literals_filters_invalid_octets() {
    let found = extract_ipv4_literals("connect to 999.1.1.1 then 10.0.0.5 please");
    assert_eq!(found, vec!["10.0.0.5".to_string()]);
}

#[test]
fn extract_ipv4_literals_finds_multiple_on_one_line() {
    let found = extract_ipv4_literals("185.220.101.42 and 23.129.64.10 both bad");
    assert_eq!(found, vec!["185.220.101.42".to_string(), "23.129.64.10".to_string()]);
}

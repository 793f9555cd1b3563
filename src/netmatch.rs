//! IP/CIDR Matcher.
//!
//! Pure functions deciding whether an IPv4 literal lies in a CIDR range or
//! equals a literal IP. Used by the Network Analyzer to check extracted
//! dotted-quad literals against the blocklist — never via substring
//! matching, which would yield false positives like `185.220.101.42`
//! matching a blocklist entry for `185.220.101.4` (§4.3, §8 boundary cases).

use std::sync::LazyLock;

/// Matches a run of four dot-separated groups of 1-3 digits. Still needs
/// [`is_ipv4`] validation — this regex alone accepts out-of-range octets
/// and doesn't reject trailing non-digit junk outside the `\b` boundary.
pub static RE_IPV4_LITERAL: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

/// Returns `true` when `s` is exactly four dot-separated decimal octets,
/// each in `[0, 255]`, with no leading `+`/`-` sign and no extra characters.
/// `"185.220.101.42x"` is rejected — the caller must pass an already
/// word-boundary-delimited candidate (see [`RE_IPV4_LITERAL`]).
pub fn is_ipv4(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|p| {
        !p.is_empty()
            && p.len() <= 3
            && p.chars().all(|c| c.is_ascii_digit())
            && p.parse::<u32>().map(|n| n <= 255).unwrap_or(false)
    })
}

/// Packs a validated IPv4 literal into a 32-bit unsigned integer as
/// `(a<<24 | b<<16 | c<<8 | d)`. Returns `None` if `ip` is not a valid
/// IPv4 literal per [`is_ipv4`].
fn to_u32(ip: &str) -> Option<u32> {
    if !is_ipv4(ip) {
        return None;
    }
    let octets: Vec<u32> = ip.split('.').map(|p| p.parse().unwrap()).collect();
    Some((octets[0] << 24) | (octets[1] << 16) | (octets[2] << 8) | octets[3])
}

/// Returns `true` when `ip` lies within `cidr` (`"base/prefix"`, prefix in
/// `[0, 32]`). Prefix `0` matches all IPv4. Invalid inputs (malformed CIDR,
/// invalid IP, out-of-range prefix) return `false` rather than raising.
pub fn in_cidr(ip: &str, cidr: &str) -> bool {
    let Some((base, prefix_str)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix_str.parse::<u32>() else {
        return false;
    };
    if prefix > 32 {
        return false;
    }
    let Some(ip_bits) = to_u32(ip) else {
        return false;
    };
    let Some(base_bits) = to_u32(base) else {
        return false;
    };
    let mask: u32 = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    };
    (ip_bits & mask) == (base_bits & mask)
}

/// Returns `true` when `ip` matches a blocklist `entry`: exact string
/// equality when `entry` has no `/`, CIDR containment otherwise.
pub fn matches_blocklist_entry(ip: &str, entry: &str) -> bool {
    if entry.contains('/') {
        in_cidr(ip, entry)
    } else {
        to_u32(ip).zip(to_u32(entry)).is_some_and(|(a, b)| a == b)
    }
}

/// Extracts every valid IPv4 literal from `line` via [`RE_IPV4_LITERAL`],
/// discarding matches that fail [`is_ipv4`] (shouldn't normally happen
/// given the regex, but guards malformed octets like `999.1.1.1`).
pub fn extract_ipv4_literals(line: &str) -> Vec<String> {
    RE_IPV4_LITERAL
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .filter(|s| is_ipv4(s))
        .collect()
}

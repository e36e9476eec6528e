//! Lenient version parsing on top of `semver`.
//!
//! Python packages rarely ship strict semver: `0.7`, `2.1.0rc1`,
//! `1.9.dev0`, `3.14159265-2.6`. Missing components default to zero and
//! whatever follows the numeric part becomes a pre-release tag.

use semver::{BuildMetadata, Prerelease, Version};

/// Parse a version string, or `None` if it has no leading number.
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let s = raw.trim();
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);

    let mut numbers = [0u64; 3];
    let mut rest = s;
    for (i, slot) in numbers.iter_mut().enumerate() {
        if i > 0 {
            match rest.strip_prefix('.') {
                Some(r) if r.starts_with(|c: char| c.is_ascii_digit()) => rest = r,
                _ => break,
            }
        }
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        *slot = rest[..end].parse().ok()?;
        rest = &rest[end..];
    }

    Some(Version {
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        pre: prerelease(rest),
        build: BuildMetadata::EMPTY,
    })
}

/// Turn a leftover suffix into a pre-release tag.
///
/// Extra numeric components (`1.2.3.4`) and local labels (`+cu118`)
/// still count as releases.
fn prerelease(rest: &str) -> Prerelease {
    let rest = rest.split('+').next().unwrap_or_default();
    let extra_numbers = rest.starts_with('.')
        && rest[1..].chars().all(|c| c.is_ascii_digit() || c == '.');
    if rest.is_empty() || extra_numbers {
        return Prerelease::EMPTY;
    }

    let cleaned: String = rest
        .trim_start_matches(['-', '.', '_'])
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect();
    let ident = cleaned
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            // numeric identifiers may not have leading zeros
            if part.chars().all(|c| c.is_ascii_digit()) {
                part.trim_start_matches('0').parse::<u64>().unwrap_or(0).to_string()
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".");

    if ident.is_empty() {
        return Prerelease::EMPTY;
    }
    Prerelease::new(&ident).unwrap_or_else(|_| Prerelease::new("pre").unwrap_or(Prerelease::EMPTY))
}

//! Version tag parsing, filtering and ordering

use crate::error::{Result, ScaffoldError};
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Raw version string published by the registry,
/// e.g. `1.2.3-beta.1.19.50-stable`
pub type VersionTag = String;

/// Marker identifying tags on the stable channel
pub const STABLE_MARKER: &str = "-stable";

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+\.\d+)-beta\.(.+)-stable$").expect("tag pattern is valid")
});

/// A version tag split into its npm and platform parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// `<major>.<minor>.<patch>` of the npm package
    pub npm_version: String,
    /// Platform release the package was built against
    pub platform_version: String,
}

/// Split a tag of the form `<major>.<minor>.<patch>-beta.<platform>-stable`
pub fn parse_version_tag(tag: &str) -> Result<ParsedVersion> {
    let captures = TAG_PATTERN
        .captures(tag)
        .ok_or_else(|| ScaffoldError::Format {
            tag: tag.to_string(),
        })?;

    Ok(ParsedVersion {
        npm_version: captures[1].to_string(),
        platform_version: captures[2].to_string(),
    })
}

/// Keep only tags on the stable channel, preserving order
pub fn filter_stable<I>(tags: I) -> impl Iterator<Item = VersionTag>
where
    I: IntoIterator<Item = VersionTag>,
{
    tags.into_iter().filter(|tag| tag.ends_with(STABLE_MARKER))
}

/// Compare two strings treating runs of ASCII digits as numbers,
/// so `2.10.0` orders after `2.9.0`.
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    let mut left = Segments::new(a);
    let mut right = Segments::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l, r) {
                    (Segment::Number(l), Segment::Number(r)) => compare_digits(l, r),
                    (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
                    (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
                    (Segment::Text(l), Segment::Text(r)) => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Numeric comparison of two digit runs of arbitrary length
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort tags newest first under [`compare_numeric`]
pub fn sort_descending(tags: &mut [VersionTag]) {
    tags.sort_by(|a, b| compare_numeric(b, a));
}

/// Parse a platform version such as `1.20.30` into the engine version triple
pub fn platform_triple(platform_version: &str) -> Result<[u64; 3]> {
    let version = Version::parse(platform_version).map_err(|_| ScaffoldError::Format {
        tag: platform_version.to_string(),
    })?;
    Ok([version.major, version.minor, version.patch])
}

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Number(&'a str),
    Text(&'a str),
}

/// Splits a string into alternating digit / non-digit runs
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let numeric = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if numeric {
            Segment::Number(run)
        } else {
            Segment::Text(run)
        })
    }
}

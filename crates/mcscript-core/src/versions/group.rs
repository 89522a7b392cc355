//! Grouping of module version tags by shared platform version

use super::tag::{filter_stable, parse_version_tag, VersionTag};
use crate::error::Result;
use std::collections::BTreeMap;

/// Module tags for one platform version
pub type ModuleVersions = BTreeMap<String, VersionTag>;

/// Platform version → (module → tag), in first-insertion order.
///
/// Keys appear in the order they were first seen while walking the modules
/// in resolution order. Because every module's tags arrive newest first, the
/// first key is the newest platform version *of the first module*; it is not
/// a maximum taken across modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionGroup {
    entries: Vec<(String, ModuleVersions)>,
}

impl VersionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tag` for `module` under `platform_version`.
    ///
    /// A later tag for the same module replaces an earlier one, so with
    /// descending input the oldest release for the platform version is kept.
    fn insert(&mut self, platform_version: &str, module: &str, tag: VersionTag) {
        let modules = match self
            .entries
            .iter()
            .position(|(key, _)| key == platform_version)
        {
            Some(idx) => &mut self.entries[idx].1,
            None => {
                self.entries
                    .push((platform_version.to_string(), ModuleVersions::new()));
                let last = self.entries.len() - 1;
                &mut self.entries[last].1
            }
        };
        modules.insert(module.to_string(), tag);
    }

    /// Platform versions, first-inserted first
    pub fn platform_versions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The platform version offered as the latest one
    pub fn latest(&self) -> Option<&str> {
        self.platform_versions().next()
    }

    /// Module tags recorded for a platform version
    pub fn get(&self, platform_version: &str) -> Option<&ModuleVersions> {
        self.entries
            .iter()
            .find(|(key, _)| key == platform_version)
            .map(|(_, modules)| modules)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group every module's stable tags by the platform version they target.
///
/// Modules are processed in slice order and each module's tags in sequence
/// order. The first malformed stable tag aborts grouping.
pub fn group_versions<S, T>(modules: &[(S, T)]) -> Result<VersionGroup>
where
    S: AsRef<str>,
    T: AsRef<[VersionTag]>,
{
    let mut group = VersionGroup::new();

    for (module, tags) in modules {
        for tag in filter_stable(tags.as_ref().iter().cloned()) {
            let parsed = parse_version_tag(&tag)?;
            group.insert(&parsed.platform_version, module.as_ref(), tag);
        }
    }

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use crate::versions::tag::parse_version_tag;

    fn tags(list: &[&str]) -> Vec<VersionTag> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<(String, Vec<VersionTag>)> {
        vec![
            (
                "@minecraft/server".to_string(),
                tags(&[
                    "1.8.0-beta.1.20.30-stable",
                    "1.7.0-beta.1.20.20-stable",
                    "1.7.0-beta.1.20.30-preview.21",
                ]),
            ),
            (
                "@minecraft/server-ui".to_string(),
                tags(&[
                    "1.2.0-beta.1.20.40-stable",
                    "1.1.0-beta.1.20.30-stable",
                    "1.0.0-beta.1.20.20-stable",
                ]),
            ),
        ]
    }

    #[test]
    fn test_entries_sit_under_their_own_platform_version() {
        let group = group_versions(&sample()).unwrap();

        for key in group.platform_versions() {
            for tag in group.get(key).unwrap().values() {
                assert_eq!(parse_version_tag(tag).unwrap().platform_version, key);
            }
        }
    }

    #[test]
    fn test_shared_platform_version_holds_both_modules() {
        let group = group_versions(&sample()).unwrap();
        let shared = group.get("1.20.30").unwrap();

        assert_eq!(shared.len(), 2);
        assert_eq!(shared["@minecraft/server"], "1.8.0-beta.1.20.30-stable");
        assert_eq!(shared["@minecraft/server-ui"], "1.1.0-beta.1.20.30-stable");
    }

    #[test]
    fn test_key_order_follows_first_module() {
        let group = group_versions(&sample()).unwrap();
        let keys: Vec<_> = group.platform_versions().collect();

        // 1.20.40 only exists for the second module, so it is appended
        // after the first module's keys even though it is newer.
        assert_eq!(keys, vec!["1.20.30", "1.20.20", "1.20.40"]);
        assert_eq!(group.latest(), Some("1.20.30"));
        assert_eq!(group.get("1.20.40").unwrap().len(), 1);
    }

    #[test]
    fn test_last_tag_per_module_wins() {
        let modules = vec![(
            "@minecraft/server",
            tags(&["1.9.0-beta.1.20.30-stable", "1.8.0-beta.1.20.30-stable"]),
        )];
        let group = group_versions(&modules).unwrap();

        // Tags arrive newest first; the oldest release for the key is kept
        assert_eq!(
            group.get("1.20.30").unwrap()["@minecraft/server"],
            "1.8.0-beta.1.20.30-stable"
        );
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let input = sample();
        assert_eq!(group_versions(&input).unwrap(), group_versions(&input).unwrap());
    }

    #[test]
    fn test_malformed_stable_tag_aborts() {
        let modules = vec![("@minecraft/server", tags(&["garbage-stable"]))];
        let err = group_versions(&modules).unwrap_err();
        assert!(matches!(err, ScaffoldError::Format { tag } if tag == "garbage-stable"));
    }

    #[test]
    fn test_no_stable_tags_yields_empty_group() {
        let modules = vec![("@minecraft/server", tags(&["1.0.0", "1.1.0-rc.1"]))];
        let group = group_versions(&modules).unwrap();
        assert!(group.is_empty());
        assert_eq!(group.latest(), None);
    }
}

//! Scope merging: global → workdirs → profile → command line.
//!
//! Later scopes win on scalar fields; list fields always concatenate.
//! When several workdir scopes match the current directory they are
//! merged most specific first (more path components first, ties broken
//! by workdir name), so the least specific matching scope merges last.

use std::path::Path;

use super::error::ConfigError;
use super::fragment::{ConfigFragment, EffectiveConfig};
use super::loader::ConfigDocument;
use crate::constants::DEFAULT_PROFILE;

/// Merge every applicable scope into one [`EffectiveConfig`].
///
/// `document` is `None` when no config file exists; it then behaves as an
/// empty document. An unknown profile is only tolerated when it is the
/// built-in default profile.
pub fn merge_scopes(
    document: Option<&ConfigDocument>,
    profile: &str,
    cwd: &Path,
    cli: &ConfigFragment,
) -> Result<EffectiveConfig, ConfigError> {
    let empty = ConfigDocument::default();
    let document = document.unwrap_or(&empty);

    let profile_fragment = match document.profiles.get(profile) {
        Some(fragment) => Some(fragment),
        None if profile == DEFAULT_PROFILE => {
            tracing::debug!("profile is default, but no default profile in config");
            None
        }
        None => return Err(ConfigError::ProfileNotFound(profile.to_string())),
    };

    let mut merged = document.global.clone();
    for (name, workdir) in matching_workdirs(document, cwd) {
        tracing::debug!(workdir = name, cwd = %cwd.display(), "applying workdir scope");
        merged = merged.merge(workdir);
    }
    if let Some(fragment) = profile_fragment {
        tracing::debug!(profile, "applying profile scope");
        merged = merged.merge(fragment);
    }
    merged = merged.merge(cli);

    merged.finalize()
}

/// Workdir scopes whose `dirpath` is a path prefix of `cwd`, in merge order.
pub fn matching_workdirs<'a>(
    document: &'a ConfigDocument,
    cwd: &Path,
) -> Vec<(&'a str, &'a ConfigFragment)> {
    let mut matches: Vec<(&str, &ConfigFragment, usize)> = document
        .workdirs
        .iter()
        .filter_map(|(name, fragment)| {
            let dir = Path::new(fragment.dir_path.as_deref()?);
            cwd.starts_with(dir)
                .then(|| (name.as_str(), fragment, dir.components().count()))
        })
        .collect();

    matches.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
    matches
        .into_iter()
        .map(|(name, fragment, _)| (name, fragment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileSpec, OverwritePolicy};
    use pretty_assertions::assert_eq;

    fn doc(content: &str) -> ConfigDocument {
        ConfigDocument::parse(content, Path::new("test.toml")).unwrap()
    }

    fn env_paths(config: &EffectiveConfig) -> Vec<String> {
        config
            .env_files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect()
    }

    const PROFILES: &str = r#"
[global]
envfile = ["a.env"]

[profile.default]
envfile = ["b.env"]

[profile.temp]
envfile = ["c.env"]
"#;

    #[test]
    fn selected_profile_replaces_default_profile() {
        let document = doc(PROFILES);
        let config = merge_scopes(
            Some(&document),
            "temp",
            Path::new("/"),
            &ConfigFragment::default(),
        )
        .unwrap();
        assert_eq!(env_paths(&config), vec!["a.env", "c.env"]);
    }

    #[test]
    fn default_profile_applies_when_present() {
        let document = doc(PROFILES);
        let config = merge_scopes(
            Some(&document),
            DEFAULT_PROFILE,
            Path::new("/"),
            &ConfigFragment::default(),
        )
        .unwrap();
        assert_eq!(env_paths(&config), vec!["a.env", "b.env"]);
    }

    #[test]
    fn missing_default_profile_uses_global_only() {
        let document = doc("[global]\nenvfile = [\"a.env\"]\n");
        let config = merge_scopes(
            Some(&document),
            DEFAULT_PROFILE,
            Path::new("/"),
            &ConfigFragment::default(),
        )
        .unwrap();
        assert_eq!(env_paths(&config), vec!["a.env"]);
    }

    #[test]
    fn unknown_profile_is_error() {
        let document = doc(PROFILES);
        let err = merge_scopes(
            Some(&document),
            "nope",
            Path::new("/"),
            &ConfigFragment::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(ref p) if p == "nope"));
    }

    #[test]
    fn unknown_profile_without_document_is_error() {
        let err = merge_scopes(None, "nope", Path::new("/"), &ConfigFragment::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(_)));
    }

    #[test]
    fn no_document_uses_cli_fragment_only() {
        let cli = ConfigFragment {
            defines: vec!["A=1".into()],
            ..Default::default()
        };
        let config = merge_scopes(None, DEFAULT_PROFILE, Path::new("/"), &cli).unwrap();
        assert_eq!(config.defines, vec!["A=1"]);
        assert_eq!(config.overwrite, OverwritePolicy::Deny);
    }

    #[test]
    fn workdir_matches_on_path_components() {
        let document = doc(
            r#"
[workdir.src]
dirpath = "/proj/src"
define = ["IN_SRC=1"]
"#,
        );

        for cwd in ["/proj/src", "/proj/src/sub", "/proj/src/"] {
            assert_eq!(matching_workdirs(&document, Path::new(cwd)).len(), 1, "{cwd}");
        }
        for cwd in ["/proj/srcOther", "/proj", "/other/proj/src"] {
            assert!(matching_workdirs(&document, Path::new(cwd)).is_empty(), "{cwd}");
        }
    }

    #[test]
    fn workdirs_merge_most_specific_first() {
        let document = doc(
            r#"
[workdir.outer]
dirpath = "/proj"
define = ["OUTER=1"]
overwrite = "warn"

[workdir.inner]
dirpath = "/proj/src"
define = ["INNER=1"]
overwrite = "allow"
"#,
        );

        let names: Vec<_> = matching_workdirs(&document, Path::new("/proj/src/lib"))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["inner", "outer"]);

        let config = merge_scopes(
            Some(&document),
            DEFAULT_PROFILE,
            Path::new("/proj/src/lib"),
            &ConfigFragment::default(),
        )
        .unwrap();
        assert_eq!(config.defines, vec!["INNER=1", "OUTER=1"]);
        assert_eq!(config.overwrite, OverwritePolicy::Warn);
    }

    #[test]
    fn equally_specific_workdirs_merge_by_name() {
        let document = doc(
            r#"
[workdir.zeta]
dirpath = "/proj"
define = ["Z=1"]

[workdir.alpha]
dirpath = "/proj/"
define = ["A=1"]
"#,
        );
        let names: Vec<_> = matching_workdirs(&document, Path::new("/proj"))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn precedence_global_workdir_profile_cli() {
        let document = doc(
            r#"
[global]
overwrite = "warn"
keychainServicePrefix = "global."
envfile = ["global.env"]

[workdir.proj]
dirpath = "/proj"
overwrite = "allow"
envfile = ["workdir.env"]

[profile.ci]
keychainServicePrefix = "ci."
envfile = ["profile.env"]
"#,
        );
        let cli = ConfigFragment {
            env_files: vec![FileSpec::required("cli.env")],
            overwrite: Some("deny".into()),
            ..Default::default()
        };

        let config = merge_scopes(Some(&document), "ci", Path::new("/proj/app"), &cli).unwrap();
        assert_eq!(
            env_paths(&config),
            vec!["global.env", "workdir.env", "profile.env", "cli.env"]
        );
        assert_eq!(config.overwrite, OverwritePolicy::Deny);
        assert_eq!(config.keychain_service_prefix, "ci.");
    }

    #[test]
    fn invalid_policy_from_config_is_rejected() {
        let document = doc("[global]\noverwrite = \"sometimes\"\n");
        let err = merge_scopes(
            Some(&document),
            DEFAULT_PROFILE,
            Path::new("/"),
            &ConfigFragment::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverwritePolicy(_)));
    }
}

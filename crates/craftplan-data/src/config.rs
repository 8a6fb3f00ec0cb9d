//! Planner configuration (`planner.{ron,toml,json}`).

use crate::driver::DatapackLayout;
use crate::loader::{DataLoadError, deserialize_file, find_data_file};
use crate::schema::PlannerConfigData;
use craftplan_core::id::GameVersion;
use craftplan_core::registry::RegistrySet;
use craftplan_tree::TreeLimits;
use std::path::{Path, PathBuf};

/// Resolved planner settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerConfig {
    pub default_version: Option<GameVersion>,
    pub recipe_dir: Option<PathBuf>,
    pub limits: TreeLimits,
}

impl From<PlannerConfigData> for PlannerConfig {
    fn from(data: PlannerConfigData) -> Self {
        Self {
            default_version: data.default_version,
            recipe_dir: data.recipe_dir,
            limits: data.limits,
        }
    }
}

impl PlannerConfig {
    /// Recipe path resolver honoring `recipe_dir`.
    pub fn layout(&self) -> DatapackLayout {
        DatapackLayout {
            override_dir: self.recipe_dir.clone(),
        }
    }

    /// The configured version if it is loaded, else the newest loaded one.
    pub fn active_version(&self, registries: &RegistrySet) -> Option<GameVersion> {
        if let Some(version) = &self.default_version {
            if registries.get(version).is_some() {
                return Some(version.clone());
            }
            tracing::warn!(version = %version, "configured version not loaded, using latest");
        }
        registries.latest().map(|(version, _)| version.clone())
    }
}

/// Load `planner.*` from `dir`. A missing file yields the defaults.
pub fn load_config(dir: &Path) -> Result<PlannerConfig, DataLoadError> {
    match find_data_file(dir, "planner")? {
        Some(path) => {
            let data: PlannerConfigData = deserialize_file(&path)?;
            Ok(data.into())
        }
        None => Ok(PlannerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::registry::RegistryBuilder;
    use std::fs;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "craftplan_config_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn absent_file_gives_defaults() {
        let dir = make_test_dir("absent");
        let config = load_config(&dir).unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.limits.max_depth, 4);
        assert_eq!(config.limits.max_branches, 5);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn toml_config() {
        let dir = make_test_dir("toml");
        fs::write(
            dir.join("planner.toml"),
            r#"
default_version = "1.21.4"
recipe_dir = "recipes_override"

[limits]
max_branches = 8
"#,
        )
        .unwrap();
        let config = load_config(&dir).unwrap();
        assert_eq!(config.default_version, Some(GameVersion::new("1.21.4")));
        assert_eq!(config.limits.max_branches, 8);
        assert_eq!(config.limits.max_depth, 4);
        assert_eq!(
            config.layout().override_dir,
            Some(PathBuf::from("recipes_override"))
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_config_is_a_parse_error() {
        let dir = make_test_dir("bad");
        fs::write(dir.join("planner.json"), r#"{"limits": {"max_depth": "deep"}}"#).unwrap();
        assert!(matches!(
            load_config(&dir),
            Err(DataLoadError::Parse { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn active_version_falls_back_to_latest() {
        let mut set = RegistrySet::new();
        for v in ["1.20.4", "1.21.4"] {
            set.insert(GameVersion::new(v), RegistryBuilder::new().build().unwrap());
        }

        let config = PlannerConfig::default();
        assert_eq!(config.active_version(&set), Some(GameVersion::new("1.21.4")));

        let pinned = PlannerConfig {
            default_version: Some(GameVersion::new("1.20.4")),
            ..PlannerConfig::default()
        };
        assert_eq!(pinned.active_version(&set), Some(GameVersion::new("1.20.4")));

        let stale = PlannerConfig {
            default_version: Some(GameVersion::new("1.8")),
            ..PlannerConfig::default()
        };
        assert_eq!(stale.active_version(&set), Some(GameVersion::new("1.21.4")));
        assert_eq!(stale.active_version(&RegistrySet::new()), None);
    }
}

//! Preconfiguration discovery and loading.
//!
//! A base configuration is named either by a catalog entry (`blank`,
//! `default`, a packaged preconfig, or a `pipeline_config_<name>.yml` file in
//! a search directory) or by a literal path to a YAML file.

use crate::config::merger::merge_into;
use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable listing extra preconfiguration directories.
pub const PRECONFIG_DIR_ENV: &str = "PIPECONF_PRECONFIG_DIR";

/// Name of the blank template every configuration ultimately derives from.
pub const BLANK: &str = "blank";

/// Name of the packaged default pipeline.
pub const DEFAULT: &str = "default";

const PACKAGED: [(&str, &str); 4] = [
    (
        BLANK,
        include_str!("../../resources/configs/pipeline_config_blank.yml"),
    ),
    (
        DEFAULT,
        include_str!("../../resources/configs/pipeline_config_default.yml"),
    ),
    (
        "anat-only",
        include_str!("../../resources/configs/pipeline_config_anat-only.yml"),
    ),
    (
        "preproc",
        include_str!("../../resources/configs/pipeline_config_preproc.yml"),
    ),
];

/// Where a catalog entry's YAML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconfigSource {
    /// Embedded in the library.
    Packaged {
        /// Catalog name.
        name: &'static str,
        /// YAML text.
        contents: &'static str,
    },
    /// A `pipeline_config_<name>.yml` file in a search directory.
    File(PathBuf),
}

impl PreconfigSource {
    /// Label used in log and error messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Packaged { name, .. } => format!("preconfig '{name}'"),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// The set of known base configurations.
///
/// Search directories are consulted before the packaged entries, so a
/// directory can shadow a packaged preconfiguration.
///
/// # Examples
///
/// ```
/// use pipeconf::config::PreconfigCatalog;
///
/// let catalog = PreconfigCatalog::new();
/// assert!(catalog.lookup("default").is_some());
/// assert!(catalog.lookup("default_pipeline").is_some());
/// assert!(catalog.lookup("nope").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreconfigCatalog {
    search_dirs: Vec<PathBuf>,
}

impl PreconfigCatalog {
    /// A catalog with only the packaged entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that also searches the directories listed in
    /// `PIPECONF_PRECONFIG_DIR` (platform path-list syntax).
    #[must_use]
    pub fn from_env() -> Self {
        let mut catalog = Self::new();
        if let Some(dirs) = env::var_os(PRECONFIG_DIR_ENV) {
            for dir in env::split_paths(&dirs) {
                catalog = catalog.with_search_dir(dir);
            }
        }
        catalog
    }

    /// Adds a directory searched for `pipeline_config_<name>.yml`.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(expand_home(&dir.into()));
        self
    }

    /// The configured search directories, in search order.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Maps aliases onto catalog names: `default` and `default_pipeline`,
    /// in any case, are `default`.
    #[must_use]
    pub fn canonical_name(name: &str) -> &str {
        if name.eq_ignore_ascii_case(DEFAULT) || name.eq_ignore_ascii_case("default_pipeline") {
            DEFAULT
        } else {
            name
        }
    }

    /// Finds a catalog entry by name without touching its contents.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<PreconfigSource> {
        let name = Self::canonical_name(name);

        for dir in &self.search_dirs {
            let candidate = dir.join(format!("pipeline_config_{name}.yml"));
            if candidate.is_file() {
                return Some(PreconfigSource::File(candidate));
            }
        }

        PACKAGED
            .iter()
            .find(|(packaged, _)| *packaged == name)
            .map(|&(name, contents)| PreconfigSource::Packaged { name, contents })
    }

    /// All catalog names, sorted and deduplicated.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = PACKAGED.iter().map(|(name, _)| (*name).to_string()).collect();

        for dir in &self.search_dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                log::debug!("skipping unreadable preconfig directory {}", dir.display());
                continue;
            };
            for entry in entries.flatten() {
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };
                if let Some(name) = file_name
                    .strip_prefix("pipeline_config_")
                    .and_then(|rest| rest.strip_suffix(".yml"))
                {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        names.dedup();
        names
    }

    /// Loads one catalog entry as written, without following `FROM`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be read or parsed.
    pub fn load(&self, source: &PreconfigSource) -> Result<ConfigTree> {
        match source {
            PreconfigSource::Packaged { contents, .. } => parse_yaml(contents, &source.label()),
            PreconfigSource::File(path) => load_yaml_file(path),
        }
    }

    /// The blank template.
    ///
    /// # Errors
    ///
    /// Returns an error if a search directory shadows `blank` with an
    /// unreadable or malformed file.
    pub fn blank(&self) -> Result<ConfigTree> {
        match self.lookup(BLANK) {
            Some(source) => self.load(&source),
            None => Ok(ConfigTree::new()),
        }
    }

    /// Resolves a name or path to its tree as written.
    ///
    /// Catalog names win; anything else is treated as a file path
    /// (`~` is expanded).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreconfiguration`] if `name_or_path` is neither
    /// a catalog entry nor a readable, parseable file. Errors loading a
    /// catalog entry are returned as-is.
    pub fn resolve(&self, name_or_path: &str) -> Result<ConfigTree> {
        if let Some(source) = self.lookup(name_or_path) {
            log::debug!("resolved '{name_or_path}' to {}", source.label());
            return self.load(&source);
        }

        let path = expand_home(Path::new(name_or_path));
        if path.is_file() {
            match load_yaml_file(&path) {
                Ok(tree) => {
                    log::debug!("resolved '{name_or_path}' to {}", path.display());
                    return Ok(tree);
                }
                Err(e) => log::debug!("cannot load {}: {e}", path.display()),
            }
        }

        Err(Error::UnknownPreconfiguration {
            name: name_or_path.to_string(),
        })
    }

    /// Resolves a base configuration, following `FROM` keys.
    ///
    /// Each layer is merged over its own base; a layer without `FROM` is
    /// merged over the blank template. The returned tree has no `FROM` key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconfigurationCycle`] if a base names itself
    /// directly or indirectly, a schema error if `FROM` is not a string, and
    /// any error from [`resolve`](Self::resolve).
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::config::PreconfigCatalog;
    ///
    /// let catalog = PreconfigCatalog::new();
    /// let anat = catalog.resolve_base("anat-only").unwrap();
    /// assert!(!anat.contains_key("FROM"));
    /// // Keys only the default sets are inherited.
    /// assert!(anat.contains_key("registration_workflows"));
    /// ```
    pub fn resolve_base(&self, name_or_path: &str) -> Result<ConfigTree> {
        self.resolve_chain(name_or_path, &mut Vec::new())
    }

    fn resolve_chain(&self, name_or_path: &str, chain: &mut Vec<String>) -> Result<ConfigTree> {
        let id = self.identity(name_or_path);
        if chain.contains(&id) {
            chain.push(id);
            return Err(Error::PreconfigurationCycle {
                chain: std::mem::take(chain),
            });
        }
        chain.push(id);

        let mut layer = self.resolve(name_or_path)?;
        let mut tree = match layer.remove("FROM") {
            Some(ConfigValue::String(parent)) => {
                log::debug!("'{name_or_path}' derives from '{parent}'");
                self.resolve_chain(&parent, chain)?
            }
            Some(ConfigValue::Null) | None => self.blank()?,
            Some(other) => {
                return Err(Error::Schema {
                    field: "FROM".into(),
                    message: format!("expected a string, found {}", other.type_name()),
                });
            }
        };
        merge_into(&mut tree, &layer);

        chain.pop();
        Ok(tree)
    }

    /// A stable name for cycle detection.
    fn identity(&self, name_or_path: &str) -> String {
        if self.lookup(name_or_path).is_some() {
            return Self::canonical_name(name_or_path).to_string();
        }
        let path = expand_home(Path::new(name_or_path));
        fs::canonicalize(&path)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Parses YAML text into a configuration tree.
///
/// An empty document is an empty tree.
///
/// # Errors
///
/// Returns [`Error::Yaml`] on syntax errors and [`Error::Parse`] if the
/// document is not a mapping.
///
/// # Examples
///
/// ```
/// use pipeconf::config::parse_yaml;
///
/// let tree = parse_yaml("a:\n  b: 1\n", "inline").unwrap();
/// assert!(tree["a"].is_tree());
/// assert!(parse_yaml("- 1\n", "inline").is_err());
/// ```
pub fn parse_yaml(contents: &str, source_name: &str) -> Result<ConfigTree> {
    let raw: serde_yaml::Value = serde_yaml::from_str(contents)?;
    match ConfigValue::from_yaml(raw, source_name)? {
        ConfigValue::Tree(tree) => Ok(tree),
        ConfigValue::Null => Ok(ConfigTree::new()),
        other => Err(Error::Parse {
            source_name: source_name.to_string(),
            message: format!("expected a mapping at the top level, found {}", other.type_name()),
        }),
    }
}

/// Reads and parses a YAML configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_yaml_file(path: &Path) -> Result<ConfigTree> {
    let contents = fs::read_to_string(path)?;
    parse_yaml(&contents, &path.display().to_string())
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_packaged_entries_parse() {
        let catalog = PreconfigCatalog::new();
        for name in catalog.list() {
            let source = catalog.lookup(&name).unwrap();
            assert!(catalog.load(&source).is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn test_default_alias() {
        let catalog = PreconfigCatalog::new();
        assert_eq!(catalog.lookup("default_pipeline"), catalog.lookup("default"));
    }

    #[test]
    fn test_list_packaged() {
        let names = PreconfigCatalog::new().list();
        for expected in ["anat-only", "blank", "default", "preproc"] {
            assert!(names.iter().any(|n| n == expected));
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_yaml_file(Path::new("/nonexistent/path/config.yml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: syntax:").unwrap();

        assert!(load_yaml_file(&config_path).is_err());
    }

    #[test]
    fn test_empty_document_is_empty_tree() {
        assert!(parse_yaml("", "empty").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_unknown() {
        let err = PreconfigCatalog::new()
            .resolve("definitely-not-a-preconfig")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPreconfiguration { ref name } if name == "definitely-not-a-preconfig"));
    }

    #[test]
    fn test_resolve_unparseable_file_is_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yml");
        fs::write(&path, "- just\n- a list\n").unwrap();

        let err = PreconfigCatalog::new()
            .resolve(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownPreconfiguration { .. }));
    }

    #[test]
    fn test_resolve_literal_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mine.yml");
        fs::write(&path, "pipeline_setup:\n  pipeline_name: mine\n").unwrap();

        let tree = PreconfigCatalog::new()
            .resolve(path.to_str().unwrap())
            .unwrap();
        assert_eq!(
            tree["pipeline_setup"].as_tree().unwrap()["pipeline_name"],
            ConfigValue::from("mine")
        );
    }

    #[test]
    fn test_search_dir_shadows_packaged() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("pipeline_config_default.yml"),
            "marker: true\n",
        )
        .unwrap();

        let catalog = PreconfigCatalog::new().with_search_dir(temp_dir.path());
        let tree = catalog.resolve("default").unwrap();
        assert_eq!(tree["marker"], ConfigValue::Bool(true));
    }

    #[test]
    fn test_search_dir_entries_listed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pipeline_config_lab.yml"), "{}\n").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let catalog = PreconfigCatalog::new().with_search_dir(temp_dir.path());
        let names = catalog.list();
        assert!(names.iter().any(|n| n == "lab"));
        assert!(!names.iter().any(|n| n == "notes"));
    }

    #[test]
    fn test_resolve_base_without_from_sits_on_blank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.yml");
        fs::write(&path, "pipeline_setup:\n  pipeline_name: partial\n").unwrap();

        let tree = PreconfigCatalog::new()
            .resolve_base(path.to_str().unwrap())
            .unwrap();
        // Blank supplies every other section.
        assert!(tree.contains_key("nuisance_corrections"));
        assert_eq!(
            tree["pipeline_setup"].as_tree().unwrap()["pipeline_name"],
            ConfigValue::from("partial")
        );
    }

    #[test]
    fn test_resolve_base_follows_chain() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("pipeline_config_lab.yml"),
            "FROM: anat-only\nlab_only: 1\n",
        )
        .unwrap();

        let catalog = PreconfigCatalog::new().with_search_dir(temp_dir.path());
        let tree = catalog.resolve_base("lab").unwrap();

        assert_eq!(tree["lab_only"], ConfigValue::Integer(1));
        assert_eq!(
            tree["pipeline_setup"].as_tree().unwrap()["pipeline_name"],
            ConfigValue::from("cpac-anat-only")
        );
        assert!(!tree.contains_key("FROM"));
    }

    #[test]
    fn test_resolve_base_detects_cycle() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pipeline_config_a.yml"), "FROM: b\n").unwrap();
        fs::write(temp_dir.path().join("pipeline_config_b.yml"), "FROM: a\n").unwrap();

        let catalog = PreconfigCatalog::new().with_search_dir(temp_dir.path());
        let err = catalog.resolve_base("a").unwrap_err();
        match err {
            Error::PreconfigurationCycle { chain } => assert_eq!(chain, ["a", "b", "a"]),
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_base_rejects_non_string_from() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pipeline_config_odd.yml"), "FROM: 3\n").unwrap();

        let catalog = PreconfigCatalog::new().with_search_dir(temp_dir.path());
        assert!(catalog.resolve_base("odd").unwrap_err().is_schema());
    }
}

//! Random seed configuration and per-tool seed flags.
//!
//! The seed is an explicit value: a [`RandomStateConfig`] is read from a
//! configuration once, resolved to a concrete seed, and passed to whatever
//! needs it. [`seed_flags_for`] turns a seed into command-line flags for the
//! supported tools.
//!
//! # Examples
//!
//! ```
//! use pipeconf::random_state::{seed_flags_for, RandomSeed, RandomStateConfig, ToolKind};
//!
//! let state = RandomStateConfig::new(Some(RandomSeed::Fixed(100)));
//! let seed = state.resolve().unwrap();
//! assert_eq!(seed_flags_for(ToolKind::Fsl, Some(seed)), ["-seed 100"]);
//! ```

use std::fmt;

use rand::Rng;

use crate::config::path::{self, KeyPath};
use crate::config::value::{ConfigTree, ConfigValue};
use crate::error::{Error, Result};

/// Largest accepted seed (`i32::MAX`).
pub const MAX_SEED: u32 = 2_147_483_647;

/// Where the seed lives in a pipeline configuration.
pub const SEED_PATH: [&str; 3] = ["pipeline_setup", "system_config", "random_seed"];

/// A configured seed: a fixed number or a request for a random one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomSeed {
    /// A seed in `1..=MAX_SEED`.
    Fixed(u32),
    /// Draw a seed once at resolution time.
    Random,
}

impl RandomSeed {
    /// Parses a configured seed value.
    ///
    /// Accepts a positive integer up to [`MAX_SEED`], the string `"random"`,
    /// or null (no seed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeed`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::random_state::RandomSeed;
    /// use pipeconf::ConfigValue;
    ///
    /// assert_eq!(RandomSeed::from_value(&ConfigValue::from(7)).unwrap(), Some(RandomSeed::Fixed(7)));
    /// assert_eq!(RandomSeed::from_value(&ConfigValue::Null).unwrap(), None);
    /// assert!(RandomSeed::from_value(&ConfigValue::from(0)).is_err());
    /// ```
    pub fn from_value(value: &ConfigValue) -> Result<Option<Self>> {
        match value {
            ConfigValue::Null => Ok(None),
            ConfigValue::String(s) if s == "random" => Ok(Some(Self::Random)),
            ConfigValue::Integer(i) => u32::try_from(*i)
                .ok()
                .filter(|seed| (1..=MAX_SEED).contains(seed))
                .map(|seed| Some(Self::Fixed(seed)))
                .ok_or_else(|| Error::InvalidSeed {
                    value: i.to_string(),
                }),
            other => Err(Error::InvalidSeed {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RandomSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(seed) => write!(f, "{seed}"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// The random state for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomStateConfig {
    seed: Option<RandomSeed>,
}

impl RandomStateConfig {
    /// Creates a random state from an already parsed seed.
    #[must_use]
    pub const fn new(seed: Option<RandomSeed>) -> Self {
        Self { seed }
    }

    /// Reads the seed from `pipeline_setup.system_config.random_seed`.
    ///
    /// A tree without that key has no seed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeed`] if the value is not an accepted seed.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self> {
        let seed_path = KeyPath::new(SEED_PATH)?;
        match path::get(tree, &seed_path) {
            Ok(value) => Ok(Self::new(RandomSeed::from_value(value)?)),
            Err(Error::KeyNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// The configured seed, before resolution.
    #[must_use]
    pub const fn seed(&self) -> Option<RandomSeed> {
        self.seed
    }

    /// Resolves the configured seed to a concrete number.
    ///
    /// `Random` draws once from `1..=MAX_SEED`; the returned state holds
    /// the drawn seed so later calls agree.
    #[must_use]
    pub fn resolved(self) -> Self {
        match self.seed {
            Some(RandomSeed::Random) => {
                let drawn = random_seed();
                log::info!("random seed drawn: {drawn}");
                Self::new(Some(RandomSeed::Fixed(drawn)))
            }
            _ => self,
        }
    }

    /// The concrete seed after [`resolved`](Self::resolved), or `None` when
    /// no seed is configured.
    #[must_use]
    pub fn resolve(self) -> Option<u32> {
        match self.resolved().seed {
            Some(RandomSeed::Fixed(seed)) => Some(seed),
            _ => None,
        }
    }
}

/// Draws a seed uniformly from `1..=MAX_SEED`.
#[must_use]
pub fn random_seed() -> u32 {
    rand::rng().random_range(1..=MAX_SEED)
}

/// Tools whose randomness can be pinned with command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// ANTs `antsAI` affine initializer.
    AntsAffineInitializer,
    /// ANTs `antsRegistration`.
    AntsRegistration,
    /// FreeSurfer `recon-all`.
    ReconAll,
    /// FreeSurfer `mri_vol2vol`.
    ApplyVolTransform,
    /// FSL tools such as `fslmaths`.
    Fsl,
}

impl ToolKind {
    /// All tool kinds, in display order.
    pub const ALL: [Self; 5] = [
        Self::AntsAffineInitializer,
        Self::AntsRegistration,
        Self::ReconAll,
        Self::ApplyVolTransform,
        Self::Fsl,
    ];

    /// Parses a tool name (case-insensitive, `-`/`_` ignored).
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeconf::random_state::ToolKind;
    ///
    /// assert_eq!(ToolKind::parse("recon-all"), Some(ToolKind::ReconAll));
    /// assert_eq!(ToolKind::parse("nope"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "antsai" | "ai" => Some(Self::AntsAffineInitializer),
            "antsregistration" | "ants" => Some(Self::AntsRegistration),
            "reconall" => Some(Self::ReconAll),
            "applyvoltransform" | "mrivol2vol" => Some(Self::ApplyVolTransform),
            "fsl" | "imagemaths" | "fslmaths" => Some(Self::Fsl),
            _ => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AntsAffineInitializer => write!(f, "ants-ai"),
            Self::AntsRegistration => write!(f, "ants-registration"),
            Self::ReconAll => write!(f, "recon-all"),
            Self::ApplyVolTransform => write!(f, "apply-vol-transform"),
            Self::Fsl => write!(f, "fsl"),
        }
    }
}

/// Command-line flags that pin `tool`'s randomness to `seed`.
///
/// An absent seed yields no flags.
#[must_use]
pub fn seed_flags_for(tool: ToolKind, seed: Option<u32>) -> Vec<String> {
    let Some(seed) = seed else {
        return Vec::new();
    };
    match tool {
        ToolKind::AntsAffineInitializer | ToolKind::AntsRegistration => {
            vec![format!("--random-seed {seed}")]
        }
        ToolKind::ReconAll => vec!["-norandomness".to_string(), format!("-rng-seed {seed}")],
        ToolKind::ApplyVolTransform | ToolKind::Fsl => vec![format!("-seed {seed}")],
    }
}

/// Inserts `--random-seed <seed>` right after `antsRegistration` in a
/// command vector. Commands without that program are returned unchanged.
///
/// # Examples
///
/// ```
/// use pipeconf::random_state::seed_registration_command;
///
/// let cmd = vec!["antsRegistration".to_string(), "--dimensionality".to_string(), "3".to_string()];
/// let seeded = seed_registration_command(cmd, Some(42));
/// assert_eq!(seeded[..3], ["antsRegistration", "--random-seed", "42"]);
/// ```
#[must_use]
pub fn seed_registration_command(mut command: Vec<String>, seed: Option<u32>) -> Vec<String> {
    let Some(seed) = seed else {
        return command;
    };
    if let Some(pos) = command.iter().position(|arg| arg == "antsRegistration") {
        command.insert(pos + 1, seed.to_string());
        command.insert(pos + 1, "--random-seed".to_string());
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    #[test]
    fn test_seed_bounds() {
        assert!(RandomSeed::from_value(&ConfigValue::Integer(1)).is_ok());
        assert!(RandomSeed::from_value(&ConfigValue::Integer(i64::from(MAX_SEED))).is_ok());
        assert!(RandomSeed::from_value(&ConfigValue::Integer(i64::from(MAX_SEED) + 1)).is_err());
        assert!(RandomSeed::from_value(&ConfigValue::Integer(0)).is_err());
        assert!(RandomSeed::from_value(&ConfigValue::Integer(-5)).is_err());
    }

    #[test]
    fn test_seed_rejects_other_strings() {
        let err = RandomSeed::from_value(&ConfigValue::from("rando")).unwrap_err();
        assert!(matches!(err, Error::InvalidSeed { ref value } if value == "rando"));
        assert!(RandomSeed::from_value(&ConfigValue::Float(3.0)).is_err());
    }

    #[test]
    fn test_random_resolves_in_range() {
        let state = RandomStateConfig::new(Some(RandomSeed::Random));
        let seed = state.resolve().unwrap();
        assert!((1..=MAX_SEED).contains(&seed));
    }

    #[test]
    fn test_resolved_is_stable() {
        let state = RandomStateConfig::new(Some(RandomSeed::Random)).resolved();
        assert_eq!(state.resolve(), state.resolve());
    }

    #[test]
    fn test_no_seed_no_flags() {
        let state = RandomStateConfig::default();
        assert_eq!(state.resolve(), None);
        for tool in ToolKind::ALL {
            assert!(seed_flags_for(tool, None).is_empty());
        }
    }

    #[test]
    fn test_flags_per_tool() {
        assert_eq!(
            seed_flags_for(ToolKind::AntsRegistration, Some(3)),
            ["--random-seed 3"]
        );
        assert_eq!(
            seed_flags_for(ToolKind::ReconAll, Some(3)),
            ["-norandomness", "-rng-seed 3"]
        );
        assert_eq!(seed_flags_for(ToolKind::ApplyVolTransform, Some(3)), ["-seed 3"]);
    }

    #[test]
    fn test_from_tree() {
        let t = tree! {
            "pipeline_setup" => tree! { "system_config" => tree! { "random_seed" => 77 } },
        };
        let state = RandomStateConfig::from_tree(&t).unwrap();
        assert_eq!(state.seed(), Some(RandomSeed::Fixed(77)));

        let empty = RandomStateConfig::from_tree(&ConfigTree::new()).unwrap();
        assert_eq!(empty.seed(), None);
    }

    #[test]
    fn test_registration_command_untouched_without_program() {
        let cmd = vec!["fslmaths".to_string()];
        assert_eq!(seed_registration_command(cmd.clone(), Some(1)), cmd);
    }

    #[test]
    fn test_tool_parse_round_trips_display() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::parse(&tool.to_string()), Some(tool));
        }
    }
}

//! Fighter profile loading for headless runs.
//!
//! Profiles are JSON records (`.json`) or RON documents (`.ron`) kept in a
//! data directory. The two demo fighters are compiled in so the runner works
//! without any data on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bout_core::config::BoutConfig;
use bout_core::error::BoutError;
use bout_core::profile::{Fighter, FighterProfile};
use thiserror::Error;

/// Demo fighters shipped with the runner, as `(source name, JSON)`.
const DEMO_FIGHTERS: [(&str, &str); 2] = [
    ("demo_001.json", include_str!("../data/fighters/demo_001.json")),
    ("demo_002.json", include_str!("../data/fighters/demo_002.json")),
];

/// Errors that can occur while loading profiles or rules.
#[derive(Error, Debug)]
pub enum ProfileLoadError {
    /// Failed to read a file.
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse JSON or RON.
    #[error("Parse error in '{path}': {message}")]
    Parse {
        /// File that failed.
        path: String,
        /// Parser message.
        message: String,
    },
    /// File extension is neither `.json` nor `.ron`.
    #[error("Unsupported profile format: {0}")]
    UnsupportedFormat(String),
    /// Directory not found.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    /// No profile with this id and no file at this path.
    #[error("Unknown fighter: {0}")]
    UnknownFighter(String),
    /// Profile or rules parsed but failed validation.
    #[error(transparent)]
    Invalid(#[from] BoutError),
}

/// Registry of loaded fighter profiles, keyed by profile id.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, FighterProfile>,
}

impl ProfileRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in demo fighters.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in record fails to parse or validate.
    pub fn with_demo_fighters() -> Result<Self, ProfileLoadError> {
        let mut registry = Self::new();
        for (source, json) in DEMO_FIGHTERS {
            registry.insert(parse_json(source, json)?)?;
        }
        Ok(registry)
    }

    /// Validate and add a profile, replacing any with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileLoadError::Invalid`] if the profile fails validation.
    pub fn insert(&mut self, profile: FighterProfile) -> Result<String, ProfileLoadError> {
        profile.validate()?;
        let id = profile.id.clone();
        self.profiles.insert(id.clone(), profile);
        Ok(id)
    }

    /// Load one profile file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_file(&mut self, path: &Path) -> Result<String, ProfileLoadError> {
        let profile = read_profile(path)?;
        self.insert(profile)
    }

    /// Load every `.json` and `.ron` profile in a directory.
    ///
    /// Files that fail to load are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or unreadable.
    pub fn load_from_directory(&mut self, dir: &Path) -> Result<Vec<String>, ProfileLoadError> {
        if !dir.is_dir() {
            return Err(ProfileLoadError::DirectoryNotFound(
                dir.display().to_string(),
            ));
        }

        let io_error = |source| ProfileLoadError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()).map_err(io_error))
            .collect::<Result<_, _>>()?;
        paths.sort();

        let mut loaded = Vec::new();
        for path in paths.iter().filter(|p| is_profile_file(p)) {
            match self.load_from_file(path) {
                Ok(id) => loaded.push(id),
                Err(e) => tracing::warn!("Failed to load fighter from {:?}: {}", path, e),
            }
        }
        Ok(loaded)
    }

    /// Look a profile up by id, or load it if `id_or_path` names a file.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileLoadError::UnknownFighter`] if neither matches.
    pub fn resolve(&mut self, id_or_path: &str) -> Result<FighterProfile, ProfileLoadError> {
        let path = Path::new(id_or_path);
        let id = if path.is_file() {
            self.load_from_file(path)?
        } else {
            id_or_path.to_string()
        };
        self.get(&id)
            .cloned()
            .ok_or_else(|| ProfileLoadError::UnknownFighter(id_or_path.to_string()))
    }

    /// Resolve a profile and build a validated [`Fighter`].
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be resolved.
    pub fn fighter(&mut self, id_or_path: &str) -> Result<Fighter, ProfileLoadError> {
        Ok(Fighter::new(self.resolve(id_or_path)?)?)
    }

    /// Get a profile by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FighterProfile> {
        self.profiles.get(id)
    }

    /// All loaded profiles in id order.
    pub fn profiles(&self) -> impl Iterator<Item = &FighterProfile> {
        self.profiles.values()
    }

    /// Number of loaded profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profiles are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn is_profile_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json" | "ron")
    )
}

fn read_to_string(path: &Path) -> Result<String, ProfileLoadError> {
    fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_json(source: &str, text: &str) -> Result<FighterProfile, ProfileLoadError> {
    serde_json::from_str(text).map_err(|e| ProfileLoadError::Parse {
        path: source.to_string(),
        message: e.to_string(),
    })
}

/// Read a single profile file without registering it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_profile(path: &Path) -> Result<FighterProfile, ProfileLoadError> {
    let source = path.display().to_string();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&source, &read_to_string(path)?),
        Some("ron") => Ok(FighterProfile::from_ron_str(&source, &read_to_string(path)?)?),
        _ => Err(ProfileLoadError::UnsupportedFormat(source)),
    }
}

/// Load a rule set from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the rules are invalid.
pub fn load_rules(path: &Path) -> Result<BoutConfig, ProfileLoadError> {
    Ok(BoutConfig::from_ron_str(&read_to_string(path)?)?)
}

/// Resolve the default fighter data directory.
///
/// Looks in order at:
/// 1. Environment variable `BOUT_FIGHTER_DATA_DIR`
/// 2. `./data/fighters/` (running from the crate)
/// 3. `./crates/bout_headless/data/fighters/` (repo root)
#[must_use]
pub fn default_fighter_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("BOUT_FIGHTER_DATA_DIR") {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Some(path);
        }
    }

    ["data/fighters", "crates/bout_headless/data/fighters"]
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_dir())
}

/// Demo fighters plus everything in `dir` (or the default directory).
///
/// # Errors
///
/// Returns an error if the demo fighters are broken or an explicitly given
/// directory is missing.
pub fn load_registry(dir: Option<&Path>) -> Result<ProfileRegistry, ProfileLoadError> {
    let mut registry = ProfileRegistry::with_demo_fighters()?;
    match dir {
        Some(dir) => {
            registry.load_from_directory(dir)?;
        }
        None => {
            if let Some(dir) = default_fighter_data_dir() {
                registry.load_from_directory(&dir)?;
            }
        }
    }
    tracing::debug!(fighters = registry.len(), "Fighter registry loaded");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fighters_load() {
        let registry = ProfileRegistry::with_demo_fighters().unwrap();
        assert_eq!(registry.len(), 2);

        let somchai = registry.get("demo_001").unwrap();
        assert_eq!(somchai.name, "Somchai Petchyindee");
        // Absent style falls back to defaults.
        assert!((somchai.style.power_punch_frequency - 40.0).abs() < f64::EPSILON);

        let nong_o = registry.get("demo_002").unwrap();
        assert!((nong_o.durability.recovery_rate - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_physical_is_parse_error() {
        let err = parse_json("broken.json", r#"{"id":"x","name":"X","training":{}}"#).unwrap_err();
        assert!(matches!(err, ProfileLoadError::Parse { .. }));
    }

    #[test]
    fn test_unknown_fighter() {
        let mut registry = ProfileRegistry::with_demo_fighters().unwrap();
        assert!(matches!(
            registry.resolve("nobody"),
            Err(ProfileLoadError::UnknownFighter(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let mut registry = ProfileRegistry::new();
        let result = registry.load_from_directory(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(ProfileLoadError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good.json"),
            DEMO_FIGHTERS[0].1.replace("demo_001", "good"),
        )
        .unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = ProfileRegistry::new();
        let loaded = registry.load_from_directory(dir.path()).unwrap();
        assert_eq!(loaded, vec!["good".to_string()]);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut registry = ProfileRegistry::new();
        let mut profile = parse_json("demo", DEMO_FIGHTERS[0].1).unwrap();
        profile.physical.height_cm = -5.0;
        assert!(matches!(
            registry.insert(profile),
            Err(ProfileLoadError::Invalid(BoutError::InvalidProfile { .. }))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            read_profile(Path::new("fighter.yaml")),
            Err(ProfileLoadError::UnsupportedFormat(_))
        ));
    }
}

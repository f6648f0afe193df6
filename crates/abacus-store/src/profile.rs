use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{Result, StoreError};
use crate::settings::Settings;
use crate::store::Store;

pub const DEFAULT_PROFILE: &str = "default";

/// `$HOME/.abacus`, falling back to the working directory when no home is set.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".abacus")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Make a profile name safe to use as a filename.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Pick the profile: explicit name, then the configured default, then
/// `default`. Names that sanitize to nothing are skipped.
pub fn resolve_profile(explicit: Option<&str>, settings: &Settings) -> String {
    [explicit, settings.default_profile.as_deref()]
        .into_iter()
        .flatten()
        .map(sanitize_name)
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// One profile's database under the data directory.
///
/// Layout:
/// ```text
/// ~/.abacus/
/// ├── config.toml
/// └── profiles/
///     ├── default.db
///     └── <profile>.db
/// ```
pub struct ProfileStore {
    store: Store,
    profile: String,
    path: Option<PathBuf>,
}

impl ProfileStore {
    /// Open (creating directories and schema as needed).
    pub fn open(profile: &str, base_dir: &Path) -> Result<Self> {
        let profiles_dir = base_dir.join("profiles");
        fs::create_dir_all(&profiles_dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", profiles_dir.display()))
        })?;

        let profile = sanitize_name(profile);
        if profile.is_empty() {
            return Err(StoreError::InvalidData("empty profile name".to_string()));
        }
        let path = profiles_dir.join(format!("{profile}.db"));
        tracing::debug!(profile = %profile, path = %path.display(), "opening profile");

        let store = Store::open(&path)?;
        store.set_metadata("profile", &profile)?;
        Ok(Self {
            store,
            profile,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            profile: "test".to_string(),
            path: None,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// Profile names with a database under `base_dir`, sorted.
pub fn list_profiles(base_dir: &Path) -> Result<Vec<String>> {
    let dir = base_dir.join("profiles");
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            (path.extension()? == "db")
                .then(|| path.file_stem()?.to_str().map(str::to_string))
                .flatten()
        })
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abacus_core::PersistedState;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("work"), "work");
        assert_eq!(sanitize_name("my profile/../x"), "my_profile____x");
        assert_eq!(sanitize_name("  "), "");
    }

    #[test]
    fn test_resolve_profile_priority() {
        let mut settings = Settings::default();
        assert_eq!(resolve_profile(None, &settings), "default");

        settings.default_profile = Some("home".to_string());
        assert_eq!(resolve_profile(None, &settings), "home");
        assert_eq!(resolve_profile(Some("work"), &settings), "work");
        assert_eq!(resolve_profile(Some("   "), &settings), "home");
    }

    #[test]
    fn test_open_creates_profile_db() {
        let dir = tempfile::tempdir().unwrap();
        let ps = ProfileStore::open("work", dir.path()).unwrap();
        assert_eq!(ps.profile(), "work");
        assert!(dir.path().join("profiles/work.db").exists());
        assert_eq!(
            ps.store().get_metadata("profile").unwrap().as_deref(),
            Some("work")
        );
        assert_eq!(list_profiles(dir.path()).unwrap(), vec!["work".to_string()]);
    }

    #[test]
    fn test_profiles_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let a = ProfileStore::open("a", dir.path()).unwrap();
        let b = ProfileStore::open("b", dir.path()).unwrap();

        let state = PersistedState {
            memory: 3.0,
            ..PersistedState::default()
        };
        a.store().save_state(&state).unwrap();

        assert_eq!(a.store().load_state().unwrap().memory, 3.0);
        assert_eq!(b.store().load_state().unwrap().memory, 0.0);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let ps = ProfileStore::open("default", dir.path()).unwrap();
            let state = PersistedState {
                memory: 9.5,
                ..PersistedState::default()
            };
            ps.store().save_state(&state).unwrap();
        }
        let ps = ProfileStore::open("default", dir.path()).unwrap();
        assert_eq!(ps.store().load_state().unwrap().memory, 9.5);
    }
}

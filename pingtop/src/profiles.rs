//! Backend profiles: load/save a JSON mapping of profile name -> connection
//! settings. Stored under $XDG_CONFIG_HOME/pingtop/profiles.json (fallback
//! ~/.config/pingtop/profiles.json).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

/// Where to reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Connection {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, Connection>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("pingtop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pingtop")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

/// A missing or unreadable file yields an empty set of profiles.
pub fn load_profiles() -> ProfilesFile {
    match fs::read_to_string(profiles_path()) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed profiles.json");
            ProfilesFile::default()
        }),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

pub enum ResolveProfile {
    /// Use the settings given on the command line.
    Direct(Connection),
    /// Loaded from an existing profile entry.
    Loaded(Connection),
    /// Should prompt the user to pick among these profile names.
    PromptSelect(Vec<String>),
    /// Should prompt the user to create a new profile with this name.
    PromptCreate(String),
    /// Nothing given and nothing saved.
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub tls_ca: Option<String>,
    pub check_path: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.url, self.profile_name) {
            // URL given: use it directly (the caller may persist it)
            (Some(url), _) => ResolveProfile::Direct(Connection {
                url,
                tls_ca: self.tls_ca,
                check_path: self.check_path,
            }),
            // Only a profile name: load it, or offer to create it
            (None, Some(name)) => match pf.profiles.get(&name) {
                Some(entry) => {
                    let mut conn = entry.clone();
                    // Command-line flags win over stored values.
                    if self.tls_ca.is_some() {
                        conn.tls_ca = self.tls_ca;
                    }
                    if self.check_path.is_some() {
                        conn.check_path = self.check_path;
                    }
                    ResolveProfile::Loaded(conn)
                }
                None => ResolveProfile::PromptCreate(name),
            },
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}

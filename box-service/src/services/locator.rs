//! Lookup of the external box generator binary.
//!
//! The generator ships as a Python console script, so it lands in a
//! `Scripts` (Windows) or `bin` directory under whichever installation
//! prefix `pip` used. Candidates are checked in order on every call; the
//! first existing file wins.

use crate::config::GeneratorConfig;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resolves the generator executable, or reports that it is absent.
pub trait ExecutableLocator: Send + Sync {
    fn locate(&self) -> Option<PathBuf>;

    /// Human-readable description of where `locate` looks.
    fn search_basis(&self) -> String;
}

/// Process environment inputs the candidate list is derived from.
#[derive(Debug, Clone, Default)]
pub struct SearchEnvironment {
    pub virtual_env: Option<PathBuf>,
    pub current_exe: Option<PathBuf>,
    pub python_user_base: Option<PathBuf>,
    pub app_data: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl SearchEnvironment {
    pub fn capture() -> Self {
        Self {
            virtual_env: env::var_os("VIRTUAL_ENV").map(PathBuf::from),
            current_exe: env::current_exe().ok(),
            python_user_base: env::var_os("PYTHONUSERBASE").map(PathBuf::from),
            app_data: env::var_os("APPDATA").map(PathBuf::from),
            home: env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .map(PathBuf::from),
        }
    }
}

/// Installation layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn scripts_dir(self) -> &'static str {
        match self {
            Platform::Windows => "Scripts",
            Platform::Unix => "bin",
        }
    }
}

/// One place the generator may live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Path(PathBuf),
    /// `<base>/Python3XY/<scripts>/<name>`. The interpreter directories are
    /// listed at lookup time, newest first.
    Versioned {
        base: PathBuf,
        scripts: &'static str,
        name: String,
    },
}

impl Candidate {
    fn resolve(&self) -> Option<PathBuf> {
        match self {
            Candidate::Path(path) => path.is_file().then(|| path.clone()),
            Candidate::Versioned {
                base,
                scripts,
                name,
            } => python_version_dirs(base)
                .into_iter()
                .map(|dir| dir.join(scripts).join(name))
                .find(|path| path.is_file()),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Path(path) => write!(f, "{}", path.display()),
            Candidate::Versioned {
                base,
                scripts,
                name,
            } => write!(
                f,
                "{}",
                base.join("Python3*").join(scripts).join(name).display()
            ),
        }
    }
}

/// Candidate order: explicit executable, installation prefix, directory
/// beside the running binary, user-local installation.
pub fn derive_candidates(
    config: &GeneratorConfig,
    env: &SearchEnvironment,
    platform: Platform,
) -> Vec<Candidate> {
    let scripts = platform.scripts_dir();
    let name = config.executable_name.as_str();
    let mut candidates = Vec::new();

    if let Some(executable) = &config.executable {
        candidates.push(Candidate::Path(executable.clone()));
    }

    if let Some(prefix) = config.install_prefix.as_ref().or(env.virtual_env.as_ref()) {
        candidates.push(Candidate::Path(prefix.join(scripts).join(name)));
    }

    if let Some(exe_dir) = env.current_exe.as_deref().and_then(Path::parent) {
        candidates.push(Candidate::Path(exe_dir.join(scripts).join(name)));
    }

    // Where `pip install --user` puts console scripts.
    match platform {
        Platform::Windows => {
            let base = env
                .python_user_base
                .clone()
                .or_else(|| env.app_data.as_ref().map(|dir| dir.join("Python")));
            if let Some(base) = base {
                candidates.push(Candidate::Versioned {
                    base,
                    scripts,
                    name: name.to_string(),
                });
            }
        }
        Platform::Unix => {
            let base = env
                .python_user_base
                .clone()
                .or_else(|| env.home.as_ref().map(|home| home.join(".local")));
            if let Some(base) = base {
                candidates.push(Candidate::Path(base.join(scripts).join(name)));
            }
        }
    }

    candidates
}

/// Checks a fixed, ordered list of candidates.
#[derive(Debug, Clone)]
pub struct CandidateLocator {
    candidates: Vec<Candidate>,
}

impl CandidateLocator {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            candidates: paths.into_iter().map(Candidate::Path).collect(),
        }
    }

    pub fn from_config(config: &GeneratorConfig, env: &SearchEnvironment) -> Self {
        Self {
            candidates: derive_candidates(config, env, Platform::current()),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }
}

impl From<Vec<Candidate>> for CandidateLocator {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl ExecutableLocator for CandidateLocator {
    fn locate(&self) -> Option<PathBuf> {
        for candidate in &self.candidates {
            if let Some(path) = candidate.resolve() {
                tracing::debug!(path = %path.display(), "Found box generator");
                return Some(path);
            }
            tracing::trace!(candidate = %candidate, "Generator candidate missing");
        }
        None
    }

    fn search_basis(&self) -> String {
        if self.candidates.is_empty() {
            return "no candidate locations (none configured or derivable)".to_string();
        }

        self.candidates
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `Python3XY` directories under `base`, newest interpreter first.
fn python_version_dirs(base: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(base) else {
        return Vec::new();
    };

    let mut versions: Vec<(u32, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| python_version_key(&path).map(|key| (key, path)))
        .collect();
    versions.sort_by(|a, b| b.0.cmp(&a.0));
    versions.into_iter().map(|(_, path)| path).collect()
}

fn python_version_key(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("Python3")
        .and_then(|minor| minor.parse().ok())
        .map(|minor: u32| 300 + minor)
}

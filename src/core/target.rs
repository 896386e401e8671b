use crate::error::{Result, ShimError};
use crate::utils::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Descriptor for a binary managed by the shim: where it comes from and
/// where it lives on disk.
///
/// Validation is aggregate: every bad parameter is reported in a single
/// [`ShimError::Validation`] rather than failing on the first one. On success
/// the install directory is created, so later stages may assume it exists.
#[derive(Debug, Clone)]
pub struct InstallTarget {
    name: String,
    url: Url,
    install_dir: PathBuf,
    binary_path: PathBuf,
}

impl InstallTarget {
    pub fn new(name: &str, url: &str, install_dir: impl Into<PathBuf>) -> Result<Self> {
        let install_dir = install_dir.into();
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push("you must specify the name of your binary".to_string());
        } else if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            errors.push(format!("name must not contain path separators: {name}"));
        } else if name == "." || name == ".." {
            // Either would alias the install directory itself or its parent.
            errors.push(format!("name must be a file name: {name}"));
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                errors.push(format!("url must be an absolute URL: {e}"));
                None
            }
        };

        if install_dir.as_os_str().is_empty() {
            errors.push("install directory must not be empty".to_string());
        }

        let url = match parsed {
            Some(url) if errors.is_empty() => url,
            _ => return Err(ShimError::Validation { errors }),
        };

        fs::ensure_dir_exists(&install_dir)?;

        // Fixed at construction; never recomputed afterwards.
        let binary_path = install_dir.join(name);

        Ok(Self {
            name: name.to_string(),
            url,
            install_dir,
            binary_path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

/// Default install root, `~/.binshim/bin`.
pub fn default_install_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".binshim").join("bin"))
        .ok_or(ShimError::HomeDirectoryNotFound)
}

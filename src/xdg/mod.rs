//! XDG Base Directory Specification support.
//!
//! Every accessor is recomputed from the [`Env`] snapshot on each call; nothing is cached.
//!
//! ```rust
//! # use xdg_basedir::{Xdg, os::env::Env};
//! # use std::path::PathBuf;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let env: Env = [("HOME", "/home/alice"), ("XDG_CACHE_HOME", "/var/cache/alice")]
//!     .into_iter()
//!     .collect();
//! let xdg = Xdg::from_env(env);
//!
//! assert_eq!(xdg.config_home()?, PathBuf::from("/home/alice/.config"));
//! assert_eq!(xdg.cache_home()?, PathBuf::from("/var/cache/alice"));
//! # Ok(())
//! # }
//! ```

use std::ffi::OsStr;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::error::{Result, XdgError};
use crate::os::env::Env;

mod runtime;

pub use runtime::{RUNTIME_DIR_FALLBACK_PREFIX, RuntimeDirMode};

const DEFAULT_CONFIG_DIRS: &[&str] = &["/etc/xdg"];
const DEFAULT_DATA_DIRS: &[&str] = &["/usr/local/share/", "/usr/share/"];

/// Resolver for XDG base directories.
#[derive(Debug, Clone, Default)]
pub struct Xdg {
    env: Env,
}

impl Xdg {
    /// Resolve against the current process environment.
    pub fn new() -> Self {
        Self::from_env(Env::new())
    }

    /// Resolve against an explicit environment.
    pub fn from_env(env: Env) -> Self {
        Self { env }
    }

    /// Environment this resolver reads from.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Refresh the snapshot from the current process environment.
    pub fn reload(&mut self) {
        self.env.reload()
    }

    /// User's home directory.
    ///
    /// `$HOME` if non-empty, otherwise `$HOMEDRIVE` joined with `$HOMEPATH` by the platform
    /// separator (so `C:` and `fake-dir` give `C:/fake-dir` on unix).
    ///
    /// # Errors
    /// [`XdgError::Configuration`] if neither source is usable.
    pub fn home(&self) -> Result<PathBuf> {
        if let Some(home) = self.env.get_path("HOME") {
            return Ok(home);
        }
        match (
            self.env.get_non_empty("HOMEDRIVE"),
            self.env.get_non_empty("HOMEPATH"),
        ) {
            (Some(drive), Some(path)) => {
                let mut home = drive.to_os_string();
                home.push(MAIN_SEPARATOR_STR);
                home.push(path);
                Ok(PathBuf::from(home))
            }
            _ => Err(XdgError::Configuration),
        }
    }

    fn home_or(&self, key: &str, fallback: &[&str]) -> Result<PathBuf> {
        match self.env.get_path(key) {
            Some(path) => Ok(path),
            None => Ok(fallback
                .iter()
                .fold(self.home()?, |path, component| path.join(component))),
        }
    }

    /// `$XDG_CONFIG_HOME`, defaulting to `~/.config`.
    pub fn config_home(&self) -> Result<PathBuf> {
        self.home_or("XDG_CONFIG_HOME", &[".config"])
    }

    /// `$XDG_DATA_HOME`, defaulting to `~/.local/share`.
    pub fn data_home(&self) -> Result<PathBuf> {
        self.home_or("XDG_DATA_HOME", &[".local", "share"])
    }

    /// `$XDG_CACHE_HOME`, defaulting to `~/.cache`.
    pub fn cache_home(&self) -> Result<PathBuf> {
        self.home_or("XDG_CACHE_HOME", &[".cache"])
    }

    /// `$XDG_STATE_HOME`, defaulting to `~/.local/state`.
    pub fn state_home(&self) -> Result<PathBuf> {
        self.home_or("XDG_STATE_HOME", &[".local", "state"])
    }

    fn search_list(&self, home: PathBuf, key: &str, defaults: &[&str]) -> Vec<PathBuf> {
        let mut dirs = vec![home];
        match self.env.get_non_empty(key) {
            Some(list) => dirs.extend(split_dirs(list)),
            None => dirs.extend(defaults.iter().map(PathBuf::from)),
        }
        dirs
    }

    /// Config search list: [`Xdg::config_home`] first, then `$XDG_CONFIG_DIRS` (or `/etc/xdg`).
    pub fn config_dirs(&self) -> Result<Vec<PathBuf>> {
        Ok(self.search_list(self.config_home()?, "XDG_CONFIG_DIRS", DEFAULT_CONFIG_DIRS))
    }

    /// Data search list: [`Xdg::data_home`] first, then `$XDG_DATA_DIRS` (or
    /// `/usr/local/share/:/usr/share/`).
    pub fn data_dirs(&self) -> Result<Vec<PathBuf>> {
        Ok(self.search_list(self.data_home()?, "XDG_DATA_DIRS", DEFAULT_DATA_DIRS))
    }

    /// First existing `dir/relative` over [`Xdg::config_dirs`].
    pub fn find_config_file(&self, relative: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        Ok(find_in(self.config_dirs()?, relative.as_ref()))
    }

    /// First existing `dir/relative` over [`Xdg::data_dirs`].
    pub fn find_data_file(&self, relative: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        Ok(find_in(self.data_dirs()?, relative.as_ref()))
    }
}

// Empty entries (`a::b`, trailing `:`) carry no directory and are skipped.
fn split_dirs(list: &OsStr) -> impl Iterator<Item = PathBuf> + '_ {
    std::env::split_paths(list).filter(|path| !path.as_os_str().is_empty())
}

fn find_in(dirs: Vec<PathBuf>, relative: &Path) -> Option<PathBuf> {
    dirs.into_iter()
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.exists())
}

//! `$XDG_RUNTIME_DIR` resolution, with an opt-in fallback under the temporary directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, XdgError};
use crate::fs::{MkdirOptions, PathExt, Privacy};
use crate::os::user::current_user_name;

use super::Xdg;

/// Prefix of the fallback runtime directory name, followed by the user name.
pub const RUNTIME_DIR_FALLBACK_PREFIX: &str = "xdg-runtime-dir-fallback-";

/// How [`Xdg::runtime_dir`] behaves when `$XDG_RUNTIME_DIR` is missing.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum RuntimeDirMode {
    /// Fail with [`XdgError::RuntimeDirectoryUnavailable`].
    #[default]
    Strict,
    /// Use (and create if needed) a private directory under the temporary directory.
    Fallback,
}

impl Xdg {
    /// User-specific runtime directory.
    ///
    /// A non-empty `$XDG_RUNTIME_DIR` is returned verbatim: the environment is trusted to have
    /// set it up properly. Otherwise, depending on `mode`:
    /// * [`RuntimeDirMode::Strict`] fails with [`XdgError::RuntimeDirectoryUnavailable`],
    /// * [`RuntimeDirMode::Fallback`] returns [`Xdg::fallback_runtime_dir`], making sure it is
    ///   a directory owned by the current user with mode `0700`. Anything else found there is
    ///   removed and the directory is created from scratch, never `chmod`-ed in place.
    ///
    /// The fallback check and the rebuild are not atomic: two processes finding a compromised
    /// directory at the same time may both try to rebuild it, and the loser gets an
    /// [`XdgError::Io`] (`AlreadyExists` or `NotFound`). No lock is taken.
    pub fn runtime_dir(&self, mode: RuntimeDirMode) -> Result<PathBuf> {
        if let Some(dir) = self.env.get_path("XDG_RUNTIME_DIR") {
            return Ok(dir);
        }
        match mode {
            RuntimeDirMode::Strict => Err(XdgError::RuntimeDirectoryUnavailable),
            RuntimeDirMode::Fallback => {
                let dir = self.fallback_runtime_dir();
                ensure_private_dir(&dir).map_err(|source| XdgError::Io {
                    path: dir.clone(),
                    source,
                })?;
                Ok(dir)
            }
        }
    }

    /// Location used by [`RuntimeDirMode::Fallback`]:
    /// `$TMPDIR/xdg-runtime-dir-fallback-$USER`.
    ///
    /// `$TMPDIR` comes from this resolver's environment, and [`std::env::temp_dir`] is used when
    /// it's missing. The user name comes from [`current_user_name`], which only yields a single
    /// path component, so the result always sits directly inside the temporary directory.
    /// Nothing is created.
    pub fn fallback_runtime_dir(&self) -> PathBuf {
        let tmp = self
            .env
            .get_path("TMPDIR")
            .unwrap_or_else(std::env::temp_dir);
        let mut name = std::ffi::OsString::from(RUNTIME_DIR_FALLBACK_PREFIX);
        name.push(current_user_name(&self.env));
        tmp.join(name)
    }
}

fn ensure_private_dir(dir: &Path) -> std::io::Result<()> {
    match dir.privacy()? {
        Privacy::Private => {
            tracing::debug!(path = %dir.display(), "using fallback runtime directory");
            return Ok(());
        }
        Privacy::Untrusted => {
            tracing::warn!(
                path = %dir.display(),
                "fallback runtime directory has wrong owner, type or permissions, rebuilding"
            );
            dir.remove_any()?;
        }
        Privacy::Missing => {}
    }
    dir.mkdir_private(MkdirOptions::WithParents)?;
    tracing::debug!(path = %dir.display(), "created fallback runtime directory");
    Ok(())
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors encountered while resolving XDG directories.
#[derive(Debug, Error)]
pub enum XdgError {
    /// Neither `$HOME` nor `$HOMEDRIVE` + `$HOMEPATH` are usable.
    #[error("could not determine home directory: `$HOME` and `$HOMEDRIVE`/`$HOMEPATH` are unset")]
    Configuration,

    /// `$XDG_RUNTIME_DIR` was requested in strict mode, but the environment doesn't provide it.
    #[error("`$XDG_RUNTIME_DIR` is not set")]
    RuntimeDirectoryUnavailable,

    /// Filesystem failure while preparing the fallback runtime directory.
    #[error("failed to prepare runtime directory `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = XdgError> = std::result::Result<T, E>;

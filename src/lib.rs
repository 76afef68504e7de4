//! XDG Base Directory resolution.
//!
//! Computes home, config, data, cache, state and runtime directories from an injectable
//! environment snapshot, applying the XDG defaults when variables are missing or empty.
//!
//! ```rust,no_run
//! # use xdg_basedir::{RuntimeDirMode, Xdg};
//! # fn main() -> Result<(), xdg_basedir::XdgError> {
//! let xdg = Xdg::new();
//! let config_dirs = xdg.config_dirs()?;
//! let runtime = xdg.runtime_dir(RuntimeDirMode::Fallback)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fs;
pub mod os;
pub mod xdg;

pub use error::{Result, XdgError};
pub use xdg::{RuntimeDirMode, Xdg};

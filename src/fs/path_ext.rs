use std::{
    fs::{DirBuilder, remove_dir_all, remove_file},
    io,
    path::Path,
};

/// Mode of a directory private to its owner.
#[cfg(unix)]
pub const PRIVATE_DIR_MODE: u32 = 0o700;

/// Options for controlling [`PathExt::mkdir_private`]
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum MkdirOptions {
    /// Equivalent of `mkdir $path`.
    WithoutParents,
    /// Equivalent of `mkdir -p $path`.
    WithParents,
}

/// What is found at a path, without following symlinks.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Privacy {
    /// Nothing exists there.
    Missing,
    /// A real directory, owned by the current user, with mode exactly `0700`.
    Private,
    /// Anything else: a file, a symlink, a foreign or loosely permitted directory.
    Untrusted,
}

mod sealed {
    use std::path::Path;

    pub trait Sealed {}
    impl Sealed for Path {}
}

/// Extension trait for [`Path`] with the filesystem operations needed for private directories.
///
/// ```rust,no_run
/// # use xdg_basedir::fs::*;
/// # use std::path::Path;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = Path::new("/tmp/my-private-dir");
/// if path.privacy()? != Privacy::Private {
///     path.remove_any()?;
///     path.mkdir_private(MkdirOptions::WithParents)?;
/// }
/// # Ok(())
/// # }
/// ```
pub trait PathExt: sealed::Sealed {
    /// Create a directory at given [`Path`], accessible only by its owner.
    ///
    /// Missing parents (with [`MkdirOptions::WithParents`]) are created with default
    /// permissions. The leaf has its mode set to `0700` explicitly after creation, so the
    /// process umask doesn't matter.
    ///
    /// Unlike `mkdir -p`, an already existing leaf is an error of kind
    /// [`ErrorKind::AlreadyExists`](io::ErrorKind::AlreadyExists): a directory we didn't create
    /// can't be assumed private.
    ///
    /// # Returns
    /// [`Ok(())`](Ok) if created successfully, otherwise error, as reported by
    /// [`DirBuilder::create`] or [`std::fs::set_permissions`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use xdg_basedir::fs::*;
    /// # use std::path::PathBuf;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let buf = PathBuf::from("a/private");
    /// buf.as_path().mkdir_private(MkdirOptions::WithParents)?;
    /// assert_eq!(buf.as_path().privacy()?, Privacy::Private);
    /// # Ok(())
    /// # }
    /// ```
    fn mkdir_private(&self, opts: MkdirOptions) -> io::Result<()>;

    /// Inspect `self` with [`std::fs::symlink_metadata`] and classify it.
    ///
    /// On non-unix targets ownership and mode can't be checked, so any real directory is
    /// [`Privacy::Private`].
    ///
    /// # Returns
    /// [`Privacy::Missing`] if nothing exists at `self`, [`Privacy::Private`] for a real
    /// directory owned by the current user with mode exactly `0700`, [`Privacy::Untrusted`]
    /// otherwise. Errors other than [`ErrorKind::NotFound`](io::ErrorKind::NotFound) from
    /// [`std::fs::symlink_metadata`] are returned as-is.
    fn privacy(&self) -> io::Result<Privacy>;

    /// Remove whatever is at `self`: directories recursively, anything else (files, symlinks)
    /// is unlinked. Symlinks are never followed.
    ///
    /// # Returns
    /// [`Ok(())`](Ok) if `self` is gone afterwards, including when it didn't exist at all.
    fn remove_any(&self) -> io::Result<()>;

    /// Wrapper around [`std::fs::remove_dir_all`].
    fn rmtree(&self) -> io::Result<()>;

    /// Wrapper around [`std::fs::remove_file`].
    fn rm(&self) -> io::Result<()>;
}

impl PathExt for Path {
    fn mkdir_private(&self, opts: MkdirOptions) -> io::Result<()> {
        if let (MkdirOptions::WithParents, Some(parent)) = (opts, self.parent()) {
            if !parent.as_os_str().is_empty() {
                DirBuilder::new().recursive(true).create(parent)?;
            }
        }
        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(PRIVATE_DIR_MODE);
        }
        builder.create(self)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(self, std::fs::Permissions::from_mode(PRIVATE_DIR_MODE))?;
        }
        Ok(())
    }

    #[cfg(unix)]
    fn privacy(&self) -> io::Result<Privacy> {
        use std::os::unix::fs::MetadataExt;

        let metadata = match self.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Privacy::Missing),
            Err(e) => return Err(e),
        };
        // Setuid, setgid and sticky bits count too: the mode must be exactly `0700`.
        const MODE_MASK: u32 = 0o7777;
        let private = metadata.file_type().is_dir()
            && metadata.uid() == crate::os::user::current_uid()
            && metadata.mode() & MODE_MASK == PRIVATE_DIR_MODE;
        Ok(if private {
            Privacy::Private
        } else {
            Privacy::Untrusted
        })
    }

    #[cfg(not(unix))]
    fn privacy(&self) -> io::Result<Privacy> {
        match self.symlink_metadata() {
            Ok(metadata) if metadata.file_type().is_dir() => Ok(Privacy::Private),
            Ok(_) => Ok(Privacy::Untrusted),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Privacy::Missing),
            Err(e) => Err(e),
        }
    }

    fn remove_any(&self) -> io::Result<()> {
        let metadata = match self.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        if metadata.file_type().is_dir() {
            self.rmtree()
        } else {
            self.rm()
        }
    }

    fn rmtree(&self) -> io::Result<()> {
        remove_dir_all(self)
    }

    fn rm(&self) -> io::Result<()> {
        remove_file(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_matches, assert_ok};
    use tempfile::tempdir;

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        path.metadata().expect("needed for tests").permissions().mode() & 0o777
    }

    #[test]
    fn missing_path_is_missing() {
        let tmp = tempdir().expect("needed for tests");
        let path = tmp.path().join("nope");
        assert_matches!(path.privacy(), Ok(Privacy::Missing));
    }

    #[test]
    fn create_private_dirs() {
        {
            let tmp = tempdir().expect("needed for tests");
            let path = tmp.path().join("x").join("y");
            assert_ok!(path.mkdir_private(MkdirOptions::WithParents));
            assert!(path.is_dir());
        }

        {
            let tmp = tempdir().expect("needed for tests");
            let path = tmp.path().join("x");
            assert_ok!(path.mkdir_private(MkdirOptions::WithoutParents));
            assert!(path.is_dir());
        }

        {
            let tmp = tempdir().expect("needed for tests");
            let path = tmp.path().join("x").join("y");
            assert_err!(path.mkdir_private(MkdirOptions::WithoutParents));
        }
    }

    #[test]
    fn existing_leaf_is_an_error() {
        let tmp = tempdir().expect("needed for tests");
        let path = tmp.path().join("x");
        assert_ok!(path.mkdir_private(MkdirOptions::WithParents));
        let err = path
            .mkdir_private(MkdirOptions::WithParents)
            .expect_err("leaf exists");
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[cfg(unix)]
    #[test]
    fn private_dir_has_exact_mode() {
        let tmp = tempdir().expect("needed for tests");
        let path = tmp.path().join("private");
        assert_ok!(path.mkdir_private(MkdirOptions::WithoutParents));
        assert_eq!(mode_of(&path), 0o700);
        assert_matches!(path.privacy(), Ok(Privacy::Private));
    }

    #[cfg(unix)]
    #[test]
    fn loose_permissions_are_untrusted() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().expect("needed for tests");
        let path = tmp.path().join("loose");
        std::fs::create_dir(&path).expect("needed for tests");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o764))
            .expect("needed for tests");
        assert_matches!(path.privacy(), Ok(Privacy::Untrusted));

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o1700))
            .expect("needed for tests");
        assert_matches!(path.privacy(), Ok(Privacy::Untrusted));
    }

    #[test]
    fn regular_file_is_untrusted() {
        let tmp = tempdir().expect("needed for tests");
        let path = tmp.path().join("file");
        std::fs::write(&path, b"x").expect("needed for tests");
        assert_matches!(path.privacy(), Ok(Privacy::Untrusted));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_private_dir_is_untrusted() {
        let tmp = tempdir().expect("needed for tests");
        let target = tmp.path().join("target");
        assert_ok!(target.mkdir_private(MkdirOptions::WithoutParents));
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("needed for tests");
        assert_matches!(link.privacy(), Ok(Privacy::Untrusted));
    }

    #[test]
    fn remove_any_handles_every_kind() {
        let tmp = tempdir().expect("needed for tests");

        let dir = tmp.path().join("dir");
        std::fs::create_dir_all(dir.join("nested")).expect("needed for tests");
        std::fs::write(dir.join("nested").join("file"), b"x").expect("needed for tests");
        assert_ok!(dir.remove_any());
        assert!(!dir.exists());

        let file = tmp.path().join("file");
        std::fs::write(&file, b"x").expect("needed for tests");
        assert_ok!(file.remove_any());
        assert!(!file.exists());

        assert_ok!(tmp.path().join("missing").remove_any());
    }

    #[cfg(unix)]
    #[test]
    fn remove_any_does_not_follow_symlinks() {
        let tmp = tempdir().expect("needed for tests");
        let target = tmp.path().join("target");
        std::fs::create_dir(&target).expect("needed for tests");
        std::fs::write(target.join("keep"), b"x").expect("needed for tests");
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("needed for tests");

        assert_ok!(link.remove_any());
        assert!(link.symlink_metadata().is_err());
        assert!(target.join("keep").exists());
    }
}

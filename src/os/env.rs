use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Snapshot of environmental variables, which is safe to access on Windows: its
/// environmental variables are case-insensitive.
///
/// Either taken from [`std::env::vars_os`], or built from an arbitrary mapping, so callers (and
/// tests) never have to mutate the real process environment.
#[derive(Debug, Clone)]
pub struct Env {
    keys: HashMap<OsString, OsString>,

    normalised_keys: HashMap<OsString, OsString>,
}

impl Env {
    /// Create [`Env`] from the current process environment.
    pub fn new() -> Self {
        Self::new_from(std::env::vars_os().collect())
    }

    /// Create new [`Env`] using `env` as existing environmental variables.
    pub fn new_from(env: HashMap<OsString, OsString>) -> Self {
        Self {
            normalised_keys: Env::normalize_map(&env),
            keys: env,
        }
    }

    fn normalize_key(key: impl AsRef<OsStr>) -> OsString {
        key.as_ref().to_ascii_uppercase()
    }

    fn normalize_map(keys: &HashMap<OsString, OsString>) -> HashMap<OsString, OsString> {
        keys.iter()
            .map(|(key, value)| (Env::normalize_key(key), value.clone()))
            .collect()
    }

    /// Reload environmental variables from `env`.
    pub fn reload_from(&mut self, env: HashMap<OsString, OsString>) {
        self.normalised_keys = Env::normalize_map(&env);
        self.keys = env;
    }

    /// Reload environmental variables from [`std::env::vars_os`].
    pub fn reload(&mut self) {
        self.reload_from(std::env::vars_os().collect())
    }

    /// Get environmental variable pointed by `key`.
    ///
    /// # Returns
    /// `Option<&OsStr>`. `None` variant indicates missing key, `Some`: existing key (which may
    /// still be empty).
    ///
    /// # Examples
    /// ```rust
    /// use xdg_basedir::os::env::Env;
    ///
    /// let env: Env = [("FOO", "bar")].into_iter().collect();
    /// assert_eq!(env.get_os("FOO").and_then(|v| v.to_str()), Some("bar"));
    /// assert_eq!(env.get_os("BAZ"), None);
    /// ```
    pub fn get_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        let key = key.as_ref();
        match self.keys.get(key) {
            Some(x) => Some(x),
            None => {
                if cfg!(target_os = "windows") {
                    self.normalised_keys
                        .get(&Env::normalize_key(key))
                        .map(|x| x.as_ref())
                } else {
                    None
                }
            }
        }
    }

    /// Get environmental variable pointed by `key`, treating an empty value like a missing one.
    pub fn get_non_empty(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.get_os(key).filter(|value| !value.is_empty())
    }

    /// Same as [`Env::get_non_empty`], converted into a [`PathBuf`].
    pub fn get_path(&self, key: impl AsRef<OsStr>) -> Option<PathBuf> {
        self.get_non_empty(key).map(PathBuf::from)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new_from(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

//! Current user identity.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path};

use crate::os::env::Env;

/// Effective uid of the current process.
#[cfg(unix)]
pub fn current_uid() -> libc::uid_t {
    // SAFETY: `geteuid` takes no arguments and always succeeds.
    unsafe { libc::geteuid() }
}

/// Name of the current user.
///
/// Lookup order: `$USER` from `env` (`$USERNAME` on non-unix), the passwd entry of
/// [`current_uid`], and finally the numeric uid itself, so it never fails on Unix.
///
/// Only names usable as a single path component are accepted: a value with a separator, `.`
/// or `..` is skipped in favour of the next source.
pub fn current_user_name(env: &Env) -> OsString {
    #[cfg(not(unix))]
    let from_env = env
        .get_non_empty("USER")
        .or_else(|| env.get_non_empty("USERNAME"));
    #[cfg(unix)]
    let from_env = env.get_non_empty("USER");

    if let Some(user) = from_env.filter(|user| is_single_component(user)) {
        return user.to_os_string();
    }
    system_user_name()
}

#[cfg(unix)]
fn system_user_name() -> OsString {
    let uid = current_uid();
    passwd_name(uid)
        .filter(|name| is_single_component(name))
        .unwrap_or_else(|| OsString::from(uid.to_string()))
}

#[cfg(not(unix))]
fn system_user_name() -> OsString {
    OsString::new()
}

/// Returns `true` if `name` is exactly one normal path component.
pub fn is_single_component(name: &OsStr) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(component)), None) if component == name
    )
}

#[cfg(unix)]
fn passwd_name(uid: libc::uid_t) -> Option<OsString> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    const MAX_BUFFER: usize = 1 << 16;

    let mut buffer: Vec<libc::c_char> = vec![0; 1024];
    loop {
        let mut passwd = MaybeUninit::<libc::passwd>::uninit();
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        // SAFETY: Every pointer is valid for the duration of the call, and `buffer.len()` is the
        // real size of `buffer`.
        let rc = unsafe {
            libc::getpwuid_r(
                uid,
                passwd.as_mut_ptr(),
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut result,
            )
        };
        if rc == libc::ERANGE && buffer.len() < MAX_BUFFER {
            let doubled = buffer.len() * 2;
            buffer.resize(doubled, 0);
            continue;
        }
        if rc != 0 || result.is_null() {
            return None;
        }
        // SAFETY: `result` is non-null, so it points to `passwd`, whose `pw_name` is a
        // NUL-terminated string stored inside `buffer`, which is still alive.
        let name = unsafe { CStr::from_ptr((*result).pw_name) };
        return Some(OsStr::from_bytes(name.to_bytes()).to_os_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_variable_wins() {
        let env: Env = [("USER", "alice")].into_iter().collect();
        assert_eq!(current_user_name(&env), OsString::from("alice"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_user_falls_back_to_something() {
        let env: Env = [("USER", "")].into_iter().collect();
        assert!(!current_user_name(&env).is_empty());
    }

    #[test]
    fn single_component_names() {
        assert!(is_single_component(OsStr::new("alice")));
        assert!(is_single_component(OsStr::new("first.last")));
        assert!(!is_single_component(OsStr::new("x/../../victim")));
        assert!(!is_single_component(OsStr::new("a/b")));
        assert!(!is_single_component(OsStr::new("a/")));
        assert!(!is_single_component(OsStr::new("/root")));
        assert!(!is_single_component(OsStr::new("..")));
        assert!(!is_single_component(OsStr::new(".")));
        assert!(!is_single_component(OsStr::new("")));
    }

    #[cfg(unix)]
    #[test]
    fn user_with_separators_is_skipped() {
        let env: Env = [("USER", "x/../../victim")].into_iter().collect();
        let name = current_user_name(&env);
        assert_ne!(name, OsString::from("x/../../victim"));
        assert!(is_single_component(&name));

        let env: Env = [("USER", "..")].into_iter().collect();
        assert!(is_single_component(&current_user_name(&env)));
    }
}

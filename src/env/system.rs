use std::{borrow::Cow, ffi::{OsStr, OsString}, sync::Mutex};

use tracing::debug;

use super::{Env, GetEnv};

/// Accessing the environment is not thread safe, but the std::env::*
/// functions aren't marked as unsafe. This mutex only serializes code going
/// through [`SystemEnv`], not other code touching the environment.
#[cfg(not(target_family = "windows"))]
static MUTEX: Mutex<()> = Mutex::new(());

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv();

pub const SYSTEM_ENV: SystemEnv = SystemEnv();

impl SystemEnv {
    #[inline]
    pub fn new() -> Self {
        Self()
    }
}

#[inline]
fn cut_null(value: &OsStr) -> Cow<'_, OsStr> {
    if !value.as_encoded_bytes().contains(&0) {
        return Cow::from(value);
    }
    let lossy = value.to_string_lossy();
    let head = lossy.split('\0').next().unwrap_or_default();
    Cow::from(OsString::from(head))
}

impl GetEnv for SystemEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        if key.is_empty() {
            return None;
        }

        #[cfg(not(target_family = "windows"))]
        let _lock = MUTEX.lock();

        std::env::var_os(key).map(Cow::from)
    }
}

impl Env for SystemEnv {
    fn set(&mut self, key: &OsStr, value: &OsStr) -> bool {
        // std::env::set_var panics on these instead of reporting an error
        let key = cut_null(key);
        if key.is_empty() || key.as_encoded_bytes().contains(&b'=') {
            debug!("refusing to set illegal variable name {key:?}");
            return false;
        }
        let value = cut_null(value);

        #[cfg(not(target_family = "windows"))]
        let _lock = MUTEX.lock();

        std::env::set_var(&*key, &*value);
        true
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}

pub mod system;
pub mod empty;

use std::{borrow::Cow, collections::HashMap, ffi::{OsStr, OsString}, hash::BuildHasher};

use crate::{options::DEFAULT_PATH, Error, Result};

pub use system::{SystemEnv, SYSTEM_ENV};
pub use empty::EmptyEnv;

pub fn parse_bool(value: &OsStr) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

/// Read access to a set of environment variables.
pub trait GetEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>>;

    #[inline]
    fn get_config_path(&self) -> Cow<'_, OsStr> {
        self.get("DOTENV_CONFIG_PATH".as_ref())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| {
                Cow::from(OsStr::new(DEFAULT_PATH))
            })
    }

    #[inline]
    fn get_preserve(&self) -> Result<bool> {
        self.get_bool("DOTENV_CONFIG_PRESERVE".as_ref(), false)
    }

    #[inline]
    fn get_strict(&self) -> Result<bool> {
        self.get_bool("DOTENV_CONFIG_STRICT".as_ref(), false)
    }

    fn get_bool(&self, key: &OsStr, default_value: bool) -> Result<bool> {
        if let Some(value) = self.get(key) {
            let value: &OsStr = &value;
            if value.is_empty() {
                return Ok(default_value);
            }

            let Some(value) = parse_bool(value) else {
                return Err(Error::IllegalOption {
                    name: key.to_owned(),
                    value: value.to_owned(),
                });
            };

            Ok(value)
        } else {
            Ok(default_value)
        }
    }
}

/// Read and write access to a set of environment variables.
pub trait Env: GetEnv {
    /// Sets `key` to `value`. Returns `false` if the environment can't hold
    /// `key` and nothing was written.
    fn set(&mut self, key: &OsStr, value: &OsStr) -> bool;
    fn as_get_env(&self) -> &dyn GetEnv;

    /// Sets `key` unless `overwrite` is off and `key` already exists, even
    /// with an empty value. Returns whether the value was written.
    #[inline]
    fn set_var(&mut self, key: &OsStr, value: &OsStr, overwrite: bool) -> bool {
        if !overwrite && self.get(key).is_some() {
            return false;
        }
        self.set(key, value)
    }
}

/// Lookups that consult `env` first and fall back to `parent`.
#[derive(Clone, Copy)]
pub struct Overlay<'a> {
    env: &'a dyn GetEnv,
    parent: &'a dyn GetEnv,
}

impl<'a> Overlay<'a> {
    #[inline]
    pub fn new(env: &'a dyn GetEnv, parent: &'a dyn GetEnv) -> Self {
        Self { env, parent }
    }
}

impl GetEnv for Overlay<'_> {
    #[inline]
    fn get<'b>(&'b self, key: &OsStr) -> Option<Cow<'b, OsStr>> {
        self.env.get(key).or_else(|| self.parent.get(key))
    }
}

impl<T: GetEnv + ?Sized> GetEnv for &T {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        (**self).get(key)
    }
}

impl<T: GetEnv + ?Sized> GetEnv for &mut T {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        (**self).get(key)
    }
}

impl<T: Env + ?Sized> Env for &mut T {
    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        (**self).as_get_env()
    }

    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) -> bool {
        (**self).set(key, value)
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<OsString, OsString, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key).map(Cow::from)
    }
}

impl<BH: BuildHasher> Env for HashMap<OsString, OsString, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) -> bool {
        self.insert(key.to_os_string(), value.to_os_string());
        true
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<String, String, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key.to_string_lossy().as_ref()).map(|value| {
            let value: &OsStr = value.as_ref();
            Cow::from(value)
        })
    }
}

impl<BH: BuildHasher> Env for HashMap<String, String, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) -> bool {
        self.insert(key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned());
        true
    }

    #[inline]
    fn as_get_env(&self) -> &dyn GetEnv {
        self
    }
}

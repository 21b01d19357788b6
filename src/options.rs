use std::{borrow::Cow, collections::HashMap, ffi::{OsStr, OsString}, io::BufRead, path::Path};

use crate::{env::{EmptyEnv, GetEnv, SystemEnv, SYSTEM_ENV}, loader, Env, LoadReport, Result};

bitflags::bitflags! {
    /// Collision policy for names that already exist in the target environment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u8 {
        /// Overwrite existing names.
        const NONE = 0;
        /// Leave existing names alone, even when their value is empty.
        const PRESERVE = 1 << 0;
        const DONT_OVERWRITE = Self::PRESERVE.bits();
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Options<P=&'static str>
where P: AsRef<Path> + Clone {
    /// Don't overwrite existing environment variables.
    pub preserve: bool,

    /// Error on IO errors, ill-formed lines and undefined references instead
    /// of skipping them.
    pub strict: bool,

    pub path: P,
}

pub const DEFAULT_PATH: &str = ".env";
pub const DEFAULT_PRESERVE: bool = false;
pub const DEFAULT_STRICT: bool = false;

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self {
            preserve: DEFAULT_PRESERVE,
            strict: DEFAULT_STRICT,
            path: DEFAULT_PATH,
        }
    }
}

impl<'a> Options<Cow<'a, OsStr>> {
    /// Reads `DOTENV_CONFIG_PATH`, `DOTENV_CONFIG_PRESERVE` and
    /// `DOTENV_CONFIG_STRICT` from `env`.
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let preserve = env.get_preserve()?;
        let strict = env.get_strict()?;
        let path = env.get_config_path();

        Ok(Self { preserve, strict, path })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        Self::try_from(&SYSTEM_ENV)
    }
}

impl<P> Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            preserve: DEFAULT_PRESERVE,
            strict: DEFAULT_STRICT,
            path,
        }
    }

    #[inline]
    pub fn with_flags(path: P, flags: Flags) -> Self {
        Self {
            preserve: flags.contains(Flags::PRESERVE),
            strict: DEFAULT_STRICT,
            path,
        }
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        if self.preserve {
            Flags::PRESERVE
        } else {
            Flags::NONE
        }
    }

    #[inline]
    fn as_path(&self) -> Options<&Path> {
        Options {
            preserve: self.preserve,
            strict: self.strict,
            path: self.path.as_ref(),
        }
    }

    /// Loads the file into the environment of the current process.
    #[inline]
    pub fn load(&self) -> Result<LoadReport> {
        loader::load_file(&mut SystemEnv(), &EmptyEnv(), &self.as_path())
    }

    /// Loads the file into `env`. References are resolved against `env` alone.
    #[inline]
    pub fn load_env(&self, env: &mut impl Env) -> Result<LoadReport> {
        loader::load_file(env, &EmptyEnv(), &self.as_path())
    }

    /// Loads the file into `env`, resolving references and checking for
    /// existing names in `env` and then `parent`.
    #[inline]
    pub fn load_with_parent(&self, env: &mut impl Env, parent: &impl GetEnv) -> Result<LoadReport> {
        loader::load_file(env, parent, &self.as_path())
    }

    #[inline]
    pub fn load_new_with_parent(&self, parent: &impl GetEnv) -> Result<HashMap<OsString, OsString>> {
        let mut env = HashMap::new();
        loader::load_file(&mut env, parent, &self.as_path())?;
        Ok(env)
    }

    /// Loads the file into a new map, using the environment of the current
    /// process as parent. The process environment itself is not modified.
    #[inline]
    pub fn load_new(&self) -> Result<HashMap<OsString, OsString>> {
        self.load_new_with_parent(&SYSTEM_ENV)
    }

    /// Like [`Options::load_with_parent`], but reads from `reader` instead of
    /// opening `path`. `path` is still used in diagnostics.
    #[inline]
    pub fn load_reader(&self, reader: &mut impl BufRead, env: &mut impl Env, parent: &impl GetEnv) -> Result<LoadReport> {
        loader::load_reader(reader, env, parent, &self.as_path())
    }

    #[inline]
    pub fn load_new_with_reader(&self, reader: &mut impl BufRead) -> Result<HashMap<OsString, OsString>> {
        let mut env = HashMap::new();
        loader::load_reader(reader, &mut env, &EmptyEnv(), &self.as_path())?;
        Ok(env)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Builder<P=&'static str>
where P: AsRef<Path> + Clone {
    options: Options<P>,
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Self { options: Options::default() }
    }
}

impl Builder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Builder<Cow<'a, OsStr>> {
    #[inline]
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let options = Options::<Cow<'a, OsStr>>::try_from(env)?;
        Ok(Self { options })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        let options = Options::try_from_env()?;
        Ok(Self { options })
    }
}

impl<P> Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            options: Options::with_path(path)
        }
    }

    #[inline]
    pub fn preserve(mut self, value: bool) -> Self {
        self.options.preserve = value;
        self
    }

    #[inline]
    pub fn strict(mut self, value: bool) -> Self {
        self.options.strict = value;
        self
    }

    #[inline]
    pub fn flags(mut self, value: Flags) -> Self {
        self.options.preserve = value.contains(Flags::PRESERVE);
        self
    }

    pub fn path<NewP>(&self, value: NewP) -> Builder<NewP>
    where NewP: AsRef<Path> + Clone {
        Builder {
            options: Options {
                preserve: self.options.preserve,
                strict: self.options.strict,
                path: value,
            }
        }
    }

    #[inline]
    pub fn options(&self) -> &Options<P> {
        &self.options
    }

    #[inline]
    pub fn into_options(self) -> Options<P> {
        self.options
    }

    #[inline]
    pub fn load(&self) -> Result<LoadReport> {
        self.options.load()
    }

    #[inline]
    pub fn load_env(&self, env: &mut impl Env) -> Result<LoadReport> {
        self.options.load_env(env)
    }

    #[inline]
    pub fn load_with_parent(&self, env: &mut impl Env, parent: &impl GetEnv) -> Result<LoadReport> {
        self.options.load_with_parent(env, parent)
    }

    #[inline]
    pub fn load_new_with_parent(&self, parent: &impl GetEnv) -> Result<HashMap<OsString, OsString>> {
        self.options.load_new_with_parent(parent)
    }

    #[inline]
    pub fn load_new(&self) -> Result<HashMap<OsString, OsString>> {
        self.options.load_new()
    }

    #[inline]
    pub fn load_reader(&self, reader: &mut impl BufRead, env: &mut impl Env, parent: &impl GetEnv) -> Result<LoadReport> {
        self.options.load_reader(reader, env, parent)
    }

    #[inline]
    pub fn load_new_with_reader(&self, reader: &mut impl BufRead) -> Result<HashMap<OsString, OsString>> {
        self.options.load_new_with_reader(reader)
    }
}

impl<P> From<Options<P>> for Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(options: Options<P>) -> Self {
        Self {
            options
        }
    }
}

impl<P> From<Builder<P>> for Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(value: Builder<P>) -> Self {
        value.into_options()
    }
}

//! Load `NAME=value` pairs from a file into the environment.
//!
//! ```text
//! DATABASE_HOST=localhost
//! DATABASE_USERNAME=user
//! DATABASE_PASSWORD="antipasto"
//! DATABASE_URL=postgres://${DATABASE_USERNAME}@${DATABASE_HOST}/app
//! ```
//!
//! Every line is split at its first `=`. One pair of matching `"` or `'`
//! around the value is removed and `${NAME}` references are replaced by the
//! current value of `NAME`, which includes assignments from earlier lines.
//! Lines without `=` and assignments that reference undefined variables are
//! skipped with a diagnostic logged through [`tracing`].
//!
//! By default existing variables are overwritten. Pass [`Flags::PRESERVE`] to
//! keep them.

use std::{ffi::OsStr, path::Path};

use tracing::warn;

pub mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

pub mod env;
pub use env::{Env, GetEnv};

pub mod options;
pub use options::{Builder, Flags, Options};

pub mod parser;
pub use parser::{parse_line, strip_quotes, Assignment, MalformedLine};

pub mod expand;
pub use expand::{expand, Expansion};

pub mod loader;
pub use loader::{load_reader, LoadReport};

use env::SYSTEM_ENV;

#[inline]
pub fn build() -> Builder {
    Builder::new()
}

/// Loads the file named by `DOTENV_CONFIG_PATH` (default `.env`) into the
/// environment of the current process, preserving existing variables if
/// `DOTENV_CONFIG_PRESERVE` is set.
///
/// This never fails. An illegal `DOTENV_CONFIG_*` value is logged and nothing
/// is loaded. `DOTENV_CONFIG_STRICT` is ignored here; use
/// [`Options::try_from_env`] and [`Options::load`] to get errors.
#[inline]
pub fn load() -> LoadReport {
    load_configured(&SYSTEM_ENV)
}

/// Like [`load`], with the `DOTENV_CONFIG_*` variables read from `config`.
pub fn load_configured(config: &impl GetEnv) -> LoadReport {
    let path = config.get_config_path();
    let preserve = match config.get_preserve() {
        Ok(preserve) => preserve,
        Err(err) => {
            warn!("{err}");
            return LoadReport::default();
        }
    };

    let options = Options {
        preserve,
        strict: false,
        path: Path::new(&*path),
    };

    match options.load() {
        Ok(report) => report,
        Err(err) => {
            warn!("{}: {err}", path.to_string_lossy());
            LoadReport::default()
        }
    }
}

/// Loads `path` into the environment of the current process.
///
/// This never fails: a missing file loads nothing, bad lines are logged and
/// skipped.
pub fn load_from(path: impl AsRef<Path>, flags: Flags) -> LoadReport {
    let path = path.as_ref();
    match Options::with_flags(path, flags).load() {
        Ok(report) => report,
        Err(err) => {
            warn!("{}: {err}", path.to_string_lossy());
            LoadReport::default()
        }
    }
}

/// Value of the environment variable `name`, or `default` if it isn't set.
///
/// A variable that is set to the empty string yields the empty string.
#[inline]
pub fn getenv(name: impl AsRef<OsStr>, default: &str) -> String {
    getenv_in(&SYSTEM_ENV, name, default)
}

/// Like [`getenv`], for any environment.
pub fn getenv_in(env: &impl GetEnv, name: impl AsRef<OsStr>, default: &str) -> String {
    match env.get(name.as_ref()) {
        Some(value) => value.to_string_lossy().into_owned(),
        None => default.to_owned(),
    }
}

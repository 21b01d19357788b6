use std::{ffi::OsStr, fs::File, io::{BufRead, BufReader}, path::Path};

use tracing::{debug, trace, warn};

use crate::{env::{Env, GetEnv, Overlay}, expand::expand, parser::parse_line, Error, Options, Result};

/// What a load did, line by line.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct LoadReport {
    /// Lines read from the source.
    pub lines: usize,

    /// Assignments written to the environment.
    pub assigned: usize,

    /// Assignments skipped because the name already existed.
    pub preserved: usize,

    /// Lines without a usable `NAME=` prefix.
    pub malformed: usize,

    /// Assignments dropped because of undefined `${NAME}` references.
    pub unresolved: usize,

    /// Assignments the environment refused, e.g. a name cut to nothing at a
    /// NUL byte.
    pub rejected: usize,
}

impl LoadReport {
    #[inline]
    pub fn skipped(&self) -> usize {
        self.malformed + self.unresolved + self.rejected
    }
}

pub(crate) fn load_file(env: &mut dyn Env, parent: &dyn GetEnv, options: &Options<&Path>) -> Result<LoadReport> {
    let path_str = options.path.to_string_lossy();

    match File::open(options.path) {
        Err(err) => {
            debug!("{path_str}: {err}");
            if options.strict {
                return Err(Error::Io(err));
            }
            Ok(LoadReport::default())
        }
        Ok(file) => {
            load_reader(&mut BufReader::new(file), env, parent, options)
        }
    }
}

/// Reads `NAME=value` lines from `reader` and applies them to `env`.
///
/// `${NAME}` references are looked up in `env` first and then in `parent`,
/// so every assignment is visible to the lines after it. When
/// `options.preserve` is set a name that exists in either is left alone.
///
/// Ill-formed lines and assignments with undefined references are logged and
/// skipped, or returned as the error in strict mode. Nothing is rolled back:
/// lines applied before an error stay applied.
pub fn load_reader(reader: &mut dyn BufRead, env: &mut dyn Env, parent: &dyn GetEnv, options: &Options<&Path>) -> Result<LoadReport> {
    let path_str = options.path.to_string_lossy();
    let overwrite = !options.preserve;
    let mut report = LoadReport::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                warn!("{path_str}:{}: {err}", report.lines + 1);
                if options.strict {
                    return Err(Error::Io(err));
                }
                break;
            }
        }

        report.lines += 1;
        let lineno = report.lines;

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                // convert DOS line endings to Unix
                buf.pop();
            }
        }

        let line = String::from_utf8_lossy(&buf);

        let Ok(assignment) = parse_line(&line) else {
            warn!(lineno, "{path_str}: Ignoring ill-formed assignment on line {lineno}: '{line}'");
            report.malformed += 1;
            if options.strict {
                return Err(Error::MalformedLine { lineno, line: line.into_owned() });
            }
            continue;
        };

        let expansion = {
            let lookup = Overlay::new(env.as_get_env(), parent);
            expand(lineno, assignment.raw_value, &lookup)
        };

        if !expansion.is_ok() {
            warn!(lineno, "{path_str}: Ignoring ill-formed assignment on line {lineno}: '{line}'");
            report.unresolved += 1;
            if options.strict {
                let name = expansion.unresolved.into_iter().next().unwrap_or_default();
                return Err(Error::UnresolvedReference { lineno, name });
            }
            continue;
        }

        let name: &OsStr = assignment.name.as_ref();
        let value: &OsStr = expansion.value.as_ref();

        if !overwrite && Overlay::new(env.as_get_env(), parent).get(name).is_some() {
            debug!(lineno, "{path_str}: {name:?} is already defined and was NOT overwritten");
            report.preserved += 1;
            continue;
        }

        if !env.set(name, value) {
            warn!(lineno, "{path_str}: Ignoring illegal variable name on line {lineno}: {name:?}");
            report.rejected += 1;
            if options.strict {
                return Err(Error::MalformedLine { lineno, line: line.into_owned() });
            }
            continue;
        }

        trace!(lineno, "{path_str}: set {name:?}");
        report.assigned += 1;
    }

    Ok(report)
}

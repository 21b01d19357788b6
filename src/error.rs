use std::ffi::OsString;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrorKind {
    OptionsParseError,
    IOError,
    SyntaxError,
    SubstitutionError,
}

impl std::fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("ill-formed assignment on line {lineno}: '{line}'")]
    MalformedLine { lineno: usize, line: String },

    #[error("variable ${{{name}}} is not defined on line {lineno}")]
    UnresolvedReference { lineno: usize, name: String },

    #[error("option has illegal value: {name:?}={value:?}")]
    IllegalOption { name: OsString, value: OsString },
}

impl Error {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::IOError,
            Error::MalformedLine { .. } => ErrorKind::SyntaxError,
            Error::UnresolvedReference { .. } => ErrorKind::SubstitutionError,
            Error::IllegalOption { .. } => ErrorKind::OptionsParseError,
        }
    }

    /// Line of the source the error was raised for, if it is line-scoped.
    #[inline]
    pub fn lineno(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { lineno, .. } |
            Error::UnresolvedReference { lineno, .. } => Some(*lineno),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

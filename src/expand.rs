use tracing::warn;

use crate::env::GetEnv;

/// Outcome of substituting the `${NAME}` references of one value.
///
/// `value` always holds the buffer as built: resolved references replaced,
/// unresolved ones left as their literal `${NAME}` token.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Expansion {
    pub value: String,
    pub unresolved: Vec<String>,
}

impl Expansion {
    /// `true` iff every reference encountered was resolved.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.unresolved.is_empty()
    }

    #[inline]
    pub fn into_value(self) -> Option<String> {
        if self.is_ok() {
            Some(self.value)
        } else {
            None
        }
    }
}

/// Replaces every `${NAME}` in `raw_value` with the value `env` has for `NAME`.
///
/// A single left to right pass: substituted text is never scanned again. A
/// `${` without a closing `}` ends the scan and the remainder is copied
/// verbatim. Bare `$NAME` is not a reference.
pub fn expand(lineno: usize, raw_value: &str, env: &dyn GetEnv) -> Expansion {
    let mut value = String::with_capacity(raw_value.len());
    let mut unresolved = Vec::new();
    let mut rest = raw_value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len;

        value.push_str(&rest[..start]);

        let name = &rest[start + 2..end];
        match env.get(name.as_ref()) {
            Some(found) => value.push_str(&found.to_string_lossy()),
            None => {
                warn!(lineno, "variable ${{{name}}} is not defined on line {lineno}");
                value.push_str(&rest[start..=end]);
                unresolved.push(name.to_owned());
            }
        }

        rest = &rest[end + 1..];
    }

    value.push_str(rest);

    Expansion { value, unresolved }
}

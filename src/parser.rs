/// One `name=value` pair split out of a line.
///
/// `name` is everything before the first `=`, untrimmed. `raw_value` is
/// everything after it with one layer of matching quotes removed. `${NAME}`
/// references are still in place.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub raw_value: &'a str,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MalformedLine();

impl std::fmt::Display for MalformedLine {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ill-formed assignment, expected NAME=value")
    }
}

impl std::error::Error for MalformedLine {}

/// Splits `line` at its first `=`.
///
/// Fails when there is no `=` or when nothing precedes it.
pub fn parse_line(line: &str) -> Result<Assignment<'_>, MalformedLine> {
    let Some((name, value)) = line.split_once('=') else {
        return Err(MalformedLine());
    };

    if name.is_empty() {
        return Err(MalformedLine());
    }

    Ok(Assignment { name, raw_value: strip_quotes(value) })
}

/// Removes exactly one pair of surrounding `"` or `'` when both ends carry the
/// same quote character. Anything shorter than two characters is returned as-is.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    let len = bytes.len();

    if len < 2 {
        return value;
    }

    let first = bytes[0];
    let last = bytes[len - 1];

    // both are ASCII, so slicing stays on char boundaries
    if first == last && (first == b'"' || first == b'\'') {
        return &value[1..len - 1];
    }

    value
}

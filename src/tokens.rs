//! Token pairing and delimiter stripping
//!
//! Raw arguments are consumed as alternating name/value pairs. A name token
//! must start with a recognized delimiter; delimiters are stripped
//! longest-first so `--` wins over `-`. Both `name value` and `name=value`
//! forms are accepted, and a repeated name overwrites the earlier occurrence.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::declaration::ArgValue;
use crate::error::ArgError;
use crate::registry::Registry;

/// Whether any raw token is exactly a delimiter-prefixed help parameter
pub(crate) fn help_requested(args: &[String], delimiters: &[String], help_parameter: &str) -> bool {
    delimiters
        .iter()
        .map(|delimiter| format!("{delimiter}{help_parameter}"))
        .any(|candidate| args.iter().any(|arg| *arg == candidate))
}

/// Strip the longest matching delimiter prefix from a token
fn strip_delimiter<'a>(token: &'a str, delimiters: &[String]) -> Option<&'a str> {
    delimiters
        .iter()
        .filter(|delimiter| !delimiter.is_empty())
        .filter(|delimiter| token.starts_with(delimiter.as_str()))
        .max_by_key(|delimiter| delimiter.len())
        .map(|delimiter| &token[delimiter.len()..])
}

/// Resolve the user-supplied values: declaration index → converted value
///
/// Completes fully before any assignment happens, so every tokenization and
/// conversion error pre-empts instance mutation.
pub(crate) fn resolve_supplied(
    args: &[String],
    delimiters: &[String],
    registry: &Registry,
) -> Result<FxHashMap<usize, ArgValue>, ArgError> {
    let mut supplied: FxHashMap<usize, ArgValue> = FxHashMap::default();
    let mut tokens = args.iter();

    while let Some(token) = tokens.next() {
        let Some(stripped) = strip_delimiter(token, delimiters) else {
            return Err(ArgError::UnrecognizedToken {
                token: token.clone(),
            });
        };

        // name=value collapses the pair into one token
        let (name, inline_value) = match stripped.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (stripped, None),
        };

        let Some(idx) = registry.lookup(name) else {
            return Err(ArgError::UnrecognizedToken {
                token: token.clone(),
            });
        };

        let raw_value = match inline_value {
            Some(value) => value,
            None => tokens.next().ok_or_else(|| ArgError::MissingValue {
                name: name.to_string(),
            })?,
        };

        let decl = &registry.declarations()[idx];
        let value = decl.kind().parse(raw_value, decl.slot())?;

        // Last occurrence wins
        supplied.insert(idx, value);
    }

    debug!(supplied = supplied.len(), "resolved user-supplied values");
    Ok(supplied)
}

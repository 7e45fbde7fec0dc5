//! Literal `KEY=VALUE` definitions from `--define` or `define = [...]`.

use super::DecodeError;
use crate::models::EnvVar;

/// Parse one literal definition.
///
/// Splits at the first `=`. The key is trimmed and must be a valid variable
/// name; the value is kept verbatim and may be empty or contain further `=`.
pub fn parse_define(raw: &str) -> Result<EnvVar, DecodeError> {
    let (key, value) = raw.split_once('=').ok_or(DecodeError::InvalidDefine)?;
    let key = key.trim();
    if !EnvVar::is_valid_key(key) {
        return Err(DecodeError::InvalidDefine);
    }
    Ok(EnvVar::new(key, value))
}

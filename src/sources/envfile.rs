//! Flat `KEY=VALUE` text format.
//!
//! One variable per line. Lines are trimmed; blank lines and lines starting
//! with `#` are skipped. The value is everything after the first `=`, and
//! both key and value are trimmed of surrounding whitespace.

use super::DecodeError;
use crate::models::EnvVar;

/// Decode flat env text into variables, in line order.
pub fn decode_env_text(raw: &[u8]) -> Result<Vec<EnvVar>, DecodeError> {
    let text = String::from_utf8(raw.to_vec())?;
    let mut vars = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no = idx + 1;
        let (key, value) = line
            .split_once('=')
            .ok_or(DecodeError::InvalidLine { line: line_no })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DecodeError::EmptyKey { line: line_no });
        }
        if !EnvVar::is_valid_key(key) {
            return Err(DecodeError::InvalidKey { entry: line_no });
        }
        vars.push(EnvVar::new(key, value.trim()));
    }

    Ok(vars)
}

/// Serialize variables as `KEY=VALUE\n` lines, in the given order.
pub fn encode_env_text(vars: &[EnvVar]) -> String {
    vars.iter().map(|v| format!("{v}\n")).collect()
}

//! Standard-input decoding, dispatched on [`StdinFormat`].

use serde::Deserialize;

use super::envfile::decode_env_text;
use super::jsonfile::decode_json;
use super::DecodeError;
use crate::models::{EnvVar, StdinFormat};

/// Decode stdin contents according to `format`.
pub fn decode_stdin(format: StdinFormat, raw: &[u8]) -> Result<Vec<EnvVar>, DecodeError> {
    match format {
        StdinFormat::Json => decode_json(raw),
        StdinFormat::Env => decode_env_text(raw),
        StdinFormat::AwsAssumeRole => decode_aws_assume_role(raw),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleResponse {
    credentials: AssumeRoleCredentials,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssumeRoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
}

/// Extract AWS credentials from an `aws sts assume-role` response.
pub fn decode_aws_assume_role(raw: &[u8]) -> Result<Vec<EnvVar>, DecodeError> {
    let response: AssumeRoleResponse =
        serde_json::from_slice(raw).map_err(DecodeError::AwsAssumeRole)?;
    let creds = response.credentials;

    Ok(vec![
        EnvVar::new("AWS_ACCESS_KEY_ID", creds.access_key_id),
        EnvVar::new("AWS_SECRET_ACCESS_KEY", creds.secret_access_key),
        EnvVar::new("AWS_SESSION_TOKEN", creds.session_token),
    ])
}

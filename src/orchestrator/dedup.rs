//! Variable deduplication by key under the overwrite policy.
//!
//! Variables are visited in aggregation order. A repeated key is an
//! overwrite event: `deny` aborts the whole resolution, `warn` logs and
//! keeps the later value, `allow` keeps the later value silently. Any
//! repeat counts, even when the value is unchanged.

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

use crate::models::{EnvVar, OverwritePolicy};

/// A repeated key under the `deny` policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("deny to overwrite `{key}`, `{old_value}` -> `{new_value}`")]
pub struct OverwriteDenied {
    pub key: String,
    pub old_value: String,
    pub new_value: String,
}

/// Collapse `vars` to one entry per key.
///
/// The result keeps first-seen key order, but callers needing a stable
/// presentation should sort by key themselves.
pub fn deduplicate(
    vars: Vec<EnvVar>,
    policy: OverwritePolicy,
) -> Result<IndexMap<String, EnvVar>, OverwriteDenied> {
    let mut resolved: IndexMap<String, EnvVar> = IndexMap::with_capacity(vars.len());

    for var in vars {
        match resolved.entry(var.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(var);
            }
            Entry::Occupied(mut slot) => {
                let old = slot.get();
                match policy {
                    OverwritePolicy::Deny => {
                        return Err(OverwriteDenied {
                            key: var.key,
                            old_value: old.value.clone(),
                            new_value: var.value,
                        });
                    }
                    OverwritePolicy::Warn => {
                        tracing::warn!(
                            key = %var.key,
                            old = %old.value,
                            new = %var.value,
                            "overwrote environment variable"
                        );
                    }
                    OverwritePolicy::Allow => {
                        tracing::debug!(key = %var.key, "overwrote environment variable");
                    }
                }
                slot.insert(var);
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn colors() -> Vec<EnvVar> {
        vec![EnvVar::new("COLOR", "BLUE"), EnvVar::new("COLOR", "ORANGE")]
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, captured.text())
    }

    #[test]
    fn distinct_keys_pass_through() {
        let vars = vec![EnvVar::new("COLOR", "BLUE"), EnvVar::new("MAGIC", "5")];
        let resolved = deduplicate(vars, OverwritePolicy::Deny).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["COLOR"].value, "BLUE");
        assert_eq!(resolved["MAGIC"].value, "5");
    }

    #[test]
    fn deny_rejects_repeated_key() {
        let err = deduplicate(colors(), OverwritePolicy::Deny).unwrap_err();
        assert_eq!(
            err,
            OverwriteDenied {
                key: "COLOR".into(),
                old_value: "BLUE".into(),
                new_value: "ORANGE".into(),
            }
        );
        assert!(err.to_string().contains("COLOR"));
    }

    #[test]
    fn deny_rejects_repeat_with_identical_value() {
        let vars = vec![EnvVar::new("A", "1"), EnvVar::new("A", "1")];
        assert!(deduplicate(vars, OverwritePolicy::Deny).is_err());
    }

    #[test]
    fn warn_keeps_later_value_and_logs() {
        let (resolved, logs) = with_captured_logs(|| deduplicate(colors(), OverwritePolicy::Warn));
        assert_eq!(resolved.unwrap()["COLOR"].value, "ORANGE");
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("overwrote environment variable"), "logs: {logs}");
        assert!(logs.contains("COLOR"), "logs: {logs}");
    }

    #[test]
    fn allow_keeps_later_value_without_warning() {
        let (resolved, logs) =
            with_captured_logs(|| deduplicate(colors(), OverwritePolicy::Allow));
        assert_eq!(resolved.unwrap()["COLOR"].value, "ORANGE");
        assert!(!logs.contains("WARN"), "logs: {logs}");
    }

    #[test]
    fn latest_of_many_repeats_wins() {
        let vars = vec![
            EnvVar::new("A", "1"),
            EnvVar::new("B", "x"),
            EnvVar::new("A", "2"),
            EnvVar::new("A", "3"),
        ];
        let resolved = deduplicate(vars, OverwritePolicy::Allow).unwrap();
        let keys: Vec<_> = resolved.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(resolved["A"].value, "3");
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(deduplicate(Vec::new(), OverwritePolicy::Deny).unwrap().is_empty());
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Toggles that select between file-format variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Street line 1 of a billing address may be empty.
    pub optional_street_validation: bool,
    /// CSV message rows 2 and 3 carry the bill breakdown instead of partner messages.
    pub billing_message_in_csv: bool,
    /// Payer name is printed as "{name}・保護者" and CS files are named by request date.
    pub guardian_payer_name: bool,
    /// Transcode file content to Shift-JIS before upload.
    pub encode_shift_jis: bool,
    /// Normalise text fields to the width each partner expects.
    pub normalize_fields: bool,
    /// Use each partner bank's own record limit for DD files.
    pub partner_bank_record_limit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimits {
    pub max_payments_per_csv: i64,
    pub max_payments_per_txt: i64,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_payments_per_csv: 1000,
            max_payments_per_txt: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket directory for the local backend.
    pub root_dir: PathBuf,
    /// Optional folder every object name is placed under.
    pub upload_folder: Option<String>,
    /// Prefix of download URLs handed back to callers.
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./bucket"),
            upload_folder: None,
            base_url: "file://bucket".to_string(),
        }
    }
}

/// What happens when the upload after a committed file row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFailurePolicy {
    /// Log a warning, report the file as not uploaded, move on.
    #[default]
    BestEffort,
    /// Stop the run with a dependency failure. Earlier commits stay.
    Abort,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub flags: FeatureFlags,
    pub limits: FileLimits,
    pub storage: StorageConfig,
    pub upload_failure_policy: UploadFailurePolicy,
    pub temp_dir: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Minimal config for tests: every flag off, default limits.
    pub fn default_test() -> Self {
        Self {
            storage: StorageConfig {
                root_dir: std::env::temp_dir().join("payreq-test-bucket"),
                upload_folder: None,
                base_url: "https://storage.test".to_string(),
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_config() {
        let config: GeneratorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.limits.max_payments_per_csv, 1000);
        assert_eq!(config.limits.max_payments_per_txt, 2000);
        assert_eq!(config.upload_failure_policy, UploadFailurePolicy::BestEffort);
        assert!(!config.flags.encode_shift_jis);
    }

    #[test]
    fn partial_flags_keep_other_defaults() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{ "flags": { "encode_shift_jis": true }, "upload_failure_policy": "abort" }"#,
        )
        .unwrap();
        assert!(config.flags.encode_shift_jis);
        assert!(!config.flags.normalize_fields);
        assert_eq!(config.upload_failure_policy, UploadFailurePolicy::Abort);
    }
}

//! YAML configuration loading for the server.
//!
//! Loads [`ServiceConfig`] from a YAML file on disk, falling back to
//! defaults when no file is specified. Every field is optional in the
//! file; omitted fields keep their defaults.

use downwatch_core::ServiceConfig;
use std::path::Path;

/// Load a [`ServiceConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<ServiceConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: ServiceConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    /// Helper to write YAML to a temp file and return the handle.
    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_config_full() {
        let yaml = r#"
listen_addr: "127.0.0.1:9000"
dataset_path: "/var/lib/downwatch/uploaded_data.csv"
model_path: "/var/lib/downwatch/model.json"
max_upload_bytes: 1048576
training:
  test_ratio: 0.25
  seed: 7
  max_iterations: 200
"#;
        let f = write_yaml(yaml);
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(
            config.dataset_path,
            PathBuf::from("/var/lib/downwatch/uploaded_data.csv")
        );
        assert_eq!(config.max_upload_bytes, 1048576);
        assert_eq!(config.training.seed, 7);
        assert!((config.training.test_ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_load_config_partial_keeps_defaults() {
        let f = write_yaml("listen_addr: \"127.0.0.1:9000\"\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.dataset_path, PathBuf::from("uploaded_data.csv"));
        assert_eq!(config.training.seed, 42);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let f = write_yaml("not: [valid: yaml: {{{}}}");
        let result = load_config(f.path());
        assert!(result.is_err());
    }
}

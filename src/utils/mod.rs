//! Utility helpers for the feature client.

pub mod logging;

/// Parse a JSON document given inline or as `@path`
pub fn read_json_arg(raw: &str) -> crate::Result<serde_json::Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_string(),
    };

    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_arg_inline() {
        let value = read_json_arg(r#"{"name": "x"}"#).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "x" }));
    }

    #[test]
    fn test_read_json_arg_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feature.json");
        std::fs::write(&path, r#"{"properties": {"name": "Udupi"}}"#).unwrap();

        let value = read_json_arg(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["properties"]["name"], "Udupi");
    }

    #[test]
    fn test_read_json_arg_rejects_garbage() {
        assert!(matches!(
            read_json_arg("not json"),
            Err(crate::FeatureError::Serialization(_))
        ));
        assert!(matches!(
            read_json_arg("@/nonexistent/feature.json"),
            Err(crate::FeatureError::Io(_))
        ));
    }
}

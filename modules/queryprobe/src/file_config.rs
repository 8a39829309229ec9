use anyhow::{Context, Result};
use nl2sql_client::PayloadTemplate;
use std::path::Path;

/// Load the constant request payload from a TOML file.
/// Without a file, or for keys the file omits, built-in defaults apply.
pub fn load_payload_template(path: Option<&Path>) -> Result<PayloadTemplate> {
    let Some(path) = path else {
        return Ok(PayloadTemplate::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload config: {}", path.display()))?;
    parse_payload_template(&content)
        .with_context(|| format!("Failed to parse payload config: {}", path.display()))
}

pub fn parse_payload_template(content: &str) -> Result<PayloadTemplate> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let template = parse_payload_template(
            r#"
            gateway = "gw-prod"
            kb_connector = "sales_kb"

            [model_params]
            model_url = "https://models.example.com/v1"

            [model_params.tuning_params]
            max_tokens = 512
            "#,
        )
        .unwrap();

        assert_eq!(template.gateway, "gw-prod");
        assert_eq!(template.kb_connector, "sales_kb");
        assert_eq!(template.service_provider, "");
        assert_eq!(template.model_params.model_url, "https://models.example.com/v1");
        assert_eq!(template.model_params.tuning_params.max_tokens, 512);
        assert_eq!(template.model_params.tuning_params.top_p, 1.0);
        assert_eq!(template.model_params.tuning_params.stop, "string");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_payload_template("temperature = 0.2").is_err());
    }

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load_payload_template(None).unwrap(), PayloadTemplate::default());
    }

    #[test]
    fn shipped_example_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/payload.toml");
        assert_eq!(
            load_payload_template(Some(&path)).unwrap(),
            PayloadTemplate::default()
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_payload_template(Some(&dir.path().join("payload.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read payload config"));
    }
}

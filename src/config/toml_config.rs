use crate::config::ServerConfig;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::ENV_PLACEHOLDER;
use std::path::Path;

impl ServerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HUBSPOT_ACCESS_TOKEN})，未設定的保留原樣，由驗證階段拒絕
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CRM_URL, DEFAULT_TAGS_URL};
    use crate::utils::validation::Validate;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_str_applies_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
access_token = "pat-crm"
shared_secret = "s3cret"
posts_url = "http://localhost:9000/posts"
"#,
        )
        .unwrap();

        assert_eq!(config.crm_base_url, DEFAULT_CRM_URL);
        assert_eq!(config.tags_url, DEFAULT_TAGS_URL);
        assert_eq!(config.posts_url, "http://localhost:9000/posts");
        assert_eq!(config.max_retries, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_placeholders_are_substituted() {
        std::env::set_var("PORTAL_TEST_TOKEN_SUBST", "pat-from-env");

        let config = ServerConfig::from_toml_str(
            r#"
access_token = "${PORTAL_TEST_TOKEN_SUBST}"
shared_secret = "${PORTAL_TEST_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        assert_eq!(config.access_token(), Some("pat-from-env"));
        assert_eq!(
            config.shared_secret(),
            Some("${PORTAL_TEST_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_unset_secret_placeholder_fails_validation() {
        let config = ServerConfig::from_toml_str(
            r#"
access_token = "pat-crm"
shared_secret = "${PORTAL_TEST_SURELY_UNSET_SECRET}"
"#,
        )
        .unwrap();

        match config.validate() {
            Err(PortalError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "shared_secret");
                assert_eq!(value, "<redacted>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unset_cms_token_placeholder_fails_validation() {
        let config = ServerConfig::from_toml_str(
            r#"
access_token = "pat-crm"
cms_token = "${PORTAL_TEST_SURELY_UNSET_CMS_TOKEN}"
shared_secret = "s3cret"
"#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("max_retries = \"many\"").unwrap_err();
        assert!(matches!(err, PortalError::ConfigError { .. }));
    }

    #[test]
    fn test_resolve_loads_file_and_keeps_cli_switches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portal.toml");
        std::fs::write(
            &path,
            "access_token = \"pat-file\"\nshared_secret = \"file-secret\"\nbind = \"127.0.0.1:8081\"\n",
        )
        .unwrap();

        let cli = ServerConfig::from_toml_str("access_token = \"pat-cli\"").unwrap();
        let cli = ServerConfig {
            config: Some(path.to_string_lossy().into_owned()),
            verbose: true,
            ..cli
        };

        let resolved = cli.resolve().unwrap();

        assert_eq!(resolved.access_token(), Some("pat-file"));
        assert_eq!(resolved.bind, "127.0.0.1:8081");
        assert!(resolved.verbose);
        assert!(resolved.config.is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ServerConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, PortalError::IoError(_)));
    }
}

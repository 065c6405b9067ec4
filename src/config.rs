use crate::error::{EnvloadError, Result};

pub const DEFAULT_ENV: &str = "prd";

/// Region variables, in order of preference.
pub const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Validated inputs of the `envload` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvloadConfig {
    pub env: String,
    pub service_name: String,
}

impl EnvloadConfig {
    pub fn new(env: impl Into<String>, service_name: Option<String>) -> Result<Self> {
        let service_name = service_name
            .filter(|name| !name.is_empty())
            .ok_or(EnvloadError::MissingServiceName)?;

        let env = env.into();
        if env.is_empty() {
            return Err(EnvloadError::MissingEnv);
        }

        Ok(Self { env, service_name })
    }

    /// Name prefix shared by every parameter of this service: `{env}.{service}.`
    pub fn prefix(&self) -> String {
        format!("{}.{}.", self.env, self.service_name)
    }
}

/// Pick the AWS region from the first non-empty region variable.
pub fn resolve_region<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    REGION_VARS
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.is_empty())
        .ok_or(EnvloadError::MissingRegion)
}

/// Region lookup over the process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_requires_service_name() {
        let err = EnvloadConfig::new("prd", None).unwrap_err();
        assert!(matches!(err, EnvloadError::MissingServiceName));
        assert_eq!(err.to_string(), "--service-name is required");

        let err = EnvloadConfig::new("prd", Some(String::new())).unwrap_err();
        assert!(matches!(err, EnvloadError::MissingServiceName));
    }

    #[test]
    fn test_config_requires_env() {
        let err = EnvloadConfig::new("", Some("api".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "--env is required");
    }

    #[test]
    fn test_config_prefix() {
        let config = EnvloadConfig::new(DEFAULT_ENV, Some("myservice".to_string())).unwrap();
        assert_eq!(config.prefix(), "prd.myservice.");
    }

    #[test]
    fn test_resolve_region_prefers_aws_region() {
        let lookup = lookup_from(&[("AWS_REGION", "eu-west-1"), ("AWS_DEFAULT_REGION", "us-east-1")]);
        assert_eq!(resolve_region(lookup).unwrap(), "eu-west-1");
    }

    #[test]
    fn test_resolve_region_falls_back_to_default_region() {
        let lookup = lookup_from(&[("AWS_REGION", ""), ("AWS_DEFAULT_REGION", "ap-northeast-1")]);
        assert_eq!(resolve_region(lookup).unwrap(), "ap-northeast-1");
    }

    #[test]
    fn test_resolve_region_missing() {
        let err = resolve_region(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "AWS region is not found. please set a AWS_DEFAULT_REGION or AWS_REGION"
        );
    }

    #[test]
    #[serial]
    fn test_resolve_region_from_process_env() {
        std::env::remove_var("AWS_REGION");
        std::env::set_var("AWS_DEFAULT_REGION", "us-west-2");

        assert_eq!(resolve_region(process_env).unwrap(), "us-west-2");

        std::env::remove_var("AWS_DEFAULT_REGION");
        assert!(matches!(resolve_region(process_env), Err(EnvloadError::MissingRegion)));
    }
}

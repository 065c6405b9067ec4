use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::types::{ParametersFilter, ParametersFilterKey};
use aws_sdk_ssm::Client;
use tracing::{debug, warn};

use crate::error::EnvloadError;
use crate::loader::{ParameterKey, ParameterPage, ParameterValue};

/// The two parameter-store capabilities the loader needs.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// List one page of parameter names starting with `prefix`.
    async fn describe_parameters(
        &self,
        prefix: &str,
        page_size: i32,
        next_token: Option<String>,
    ) -> Result<ParameterPage>;

    /// Fetch the values of `names` in a single call.
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<Vec<ParameterValue>>;
}

/// [`ParameterStore`] backed by AWS Systems Manager Parameter Store
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load the ambient AWS configuration for `region` and build a client from it.
    pub async fn connect(region: String) -> Result<Self, EnvloadError> {
        debug!(%region, "loading AWS configuration");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;

        if config.credentials_provider().is_none() {
            return Err(EnvloadError::Session(
                "no credentials provider is configured".to_string(),
            ));
        }

        Ok(Self::new(Client::new(&config)))
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn describe_parameters(
        &self,
        prefix: &str,
        page_size: i32,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        let filter = ParametersFilter::builder()
            .key(ParametersFilterKey::Name)
            .values(prefix)
            .build()?;

        let response = self
            .client
            .describe_parameters()
            .filters(filter)
            .max_results(page_size)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(e)))?;

        let keys = response
            .parameters()
            .iter()
            .filter_map(|metadata| metadata.name())
            .map(ParameterKey::from)
            .collect();

        Ok(ParameterPage {
            keys,
            next_token: response.next_token().map(str::to_string),
        })
    }

    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<Vec<ParameterValue>> {
        let response = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(e)))?;

        for name in response.invalid_parameters() {
            warn!(parameter = %name, "parameter could not be retrieved");
        }

        Ok(response
            .parameters()
            .iter()
            .filter_map(|parameter| {
                Some(ParameterValue::new(parameter.name()?, parameter.value()?))
            })
            .collect())
    }
}

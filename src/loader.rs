use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::error::{EnvloadError, Result};
use crate::store::ParameterStore;

/// Results requested per `DescribeParameters` call
pub const PAGE_SIZE: i32 = 50;

/// Names accepted by a single `GetParameters` call
pub const BATCH_SIZE: usize = 10;

/// Fully-qualified parameter name, `{env}.{service}.{VARIABLE}` by convention
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterKey(String);

impl ParameterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ParameterKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for ParameterKey {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved parameter; `value` is already decrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    pub name: String,
    pub value: String,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Last dot-separated segment of the name
    pub fn variable_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// One page of a prefix listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterPage {
    pub keys: Vec<ParameterKey>,
    pub next_token: Option<String>,
}

pub type Batch = Vec<ParameterKey>;

/// Discovers, batches and resolves the parameters of one service.
pub struct ParameterLoader<S> {
    store: S,
}

impl<S: ParameterStore> ParameterLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the whole pipeline: discover, batch, resolve.
    pub async fn load(&self, env: &str, service_name: &str) -> Result<Vec<ParameterValue>> {
        let keys = self.discover(env, service_name).await?;
        let batches = batch(&keys, BATCH_SIZE);
        debug!(keys = keys.len(), batches = batches.len(), "discovered parameters");

        self.resolve(&batches).await
    }

    /// List every key under `{env}.{service_name}.`, following continuation tokens.
    pub async fn discover(&self, env: &str, service_name: &str) -> Result<Vec<ParameterKey>> {
        let prefix = format!("{}.{}.", env, service_name);
        let mut keys = Vec::new();
        let mut next_token = None;
        let mut page = 0;

        loop {
            page += 1;
            let response = self
                .store
                .describe_parameters(&prefix, PAGE_SIZE, next_token)
                .await
                .map_err(|source| EnvloadError::Listing {
                    prefix: prefix.clone(),
                    page,
                    source,
                })?;

            debug!(page, count = response.keys.len(), "listed parameter page");
            keys.extend(response.keys);

            // An empty token means the same as no token.
            match response.next_token.filter(|token| !token.is_empty()) {
                Some(token) => next_token = Some(token),
                None => return Ok(keys),
            }
        }
    }

    /// Fetch decrypted values batch by batch. The first failure discards everything.
    pub async fn resolve(&self, batches: &[Batch]) -> Result<Vec<ParameterValue>> {
        let mut values = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let names: Vec<String> = batch.iter().map(|key| key.as_str().to_string()).collect();
            let fetched = match self.store.get_parameters(&names, true).await {
                Ok(fetched) => fetched,
                Err(source) => {
                    return Err(EnvloadError::Retrieval {
                        batch: index,
                        names,
                        source,
                    })
                }
            };

            debug!(batch = index, count = fetched.len(), "resolved parameter batch");
            values.extend(fetched);
        }

        Ok(values)
    }
}

/// Split `keys` into contiguous groups of at most `size`, keeping order.
/// A `size` of zero is treated as one.
pub fn batch(keys: &[ParameterKey], size: usize) -> Vec<Batch> {
    keys.chunks(size.max(1)).map(<[ParameterKey]>::to_vec).collect()
}

/// Write one `export NAME=value` line per value.
pub fn render<W: Write>(values: &[ParameterValue], out: &mut W) -> std::io::Result<()> {
    for value in values {
        writeln!(out, "export {}={}", value.variable_name(), value.value)?;
    }
    out.flush()
}

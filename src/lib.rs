//! Container initialization helpers.
//!
//! `envload` reads every SSM parameter named `{env}.{service}.{VARIABLE}` and
//! prints it as `export VARIABLE=value`, ready for an entrypoint to `eval`.

use std::future::Future;
use std::io::Write;

use tracing::info;

pub mod config;
pub mod error;
pub mod loader;
pub mod store;

pub use config::{process_env, resolve_region, EnvloadConfig, DEFAULT_ENV};
pub use error::{EnvloadError, Result};
pub use loader::{batch, render, ParameterKey, ParameterLoader, ParameterValue, BATCH_SIZE};
pub use store::{ParameterStore, SsmParameterStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source revision, injected at build time through `SHIPINIT_REVISION`
pub const REVISION: &str = match option_env!("SHIPINIT_REVISION") {
    Some(revision) => revision,
    None => "unknown",
};

/// Resolve the region, connect, load every parameter of the service and write
/// the export lines to `out`. Returns how many parameters were exported.
///
/// `connect` is only called once the region is known.
pub async fn envload<L, C, F, S, W>(
    config: &EnvloadConfig,
    lookup: L,
    connect: C,
    out: &mut W,
) -> Result<usize>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(String) -> F,
    F: Future<Output = Result<S>>,
    S: ParameterStore,
    W: Write,
{
    let region = resolve_region(lookup)?;
    let store = connect(region).await?;

    let loader = ParameterLoader::new(store);
    let values = loader.load(&config.env, &config.service_name).await?;
    render(&values, out)?;

    info!(
        count = values.len(),
        prefix = %config.prefix(),
        "exported parameters"
    );
    Ok(values.len())
}

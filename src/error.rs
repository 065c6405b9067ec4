use thiserror::Error;

/// Everything that can stop an `envload` run. All of them are terminal.
#[derive(Debug, Error)]
pub enum EnvloadError {
    #[error("--service-name is required")]
    MissingServiceName,

    #[error("--env is required")]
    MissingEnv,

    #[error("AWS region is not found. please set a AWS_DEFAULT_REGION or AWS_REGION")]
    MissingRegion,

    #[error("failed to establish AWS session: {0}")]
    Session(String),

    #[error("failed to list parameters under '{prefix}' (page {page})")]
    Listing {
        prefix: String,
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to get parameters for batch {batch} [{}]", names.join(", "))]
    Retrieval {
        batch: usize,
        names: Vec<String>,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write exports")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EnvloadError>;

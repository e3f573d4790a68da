//! Error types shared across the scheduler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("network error: {0}")]
    NetworkError(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

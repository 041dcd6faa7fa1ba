use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a snapshot run. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load kubeconfig '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: kube::config::KubeconfigError,
    },

    #[error("failed to construct cluster client: {0}")]
    ClientConstruction(#[source] kube::Error),

    #[error("failed to list {listing}: {source}")]
    Cluster {
        listing: Listing,
        #[source]
        source: kube::Error,
    },
}

/// Which of the two snapshot listings failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Pods,
    PodMetrics,
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Listing::Pods => f.write_str("pods"),
            Listing::PodMetrics => f.write_str("pod metrics (is metrics-server installed?)"),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use std::path::PathBuf;

use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_KUBECONFIG: &str = "./config";

/* ============================= INPUT ============================= */

/// Which namespaces the caller asked for, before the kubeconfig is read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceScope {
    /// Whatever namespace the selected kubeconfig context points at.
    #[default]
    Default,
    Named(String),
    All,
}

impl NamespaceScope {
    /// An empty `--namespace` means the context default.
    pub fn from_flags(namespace: Option<String>, all_namespaces: bool) -> Self {
        if all_namespaces {
            return NamespaceScope::All;
        }
        match namespace {
            Some(ns) if !ns.trim().is_empty() => NamespaceScope::Named(ns.trim().to_string()),
            _ => NamespaceScope::Default,
        }
    }
}

/// Everything needed to reach the cluster, passed explicitly down the call chain.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kubeconfig: PathBuf,
    pub context: Option<String>,
    pub namespace: NamespaceScope,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kubeconfig: PathBuf::from(DEFAULT_KUBECONFIG),
            context: None,
            namespace: NamespaceScope::Default,
        }
    }
}

/* ============================= RESOLVED ============================= */

/// The namespace selection after the context default has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Namespace(String),
    AllNamespaces,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Namespace(ns) => f.write_str(ns),
            Target::AllNamespaces => f.write_str("*"),
        }
    }
}

pub fn resolve_target(scope: &NamespaceScope, context_default: &str) -> Target {
    match scope {
        NamespaceScope::All => Target::AllNamespaces,
        NamespaceScope::Named(ns) => Target::Namespace(ns.clone()),
        NamespaceScope::Default if context_default.is_empty() => {
            Target::Namespace("default".to_string())
        }
        NamespaceScope::Default => Target::Namespace(context_default.to_string()),
    }
}

pub struct LoadedConfig {
    pub kube: kube::Config,
    pub target: Target,
}

impl LoadedConfig {
    pub fn client(&self) -> Result<kube::Client> {
        kube::Client::try_from(self.kube.clone()).map_err(Error::ClientConstruction)
    }
}

/* ============================= LOADING ============================= */

/// Read the kubeconfig file and resolve the target namespace.
///
/// A missing file, malformed YAML, or an unknown `--context` all surface as
/// [`Error::Config`].
pub async fn load(conn: &ConnectionConfig) -> Result<LoadedConfig> {
    let config_error = |source| Error::Config {
        path: conn.kubeconfig.clone(),
        source,
    };

    info!(path = %conn.kubeconfig.display(), "loading_kubeconfig");

    let kubeconfig = Kubeconfig::read_from(&conn.kubeconfig).map_err(config_error)?;

    let options = KubeConfigOptions {
        context: conn.context.clone(),
        ..Default::default()
    };
    let kube = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(config_error)?;

    let target = resolve_target(&conn.namespace, &kube.default_namespace);
    debug!(cluster = %kube.cluster_url, namespace = %target, "kubeconfig_loaded");

    Ok(LoadedConfig { kube, target })
}

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use kube_podtop::config::{ConnectionConfig, DEFAULT_KUBECONFIG, NamespaceScope};
use kube_podtop::render::OutputFormat;
use kube_podtop::snapshot::ContainerMode;

#[derive(Parser, Debug)]
#[command(name = "kube-podtop")]
#[command(about = "Snapshot of pod CPU and memory usage against requests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to the kubeconfig file
    #[arg(long, alias = "kubeConfig", default_value = DEFAULT_KUBECONFIG)]
    pub kubeconfig: PathBuf,

    /// Namespace to report on (defaults to the context namespace)
    #[arg(short = 'n', long, conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// Report on pods in every namespace
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    pub context: Option<String>,

    /// One row per container instead of per pod
    #[arg(long)]
    pub per_container: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            namespace: NamespaceScope::from_flags(self.namespace.clone(), self.all_namespaces),
        }
    }

    pub fn container_mode(&self) -> ContainerMode {
        if self.per_container {
            ContainerMode::PerContainer
        } else {
            ContainerMode::Aggregate
        }
    }
}

/// Accept the single-dash long flags older scripts pass (`-kubeConfig`, `-namespace`).
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str().and_then(legacy_to_long) {
            Some(fixed) => OsString::from(fixed),
            None => arg,
        })
        .collect()
}

fn legacy_to_long(arg: &str) -> Option<String> {
    let flag = arg.split_once('=').map_or(arg, |(f, _)| f);
    match flag {
        "-kubeConfig" | "-kubeconfig" | "-namespace" => Some(format!("-{arg}")),
        _ => None,
    }
}

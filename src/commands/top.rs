use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use kube_podtop::config::{self, Target};
use kube_podtop::snapshot::{self, JoinOptions};
use kube_podtop::{cluster, render};

use crate::cli::Cli;

/// Take one snapshot of the target namespace and print the usage report.
///
/// Any failure before rendering aborts the run; nothing is printed to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let loaded = config::load(&cli.connection())
        .await
        .context("Failed to load kube config")?;

    let client = loaded
        .client()
        .context("Failed to build Kubernetes client from kubeconfig")?;

    let taken = cluster::snapshot(&client, &loaded.target)
        .await
        .context("Failed to query the cluster. Check connectivity and RBAC permissions.")?;
    let taken_at = Local::now();

    let options = JoinOptions {
        containers: cli.container_mode(),
        qualify_namespace: loaded.target == Target::AllNamespaces,
    };
    let report = snapshot::join(&taken.pods, &taken.metrics, options);

    info!(
        namespace = %loaded.target,
        rows = report.rows.len(),
        unmatched_metrics = report.unmatched_metrics.len(),
        "snapshot_joined"
    );

    let output = render::render(&report, &loaded.target, &taken_at, cli.output)?;
    println!("{output}");

    Ok(())
}

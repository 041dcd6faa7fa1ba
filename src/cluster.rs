use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::Target;
use crate::error::{Error, Listing, Result};
use crate::metrics::PodMetrics;

/// Both listings taken for a single run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub pods: Vec<Pod>,
    pub metrics: Vec<PodMetrics>,
}

fn api_for<K>(client: Client, target: &Target) -> Api<K>
where
    K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    <K as kube::Resource>::DynamicType: Default,
{
    match target {
        Target::Namespace(ns) => Api::namespaced(client, ns),
        Target::AllNamespaces => Api::all(client),
    }
}

async fn list<K>(api: Api<K>, listing: Listing) -> Result<Vec<K>>
where
    K: kube::Resource + Clone + DeserializeOwned + std::fmt::Debug,
{
    let list = api
        .list(&ListParams::default())
        .await
        .map_err(|source| Error::Cluster { listing, source })?;
    Ok(list.items)
}

pub async fn list_pods(client: Client, target: &Target) -> Result<Vec<Pod>> {
    let pods = list(api_for::<Pod>(client, target), Listing::Pods).await?;
    info!(namespace = %target, count = pods.len(), "pods_listed");
    Ok(pods)
}

pub async fn list_pod_metrics(client: Client, target: &Target) -> Result<Vec<PodMetrics>> {
    let metrics = list(api_for::<PodMetrics>(client, target), Listing::PodMetrics).await?;
    info!(namespace = %target, count = metrics.len(), "pod_metrics_listed");
    Ok(metrics)
}

/// Issue both listings concurrently. Either failure fails the snapshot.
pub async fn snapshot(client: &Client, target: &Target) -> Result<Snapshot> {
    let (pods, metrics) = futures::try_join!(
        list_pods(client.clone(), target),
        list_pod_metrics(client.clone(), target),
    )?;
    Ok(Snapshot { pods, metrics })
}

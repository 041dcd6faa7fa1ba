use std::collections::{HashMap, HashSet};

use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::metrics::{ContainerMetrics, PodMetrics};
use crate::quantity::{ParsedQuantity, QuantityError, format_mebibytes, format_milli_cpu};

/// Shown when a pod has no metrics entry (not yet scraped, or metrics-server lagging).
pub const UNKNOWN: &str = "unknown";
/// Shown when a quantity could not be parsed.
pub const INVALID: &str = "invalid";
/// Shown when nothing is declared or measured for a column.
pub const NOT_SET: &str = "-";

/* ============================= TYPES ============================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerMode {
    /// One row per pod, container values summed.
    #[default]
    Aggregate,
    /// One row per container, named `pod/container`.
    PerContainer,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JoinOptions {
    pub containers: ContainerMode,
    /// Prefix pod names with their namespace (used when listing all namespaces).
    pub qualify_namespace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[tabled(rename = "No")]
    pub index: usize,
    #[tabled(rename = "Pod Name")]
    pub pod_name: String,
    #[tabled(rename = "CPU Request")]
    pub cpu_request: String,
    #[tabled(rename = "CPU Usage")]
    pub cpu_usage: String,
    #[tabled(rename = "Memory Request")]
    pub memory_request: String,
    #[tabled(rename = "Memory Usage")]
    pub memory_usage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// Metrics entries whose pod was not in the pod listing, as `namespace/name`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched_metrics: Vec<String>,
}

/* ============================= RESOURCES ============================= */

#[derive(Debug, Clone, Copy)]
enum ResourceKind {
    Cpu,
    Memory,
}

impl ResourceKind {
    fn key(self) -> &'static str {
        match self {
            ResourceKind::Cpu => "cpu",
            ResourceKind::Memory => "memory",
        }
    }

    fn usage(self, container: &ContainerMetrics) -> &Quantity {
        match self {
            ResourceKind::Cpu => &container.usage.cpu,
            ResourceKind::Memory => &container.usage.memory,
        }
    }

    fn request(self, container: &Container) -> Option<&Quantity> {
        container.resources.as_ref()?.requests.as_ref()?.get(self.key())
    }

    /// Sum the quantities and render them in display units.
    fn total(self, quantities: &[&Quantity]) -> Result<String, QuantityError> {
        match self {
            ResourceKind::Cpu => {
                let mut milli: i64 = 0;
                for q in quantities {
                    let value = ParsedQuantity::from_quantity(q)?.milli_value()?;
                    milli = milli
                        .checked_add(value)
                        .ok_or_else(|| QuantityError::Overflow(q.0.clone()))?;
                }
                Ok(format_milli_cpu(milli))
            }
            ResourceKind::Memory => {
                let mut bytes = 0.0;
                for q in quantities {
                    bytes += ParsedQuantity::from_quantity(q)?.as_f64()?;
                    if !bytes.is_finite() {
                        return Err(QuantityError::Overflow(q.0.clone()));
                    }
                }
                Ok(format_mebibytes(bytes))
            }
        }
    }
}

fn render_usage(kind: ResourceKind, containers: &[&ContainerMetrics], pod: &str) -> String {
    if containers.is_empty() {
        return NOT_SET.to_string();
    }
    let quantities: Vec<&Quantity> = containers.iter().map(|c| kind.usage(c)).collect();
    kind.total(&quantities).unwrap_or_else(|e| {
        warn!(pod = %pod, resource = kind.key(), error = %e, "invalid_usage_quantity");
        INVALID.to_string()
    })
}

/// A single declared request is shown as written; several are summed.
fn render_request(kind: ResourceKind, containers: &[&Container], pod: &str) -> String {
    let declared: Vec<&Quantity> = containers.iter().filter_map(|c| kind.request(c)).collect();
    match declared.as_slice() {
        [] => NOT_SET.to_string(),
        [only] => only.0.clone(),
        many => kind.total(many).unwrap_or_else(|e| {
            warn!(pod = %pod, resource = kind.key(), error = %e, "invalid_request_quantity");
            INVALID.to_string()
        }),
    }
}

/* ============================= JOIN ============================= */

type PodKey = (String, String);

fn pod_key(meta: &ObjectMeta) -> PodKey {
    (
        meta.namespace.clone().unwrap_or_default(),
        meta.name.clone().unwrap_or_default(),
    )
}

fn display_name(key: &PodKey, qualify: bool) -> String {
    if qualify && !key.0.is_empty() {
        format!("{}/{}", key.0, key.1)
    } else {
        key.1.clone()
    }
}

/// Join the pod listing with the metrics listing by `(namespace, name)`.
///
/// Rows follow pod listing order and are numbered from 1. A pod without a
/// metrics entry gets [`UNKNOWN`] usage. Metrics without a matching pod are
/// reported in [`Report::unmatched_metrics`] and produce no row.
pub fn join(pods: &[Pod], metrics: &[PodMetrics], options: JoinOptions) -> Report {
    let mut by_pod: HashMap<PodKey, &PodMetrics> = HashMap::with_capacity(metrics.len());
    for m in metrics {
        by_pod.entry(pod_key(&m.metadata)).or_insert(m);
    }

    let mut rows = Vec::with_capacity(pods.len());
    let mut seen: HashSet<PodKey> = HashSet::with_capacity(pods.len());

    for pod in pods {
        let key = pod_key(&pod.metadata);
        let name = display_name(&key, options.qualify_namespace);
        let containers: Vec<&Container> = pod
            .spec
            .as_ref()
            .map(|s| s.containers.iter().collect())
            .unwrap_or_default();
        let usage = by_pod.get(&key).copied();

        match options.containers {
            ContainerMode::Aggregate => {
                rows.push(pod_row(rows.len() + 1, name, &containers, usage));
            }
            ContainerMode::PerContainer if containers.is_empty() => {
                rows.push(pod_row(rows.len() + 1, name, &containers, usage));
            }
            ContainerMode::PerContainer => {
                for container in &containers {
                    rows.push(container_row(rows.len() + 1, &name, container, usage));
                }
            }
        }

        seen.insert(key);
    }

    let mut unmatched_metrics = Vec::new();
    for m in metrics {
        let key = pod_key(&m.metadata);
        if !seen.contains(&key) {
            let label = display_name(&key, true);
            warn!(pod = %label, "metrics_without_pod");
            unmatched_metrics.push(label);
        }
    }

    Report {
        rows,
        unmatched_metrics,
    }
}

fn pod_row(
    index: usize,
    pod_name: String,
    containers: &[&Container],
    usage: Option<&PodMetrics>,
) -> ReportRow {
    let (cpu_usage, memory_usage) = match usage {
        Some(m) => {
            let measured: Vec<&ContainerMetrics> = m.containers.iter().collect();
            (
                render_usage(ResourceKind::Cpu, &measured, &pod_name),
                render_usage(ResourceKind::Memory, &measured, &pod_name),
            )
        }
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    ReportRow {
        index,
        cpu_request: render_request(ResourceKind::Cpu, containers, &pod_name),
        memory_request: render_request(ResourceKind::Memory, containers, &pod_name),
        cpu_usage,
        memory_usage,
        pod_name,
    }
}

fn container_row(
    index: usize,
    pod_name: &str,
    container: &Container,
    usage: Option<&PodMetrics>,
) -> ReportRow {
    let name = format!("{pod_name}/{}", container.name);
    let measured = usage.and_then(|m| m.containers.iter().find(|c| c.name == container.name));

    let (cpu_usage, memory_usage) = match measured {
        Some(c) => (
            render_usage(ResourceKind::Cpu, &[c], &name),
            render_usage(ResourceKind::Memory, &[c], &name),
        ),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    ReportRow {
        index,
        cpu_request: render_request(ResourceKind::Cpu, &[container], &name),
        memory_request: render_request(ResourceKind::Memory, &[container], &name),
        cpu_usage,
        memory_usage,
        pod_name: name,
    }
}

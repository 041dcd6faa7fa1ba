use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_podtop::metrics::{ContainerMetrics, ContainerUsage, PodMetrics};

/// `(container name, cpu request, memory request)`
pub type ContainerRequest<'a> = (&'a str, Option<&'a str>, Option<&'a str>);

/// `(container name, cpu usage, memory usage)`
pub type ContainerUse<'a> = (&'a str, &'a str, &'a str);

fn meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn make_test_pod(name: &str, namespace: &str, containers: &[ContainerRequest]) -> Pod {
    let containers = containers
        .iter()
        .map(|(c, cpu, memory)| {
            let mut requests = BTreeMap::new();
            if let Some(cpu) = cpu {
                requests.insert("cpu".to_string(), Quantity(cpu.to_string()));
            }
            if let Some(memory) = memory {
                requests.insert("memory".to_string(), Quantity(memory.to_string()));
            }
            Container {
                name: c.to_string(),
                image: Some("nginx:1.25".to_string()),
                resources: Some(ResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                ..Default::default()
            }
        })
        .collect();

    Pod {
        metadata: meta(name, namespace),
        spec: Some(PodSpec {
            containers,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Single-container pod with both requests declared.
#[allow(dead_code)]
pub fn make_simple_pod(name: &str, cpu: &str, memory: &str) -> Pod {
    make_test_pod(name, "default", &[("main", Some(cpu), Some(memory))])
}

#[allow(dead_code)]
pub fn make_test_metrics(name: &str, namespace: &str, containers: &[ContainerUse]) -> PodMetrics {
    PodMetrics {
        metadata: meta(name, namespace),
        timestamp: Some("2026-10-15T09:30:00Z".to_string()),
        window: Some("15s".to_string()),
        containers: containers
            .iter()
            .map(|(c, cpu, memory)| ContainerMetrics {
                name: c.to_string(),
                usage: ContainerUsage {
                    cpu: Quantity(cpu.to_string()),
                    memory: Quantity(memory.to_string()),
                },
            })
            .collect(),
    }
}

/// Single-container metrics matching [`make_simple_pod`].
#[allow(dead_code)]
pub fn make_simple_metrics(name: &str, cpu: &str, memory: &str) -> PodMetrics {
    make_test_metrics(name, "default", &[("main", cpu, memory)])
}

mod common;

use common::{make_simple_metrics, make_simple_pod, make_test_metrics, make_test_pod};
use kube_podtop::snapshot::{self, ContainerMode, JoinOptions, NOT_SET, ReportRow, UNKNOWN};

// ══════════════════════════════════════════════════════════════════
// Snapshot join tests (no cluster required)
//
// Each test builds pod and pod-metrics listings the way the API server
// returns them and checks the rows the report is rendered from.
// ══════════════════════════════════════════════════════════════════

fn row(index: usize, name: &str, cpu_req: &str, cpu: &str, mem_req: &str, mem: &str) -> ReportRow {
    ReportRow {
        index,
        pod_name: name.to_string(),
        cpu_request: cpu_req.to_string(),
        cpu_usage: cpu.to_string(),
        memory_request: mem_req.to_string(),
        memory_usage: mem.to_string(),
    }
}

#[test]
fn test_two_pod_scenario() {
    let pods = vec![
        make_simple_pod("web-1", "100m", "200Mi"),
        make_simple_pod("web-2", "200m", "400Mi"),
    ];
    let metrics = vec![
        make_simple_metrics("web-1", "50m", "100Mi"),
        make_simple_metrics("web-2", "150m", "300Mi"),
    ];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(
        report.rows,
        vec![
            row(1, "web-1", "100m", "50m", "200Mi", "100Mi"),
            row(2, "web-2", "200m", "150m", "400Mi", "300Mi"),
        ]
    );
}

#[test]
fn test_rows_numbered_in_pod_listing_order() {
    let names = ["c", "a", "d", "b"];
    let pods: Vec<_> = names.iter().map(|n| make_simple_pod(n, "10m", "1Mi")).collect();
    let metrics: Vec<_> = names.iter().map(|n| make_simple_metrics(n, "1m", "1Mi")).collect();

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    let indices: Vec<usize> = report.rows.iter().map(|r| r.index).collect();
    let order: Vec<&str> = report.rows.iter().map(|r| r.pod_name.as_str()).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(order, names);
}

#[test]
fn test_metrics_order_does_not_matter() {
    let pods = vec![
        make_simple_pod("web-1", "100m", "200Mi"),
        make_simple_pod("web-2", "200m", "400Mi"),
    ];
    let metrics = vec![
        make_simple_metrics("web-2", "150m", "300Mi"),
        make_simple_metrics("web-1", "50m", "100Mi"),
    ];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(report.rows[0].pod_name, "web-1");
    assert_eq!(report.rows[0].cpu_usage, "50m");
    assert_eq!(report.rows[1].pod_name, "web-2");
    assert_eq!(report.rows[1].memory_usage, "300Mi");
}

#[test]
fn test_unit_conversion() {
    let pods = vec![make_simple_pod("web", "250m", "1Mi")];
    let metrics = vec![make_simple_metrics("web", "250m", "1048576")];

    let row = &snapshot::join(&pods, &metrics, JoinOptions::default()).rows[0];

    assert_eq!(row.cpu_usage, "250m");
    assert_eq!(row.memory_usage, "1Mi");
}

#[test]
fn test_byte_count_wider_than_i128() {
    let pods = vec![make_simple_pod("web", "1m", "1Mi")];
    let metrics = vec![make_simple_metrics(
        "web",
        "1m",
        "123456789012345678901234567890123456789012",
    )];

    let row = &snapshot::join(&pods, &metrics, JoinOptions::default()).rows[0];

    assert_ne!(row.memory_usage, "invalid");
    assert!(row.memory_usage.starts_with("11773756886705"), "{}", row.memory_usage);
    assert!(row.memory_usage.ends_with("Mi"));
}

#[test]
fn test_metrics_server_units() {
    let pods = vec![make_simple_pod("web", "0.5", "128Mi")];
    let metrics = vec![make_simple_metrics("web", "12345678n", "24576Ki")];

    let row = &snapshot::join(&pods, &metrics, JoinOptions::default()).rows[0];

    assert_eq!(row.cpu_request, "0.5");
    assert_eq!(row.cpu_usage, "13m");
    assert_eq!(row.memory_usage, "24Mi");
}

#[test]
fn test_join_is_idempotent() {
    let pods = vec![
        make_simple_pod("web-1", "100m", "200Mi"),
        make_test_pod("api", "default", &[("app", Some("1"), None), ("proxy", None, Some("32Mi"))]),
    ];
    let metrics = vec![
        make_simple_metrics("web-1", "50m", "100Mi"),
        make_test_metrics("api", "default", &[("app", "300m", "64Mi"), ("proxy", "5m", "10Mi")]),
    ];

    let first = snapshot::join(&pods, &metrics, JoinOptions::default());
    let second = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(first, second);
}

#[test]
fn test_more_pods_than_metrics() {
    let pods = vec![
        make_simple_pod("web-1", "100m", "200Mi"),
        make_simple_pod("web-2", "200m", "400Mi"),
        make_simple_pod("web-3", "300m", "600Mi"),
    ];
    let metrics = vec![make_simple_metrics("web-2", "150m", "300Mi")];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[0].cpu_usage, UNKNOWN);
    assert_eq!(report.rows[0].memory_usage, UNKNOWN);
    assert_eq!(report.rows[0].cpu_request, "100m");
    assert_eq!(report.rows[1].cpu_usage, "150m");
    assert_eq!(report.rows[2].memory_usage, UNKNOWN);
    assert!(report.unmatched_metrics.is_empty());
}

#[test]
fn test_more_metrics_than_pods() {
    let pods = vec![make_simple_pod("web-1", "100m", "200Mi")];
    let metrics = vec![
        make_simple_metrics("web-1", "50m", "100Mi"),
        make_simple_metrics("deleted-pod", "10m", "10Mi"),
    ];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(report.rows, vec![row(1, "web-1", "100m", "50m", "200Mi", "100Mi")]);
    assert_eq!(report.unmatched_metrics, vec!["default/deleted-pod".to_string()]);
}

#[test]
fn test_empty_listings() {
    let report = snapshot::join(&[], &[], JoinOptions::default());
    assert!(report.rows.is_empty());
    assert!(report.unmatched_metrics.is_empty());
}

#[test]
fn test_zero_container_pod() {
    let pods = vec![
        make_test_pod("hollow", "default", &[]),
        make_simple_pod("web", "100m", "200Mi"),
    ];
    let metrics = vec![
        make_test_metrics("hollow", "default", &[]),
        make_simple_metrics("web", "50m", "100Mi"),
    ];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(report.rows[0], row(1, "hollow", NOT_SET, NOT_SET, NOT_SET, NOT_SET));
    assert_eq!(report.rows[1].index, 2);
}

#[test]
fn test_every_container_counts() {
    let pods = vec![make_test_pod(
        "api",
        "default",
        &[
            ("app", Some("500m"), Some("256Mi")),
            ("proxy", Some("100m"), Some("64Mi")),
            ("log-shipper", Some("50m"), Some("32Mi")),
        ],
    )];
    let metrics = vec![make_test_metrics(
        "api",
        "default",
        &[("app", "420m", "200Mi"), ("proxy", "30m", "40Mi"), ("log-shipper", "5m", "16Mi")],
    )];

    let report = snapshot::join(&pods, &metrics, JoinOptions::default());

    assert_eq!(report.rows, vec![row(1, "api", "650m", "455m", "352Mi", "256Mi")]);
}

#[test]
fn test_per_container_breakdown_across_pods() {
    let pods = vec![
        make_test_pod("api", "default", &[("app", Some("500m"), None), ("proxy", None, None)]),
        make_simple_pod("web", "100m", "200Mi"),
    ];
    let metrics = vec![
        make_test_metrics("api", "default", &[("proxy", "30m", "40Mi"), ("app", "420m", "200Mi")]),
        make_simple_metrics("web", "50m", "100Mi"),
    ];
    let options = JoinOptions {
        containers: ContainerMode::PerContainer,
        ..Default::default()
    };

    let report = snapshot::join(&pods, &metrics, options);

    assert_eq!(
        report.rows,
        vec![
            row(1, "api/app", "500m", "420m", NOT_SET, "200Mi"),
            row(2, "api/proxy", NOT_SET, "30m", NOT_SET, "40Mi"),
            row(3, "web/main", "100m", "50m", "200Mi", "100Mi"),
        ]
    );
}

#[test]
fn test_all_namespaces_keeps_same_named_pods_apart() {
    let pods = vec![
        make_test_pod("web", "prod", &[("main", Some("200m"), Some("256Mi"))]),
        make_test_pod("web", "staging", &[("main", Some("100m"), Some("128Mi"))]),
    ];
    let metrics = vec![
        make_test_metrics("web", "staging", &[("main", "10m", "20Mi")]),
        make_test_metrics("web", "prod", &[("main", "90m", "180Mi")]),
    ];
    let options = JoinOptions {
        qualify_namespace: true,
        ..Default::default()
    };

    let report = snapshot::join(&pods, &metrics, options);

    assert_eq!(
        report.rows,
        vec![
            row(1, "prod/web", "200m", "90m", "256Mi", "180Mi"),
            row(2, "staging/web", "100m", "10m", "128Mi", "20Mi"),
        ]
    );
}

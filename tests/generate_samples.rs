//! End-to-end generation runs against a mocked KernelCI instance

mod common;

use common::{
    BOOT_JSON, BUILD_JSON, LAVA_JSON, NON_LAVA_LAB, file_names, mock_config, mount_builds,
    mount_lavas, mount_storage_file,
};
use kci_samples::error::{EXIT_SAMPLES_DIR, EXIT_SOURCE};
use kci_samples::source::KernelCiSource;
use kci_samples::{CategoryCounts, Persister, generate_samples, run};
use wiremock::MockServer;

fn setup(server: &MockServer, samples_dir: &std::path::Path) -> (kci_samples::Config, Persister, KernelCiSource) {
    let config = mock_config(server, samples_dir);
    let persister = Persister::from_config(&config);
    let source = KernelCiSource::from_config(&config, persister.session().clone()).unwrap();
    (config, persister, source)
}

#[tokio::test]
async fn full_run_saves_lavas_builds_and_boots() {
    let server = MockServer::start().await;
    mount_lavas(
        &server,
        &[
            ("l1", "lab-collabora", "rk3288-veyron-jaq"),
            ("l2", NON_LAVA_LAB, "beaglebone-black"),
        ],
    )
    .await;
    mount_builds(&server, &["b1", "b2"]).await;

    mount_storage_file(&server, "lab-collabora/lava-json-rk3288-veyron-jaq.json", 200, LAVA_JSON).await;
    mount_storage_file(&server, &format!("{NON_LAVA_LAB}/boot-beaglebone-black.json"), 200, BOOT_JSON).await;
    mount_storage_file(&server, "b1/build.json", 200, BUILD_JSON).await;
    mount_storage_file(&server, "b2/build.json", 500, "").await;

    let temp = tempfile::tempdir().unwrap();
    let samples_dir = temp.path().join("samples");
    let (config, persister, source) = setup(&server, &samples_dir);

    let summary = generate_samples(&config, &source, &persister).await.unwrap();

    assert_eq!(summary.lavas, CategoryCounts { saved: 1, failed: 0 });
    assert_eq!(summary.boots, CategoryCounts { saved: 1, failed: 0 });
    assert_eq!(summary.builds, CategoryCounts { saved: 1, failed: 1 });

    assert_eq!(
        file_names(&samples_dir),
        vec!["boot_l2.json", "build_b1.json", "lava_l1.json"]
    );
    assert_eq!(
        std::fs::read_to_string(samples_dir.join("boot_l2.json")).unwrap(),
        BOOT_JSON
    );
    assert_eq!(
        std::fs::read_to_string(samples_dir.join("build_b1.json")).unwrap(),
        BUILD_JSON
    );
}

#[tokio::test]
async fn boot_failures_are_counted_apart_from_lava_failures() {
    let server = MockServer::start().await;
    mount_lavas(
        &server,
        &[
            ("l1", "lab-collabora", "missing-board"),
            ("l2", NON_LAVA_LAB, "missing-board"),
        ],
    )
    .await;
    mount_builds(&server, &[]).await;

    let temp = tempfile::tempdir().unwrap();
    let (config, persister, source) = setup(&server, temp.path());

    let summary = generate_samples(&config, &source, &persister).await.unwrap();

    assert_eq!(summary.lavas, CategoryCounts { saved: 0, failed: 1 });
    assert_eq!(summary.boots, CategoryCounts { saved: 0, failed: 1 });
    assert_eq!(summary.builds, CategoryCounts::default());
    assert!(file_names(temp.path()).is_empty());
}

#[tokio::test]
async fn run_reports_source_failure() {
    // Nothing mounted: the API answers 404
    let server = MockServer::start().await;

    let temp = tempfile::tempdir().unwrap();
    let (config, persister, source) = setup(&server, temp.path());

    assert_eq!(run(&config, &source, &persister).await, EXIT_SOURCE);
    assert!(file_names(temp.path()).is_empty());
}

#[tokio::test]
async fn run_reports_unusable_samples_dir_before_querying() {
    let server = MockServer::start().await;

    let temp = tempfile::tempdir().unwrap();
    let blocked = temp.path().join("samples");
    std::fs::write(&blocked, b"occupied").unwrap();
    let (config, persister, source) = setup(&server, &blocked);

    assert_eq!(run(&config, &source, &persister).await, EXIT_SAMPLES_DIR);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

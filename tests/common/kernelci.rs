//! Mock KernelCI API and storage backed by wiremock

use kci_samples::Config;
use serde_json::{Value, json};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Marker of the lab that only publishes boot logs in these tests
pub const NON_LAVA_LAB: &str = "lab-baylibre-seattle";

/// Storage prefix shared by every mocked record
pub const RESOURCE: &str = "mainline/master/v5.6/arm/multi_v7_defconfig/gcc-8";

/// Mount `GET /build` returning one record per id
pub async fn mount_builds(server: &MockServer, ids: &[&str]) {
    let result: Vec<Value> = ids
        .iter()
        .map(|id| json!({"_id": {"$oid": id}, "file_server_resource": format!("{RESOURCE}/{id}")}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/build"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "count": result.len(),
            "result": result,
        })))
        .mount(server)
        .await;
}

/// Mount `GET /test/group` returning one record per `(id, lab, device)`
pub async fn mount_lavas(server: &MockServer, records: &[(&str, &str, &str)]) {
    let result: Vec<Value> = records
        .iter()
        .map(|(id, lab, device)| {
            json!({
                "_id": {"$oid": id},
                "file_server_resource": RESOURCE,
                "lab_name": lab,
                "device_type": device,
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/test/group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "count": result.len(),
            "result": result,
        })))
        .mount(server)
        .await;
}

/// Mount a storage file under `/storage/{RESOURCE}/{rest}`
pub async fn mount_storage_file(server: &MockServer, rest: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/storage/{RESOURCE}/{rest}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Config pointing at the mock server and writing into `samples_dir`
pub fn mock_config(server: &MockServer, samples_dir: &Path) -> Config {
    let mut config = Config {
        samples_dir: samples_dir.to_path_buf(),
        sample_size: 5,
        non_lava_lab: NON_LAVA_LAB.to_string(),
        ..Default::default()
    };
    config.kernelci.api_url = format!("{}/api", server.uri());
    config.kernelci.storage_url = format!("{}/storage", server.uri());
    config
}

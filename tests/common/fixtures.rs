//! Sample payloads served by the mock storage

/// Minimal `build.json` as published by KernelCI storage
pub const BUILD_JSON: &str = r#"{
  "job": "mainline",
  "git_branch": "master",
  "kernel": "v5.6",
  "arch": "arm64",
  "defconfig_full": "defconfig",
  "build_environment": "gcc-8",
  "status": "PASS"
}"#;

/// Minimal `lava-json-<device>.json`
pub const LAVA_JSON: &str = r#"{
  "lab_name": "lab-collabora",
  "device_type": "rk3288-veyron-jaq",
  "status": "Complete",
  "results": {"lava": [{"name": "job", "result": "pass"}]}
}"#;

/// Minimal `boot-<device>.json` from a lab without LAVA output
pub const BOOT_JSON: &str = r#"{
  "lab_name": "lab-baylibre-seattle",
  "board": "beaglebone-black",
  "boot_result": "PASS"
}"#;

/// Sorted file names inside a directory
pub fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

//! Tests for loading mimird configuration files from disk.

#![cfg(feature = "server")]

use std::io::Write;

use mimir::server::config::Config;
use mimir::{Device, ModelSource};

#[test]
fn load_explicit_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
address = "0.0.0.0:8000"
public_url = "https://abc123.tunnel.example"

[server.limits]
max_text_chars = 512

[model]
model_path = "/opt/models/sst2.onnx"
tokenizer_path = "/opt/models/tokenizer.json"
labels = ["NEGATIVE", "POSITIVE"]
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.address, "0.0.0.0:8000");
    assert_eq!(
        config.server.public_url.as_deref(),
        Some("https://abc123.tunnel.example")
    );
    assert_eq!(config.server.limits.max_text_chars, Some(512));
    assert_eq!(
        config.model.source().unwrap(),
        ModelSource::local("/opt/models/sst2.onnx", "/opt/models/tokenizer.json")
    );
    assert_eq!(config.model.device().unwrap(), Device::Cpu);
}

#[test]
fn empty_config_file_uses_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.address, "127.0.0.1:8000");
    assert_eq!(config.model.source().unwrap(), ModelSource::default());
}

#[test]
fn invalid_toml_is_a_configuration_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\naddress = ").unwrap();

    let err = Config::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
    assert!(matches!(err, mimir::MimirError::Configuration(_)));
}

#[test]
fn unknown_device_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[model]\ndevice = \"tpu\"").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert!(config.model.device().is_err());
}

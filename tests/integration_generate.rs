//! Integration tests for the full generation pipeline
//!
//! These tests drive `generator::run` against real temporary directories and
//! verify the end-to-end contract: filtered replication, per-instance
//! settings derivation, script generation and the aggregate pm2 artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use instance_forge::config::{GeneratorConfig, InstanceSpec};
use instance_forge::generator;
use tempfile::TempDir;

const BASE_TEMPLATE: &str = r#"{
    "App": {"ClientId": "0", "EmpresaId": 0},
    "ConnectionStrings": {"Pyxoom42": "base-connection"},
    "RabbitMQ": {"Channel": "base", "HostName": "localhost"},
    "Serilog": {
        "WriteTo": [{
            "Name": "Logger",
            "Args": {
                "configure": [
                    {"Name": "File", "Args": {"path": "C:\\logs\\app-.log"}}
                ]
            }
        }],
        "Properties": {"Application": "base"}
    }
}"#;

fn instance(name: &str, folder: &str, connection: &str) -> InstanceSpec {
    InstanceSpec {
        instance_name: name.to_string(),
        folder_name: folder.to_string(),
        client_id: "9".to_string(),
        log_path: format!("/var/log/pyxoom/{}", folder),
        pyxoom_interactive_url: format!("https://{}.example.com/signin", folder),
        pyxoom_interactive_public_privacy: format!("https://{}.example.com/privacy", folder),
        pyxoom_connection_string: connection.to_string(),
        external_pyxoom_services_api_url: format!("https://api-{}.example.com/", folder),
        rabbit_mq_channel: format!("pyxoom_{}", folder),
        empresa_id: 5,
        description: format!("{} description", name),
        custom_settings: BTreeMap::new(),
    }
}

struct Fixture {
    _temp: TempDir,
    config: GeneratorConfig,
}

impl Fixture {
    fn new(instances: Vec<InstanceSpec>) -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("publish");
        fs::create_dir_all(source.join("runtimes/linux-x64")).unwrap();
        fs::create_dir_all(source.join("logs")).unwrap();
        fs::write(source.join("Pyxoom-Rabbit.exe"), b"\x4d\x5a\x90").unwrap();
        fs::write(source.join("readme.txt"), "hello").unwrap();
        fs::write(source.join("runtimes/linux-x64/native.so"), b"\x7fELF").unwrap();
        fs::write(source.join("logs/app.log"), "old log").unwrap();
        fs::write(source.join("appsettings.json"), "{}").unwrap();

        let template = temp.path().join("appsettings.base.json");
        fs::write(&template, BASE_TEMPLATE).unwrap();

        let config = GeneratorConfig {
            source_path: source.to_string_lossy().into_owned(),
            output_base_path: temp.path().join("instances").to_string_lossy().into_owned(),
            base_app_settings_path: template.to_string_lossy().into_owned(),
            instances,
            copy_additional_files: vec![],
            exclude_files: vec!["logs".to_string(), "appsettings.json".to_string()],
        };

        Fixture {
            _temp: temp,
            config,
        }
    }

    fn output_root(&self) -> &Path {
        Path::new(&self.config.output_base_path)
    }

    fn settings(&self, folder: &str) -> serde_json::Value {
        let path = self.output_root().join(folder).join("appsettings.json");
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }
}

#[test]
fn test_two_instances_get_distinct_connection_strings() {
    let fixture = Fixture::new(vec![
        instance("Client A", "client-a", "conn-a"),
        instance("Client B", "client-b", "conn-b"),
    ]);

    let report = generator::run(&fixture.config).unwrap();

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.total(), 2);

    let a = fixture.settings("client-a");
    let b = fixture.settings("client-b");
    assert_eq!(a["ConnectionStrings"]["Pyxoom42"], "conn-a");
    assert_eq!(b["ConnectionStrings"]["Pyxoom42"], "conn-b");
    assert_ne!(
        a["ConnectionStrings"]["Pyxoom42"],
        b["ConnectionStrings"]["Pyxoom42"]
    );
}

#[test]
fn test_instances_never_observe_each_others_patches() {
    let mut first = instance("Client A", "client-a", "conn-a");
    first
        .custom_settings
        .insert("Bleed:Marker".to_string(), "from-a".to_string());
    let second = instance("Client B", "client-b", "conn-b");

    let fixture = Fixture::new(vec![first, second]);
    generator::run(&fixture.config).unwrap();

    let b = fixture.settings("client-b");
    assert!(b.get("Bleed").is_none());
}

#[test]
fn test_excluded_directories_and_files_are_absent() {
    let fixture = Fixture::new(vec![instance("Client A", "client-a", "conn-a")]);

    generator::run(&fixture.config).unwrap();

    let root = fixture.output_root().join("client-a");
    assert!(!root.join("logs").exists());
    assert!(root.join("readme.txt").is_file());
    assert!(root.join("runtimes/linux-x64/native.so").is_file());
    // The source's own appsettings.json is excluded; the one present is the
    // freshly derived document, not a copy.
    let settings = fixture.settings("client-a");
    assert_eq!(settings["ConnectionStrings"]["Pyxoom42"], "conn-a");
}

#[test]
fn test_serilog_sinks_point_at_instance_log_directory() {
    let fixture = Fixture::new(vec![instance("Client A", "client-a", "conn-a")]);

    generator::run(&fixture.config).unwrap();

    let settings = fixture.settings("client-a");
    assert_eq!(
        settings["Serilog"]["WriteTo"][0]["Args"]["configure"][0]["Args"]["path"],
        "/var/log/pyxoom/client-a/app-.log"
    );
    assert_eq!(
        settings["Serilog"]["Properties"]["Application"],
        "Pyxoom.Analytix.Queue.Client A"
    );
}

#[test]
fn test_custom_settings_win_and_create_sections() {
    let mut spec = instance("Client A", "client-a", "conn-a");
    spec.custom_settings
        .insert("RabbitMQ:Channel".to_string(), "forced-channel".to_string());
    spec.custom_settings
        .insert("NewSection:NewKey".to_string(), "v".to_string());
    let fixture = Fixture::new(vec![spec]);

    generator::run(&fixture.config).unwrap();

    let settings = fixture.settings("client-a");
    assert_eq!(settings["RabbitMQ"]["Channel"], "forced-channel");
    assert_eq!(settings["NewSection"]["NewKey"], "v");
}

#[test]
fn test_duplicate_folder_names_abort_with_no_side_effects() {
    let fixture = Fixture::new(vec![
        instance("Client A", "same", "conn-a"),
        instance("Client B", "same", "conn-b"),
    ]);

    let result = generator::run(&fixture.config);

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("duplicate folderName"));
    assert!(!fixture.output_root().exists());
}

#[test]
fn test_run_twice_is_idempotent_for_settings() {
    let fixture = Fixture::new(vec![instance("Client A", "client-a", "conn-a")]);

    generator::run(&fixture.config).unwrap();
    let first = fs::read_to_string(
        fixture
            .output_root()
            .join("client-a")
            .join("appsettings.json"),
    )
    .unwrap();

    generator::run(&fixture.config).unwrap();
    let second = fs::read_to_string(
        fixture
            .output_root()
            .join("client-a")
            .join("appsettings.json"),
    )
    .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_additional_paths_copied_and_missing_reported() {
    let mut fixture = Fixture::new(vec![instance("Client A", "client-a", "conn-a")]);
    let source = Path::new(&fixture.config.source_path);
    fs::create_dir_all(source.join("Content/css")).unwrap();
    fs::write(source.join("Content/css/site.css"), "body{}").unwrap();
    fixture.config.copy_additional_files =
        vec!["Content".to_string(), "does-not-exist.txt".to_string()];

    let report = generator::run(&fixture.config).unwrap();

    assert_eq!(report.succeeded_count(), 1);
    assert!(fixture
        .output_root()
        .join("client-a/Content/css/site.css")
        .is_file());
    assert!(!fixture
        .output_root()
        .join("client-a/does-not-exist.txt")
        .exists());
}

#[test]
fn test_pm2_artifacts_cover_every_instance() {
    let fixture = Fixture::new(vec![
        instance("Client A", "client-a", "conn-a"),
        instance("Client B", "client-b", "conn-b"),
    ]);

    generator::run(&fixture.config).unwrap();

    let txt = fs::read_to_string(fixture.output_root().join("pm2-commands.txt")).unwrap();
    assert!(txt.contains("pm2 stop \"Client A\""));
    assert!(txt.contains("pm2 start"));
    assert!(txt.contains("pm2 delete \"Client B\""));
    assert!(txt.contains("--instances 4"));

    let bat = fs::read_to_string(fixture.output_root().join("pm2-start-all.bat")).unwrap();
    assert!(bat.contains("Processing instance: Client A"));
    assert!(bat.contains("Processing instance: Client B"));

    assert!(fixture.output_root().join("pm2-start-all.ps1").is_file());
}

#[test]
fn test_startup_scripts_written_per_instance() {
    let fixture = Fixture::new(vec![instance("Client A", "client-a", "conn-a")]);

    generator::run(&fixture.config).unwrap();

    let root = fixture.output_root().join("client-a");
    let bat = fs::read_to_string(root.join("start-client-a.bat")).unwrap();
    assert!(bat.contains("Instance: Client A"));
    assert!(bat.contains("set QUEUE_NAME=pyxoom_client-a"));
    assert!(root.join("start-client-a.ps1").is_file());
}

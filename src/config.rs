//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `instances-config.json` generator configuration, as well as the logic for
//! parsing and validating it.
//!
//! ## Key Components
//!
//! - **`GeneratorConfig`**: one per run — where the build output lives, where
//!   instances are written, which settings template they derive from, the
//!   exclusion and always-copy lists, and the instance descriptors.
//! - **`InstanceSpec`**: one per generated instance — identity, routing and
//!   connection fields consumed by the settings patcher, plus an optional map
//!   of free-form colon-delimited overrides.
//!
//! The on-disk format is JSON with camelCase keys, matching the config files
//! operators already maintain for this tool. Both structs are immutable after
//! load as far as the core is concerned.
//!
//! ## Validation
//!
//! `GeneratorConfig::validate` performs the pre-flight checks that must pass
//! before any filesystem mutation: required paths present, source directory
//! and base template exist, at least one instance, non-empty instance and
//! folder names, and pairwise-distinct folder names.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};

/// Descriptor for a single tenant instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    /// Display name, used in scripts, logs and the process manager.
    #[serde(default)]
    pub instance_name: String,

    /// Destination folder name under the output root. Must be unique across
    /// all instances.
    #[serde(default)]
    pub folder_name: String,

    /// Client identifier written into the settings document.
    #[serde(default)]
    pub client_id: String,

    /// Directory the instance's file log sinks are redirected to.
    #[serde(default)]
    pub log_path: String,

    /// Tenant sign-in URL.
    #[serde(default)]
    pub pyxoom_interactive_url: String,

    /// Tenant privacy-page URL.
    #[serde(default)]
    pub pyxoom_interactive_public_privacy: String,

    /// Primary database connection string.
    #[serde(default)]
    pub pyxoom_connection_string: String,

    /// Base URL of the external services API.
    #[serde(default)]
    pub external_pyxoom_services_api_url: String,

    /// Message queue/channel name for this instance.
    #[serde(default, rename = "rabbitMQChannel")]
    pub rabbit_mq_channel: String,

    /// Numeric organization identifier.
    #[serde(default)]
    pub empresa_id: i64,

    /// Free-form description shown in generated scripts.
    #[serde(default)]
    pub description: String,

    /// Free-form overrides: colon-delimited key path to literal string value,
    /// applied after the structural overrides. Keys are unique; a BTreeMap
    /// keeps application order deterministic.
    #[serde(default)]
    pub custom_settings: BTreeMap<String, String>,
}

/// One run's worth of generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Directory holding the compiled build output to replicate.
    #[serde(default)]
    pub source_path: String,

    /// Root directory instances are generated under.
    #[serde(default)]
    pub output_base_path: String,

    /// Path to the base settings template every instance derives from.
    #[serde(default)]
    pub base_app_settings_path: String,

    /// Instance descriptors, processed in order.
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,

    /// Files or directories copied into every instance unconditionally,
    /// bypassing the exclusion-aware walk.
    #[serde(default)]
    pub copy_additional_files: Vec<String>,

    /// Exclusion patterns (basename or path-suffix) for the replication walk.
    #[serde(default)]
    pub exclude_files: Vec<String>,
}

impl GeneratorConfig {
    /// Pre-flight validation. Any failure here aborts the run before a
    /// single directory or file is created.
    pub fn validate(&self) -> Result<()> {
        if self.source_path.is_empty() {
            return Err(invalid("sourcePath must not be empty"));
        }
        if self.output_base_path.is_empty() {
            return Err(invalid("outputBasePath must not be empty"));
        }
        if self.base_app_settings_path.is_empty() {
            return Err(invalid("baseAppSettingsPath must not be empty"));
        }

        if !Path::new(&self.source_path).is_dir() {
            return Err(invalid(&format!(
                "source directory does not exist: {}",
                self.source_path
            )));
        }
        if !Path::new(&self.base_app_settings_path).is_file() {
            return Err(invalid(&format!(
                "base settings template does not exist: {}",
                self.base_app_settings_path
            )));
        }

        if self.instances.is_empty() {
            return Err(invalid("no instances defined"));
        }

        let mut folder_names = HashSet::new();
        for instance in &self.instances {
            if instance.instance_name.is_empty() {
                return Err(invalid("instanceName must not be empty"));
            }
            if instance.folder_name.is_empty() {
                return Err(invalid(&format!(
                    "folderName must not be empty for instance: {}",
                    instance.instance_name
                )));
            }
            if !folder_names.insert(instance.folder_name.as_str()) {
                return Err(invalid(&format!(
                    "duplicate folderName: {}",
                    instance.folder_name
                )));
            }
        }

        Ok(())
    }

    /// A fully populated example configuration, written out when the user
    /// runs the tool without a config file.
    pub fn example() -> Self {
        Self {
            source_path: "/opt/pyxoom-rabbit/publish".to_string(),
            output_base_path: "/opt/pyxoom-instances".to_string(),
            base_app_settings_path: "/opt/pyxoom-rabbit/appsettings.json".to_string(),
            copy_additional_files: vec![
                "Content".to_string(),
                "start-app.bat".to_string(),
                "start-app.ps1".to_string(),
            ],
            exclude_files: vec![
                "appsettings.json".to_string(),
                "appsettings.Development.json".to_string(),
            ],
            instances: vec![
                InstanceSpec {
                    instance_name: "Client 1 - Production".to_string(),
                    folder_name: "client1-prod".to_string(),
                    client_id: "1".to_string(),
                    log_path: "/var/log/pyxoom/client1".to_string(),
                    pyxoom_interactive_url:
                        "https://client1.pyxoomdemo.com/Interactive42/Home/SignInToken".to_string(),
                    pyxoom_interactive_public_privacy:
                        "https://client1.pyxoomdemo.com/Interactive42/PublicPrivacy/Index"
                            .to_string(),
                    pyxoom_connection_string:
                        "Data Source=server1;Database=Pyxoom42_Client1;User ID=user1;Password=pass1;"
                            .to_string(),
                    external_pyxoom_services_api_url: "https://api-client1.pyxoomdemo.com/"
                        .to_string(),
                    rabbit_mq_channel: "pyxoom_client1".to_string(),
                    empresa_id: 1,
                    description: "Production instance for Client 1".to_string(),
                    custom_settings: BTreeMap::from([
                        (
                            "RabbitMQ:HostName".to_string(),
                            "rabbit-client1.example.com".to_string(),
                        ),
                        (
                            "ExternalServices:NodeAppUrl".to_string(),
                            "http://node-client1:8001/".to_string(),
                        ),
                    ]),
                },
                InstanceSpec {
                    instance_name: "Client 2 - Development".to_string(),
                    folder_name: "client2-dev".to_string(),
                    client_id: "2".to_string(),
                    log_path: "/var/log/pyxoom/client2".to_string(),
                    pyxoom_interactive_url:
                        "https://dev-client2.pyxoomdemo.com/Interactive42/Home/SignInToken"
                            .to_string(),
                    pyxoom_interactive_public_privacy:
                        "https://dev-client2.pyxoomdemo.com/Interactive42/PublicPrivacy/Index"
                            .to_string(),
                    pyxoom_connection_string:
                        "Data Source=server2;Database=Pyxoom42_Client2_Dev;User ID=user2;Password=pass2;"
                            .to_string(),
                    external_pyxoom_services_api_url: "https://dev-api-client2.pyxoomdemo.com/"
                        .to_string(),
                    rabbit_mq_channel: "pyxoom_client2_dev".to_string(),
                    empresa_id: 2,
                    description: "Development instance for Client 2".to_string(),
                    custom_settings: BTreeMap::new(),
                },
            ],
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::ConfigInvalid {
        message: message.to_string(),
    }
}

/// Parse a generator configuration from a JSON string.
pub fn parse(json_content: &str) -> Result<GeneratorConfig> {
    serde_json::from_str(json_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some("the config file must be a JSON object with camelCase keys".to_string()),
    })
}

/// Load and parse a generator configuration from a file.
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

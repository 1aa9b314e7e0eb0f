//! Instance generation orchestration
//!
//! `run` drives one whole generation pass: validate the configuration (fatal
//! before any filesystem mutation), create the output root, then process
//! each instance in descriptor order — replicate the build tree, copy the
//! always-copy extras, derive and write the settings document, write the
//! startup scripts. A failure in one instance is recorded in its report and
//! processing continues with the next.
//!
//! After all instances, the aggregate pm2 artifacts are generated
//! best-effort; a failure there is carried in the report as a warning and
//! does not change per-instance counts.
//!
//! Execution is sequential and single-threaded. Nothing is shared for
//! mutation across instances (the base template is re-read per instance),
//! and a partially generated instance is left in place, never rolled back.

use log::{error, info};
use std::fs;
use std::path::Path;

use crate::config::{GeneratorConfig, InstanceSpec};
use crate::error::{Error, Result};
use crate::replicate::{self, CopyOutcome};
use crate::scripts;
use crate::settings;

/// File name of the settings document written into every instance.
pub const SETTINGS_FILE_NAME: &str = "appsettings.json";

/// What happened while generating one instance.
#[derive(Debug)]
pub struct InstanceReport {
    /// Display name of the instance.
    pub instance_name: String,
    /// Destination folder name under the output root.
    pub folder_name: String,
    /// Per-entry copy decisions, in traversal order.
    pub copy_outcomes: Vec<CopyOutcome>,
    /// The error that failed this instance, if any.
    pub error: Option<Error>,
}

impl InstanceReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one generation run.
#[derive(Debug)]
pub struct RunReport {
    /// One report per instance descriptor, in processing order.
    pub instances: Vec<InstanceReport>,
    /// Error from the best-effort pm2 artifact step, if it failed.
    pub pm2_error: Option<Error>,
}

impl RunReport {
    pub fn succeeded_count(&self) -> usize {
        self.instances.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.instances.len() - self.succeeded_count()
    }

    pub fn total(&self) -> usize {
        self.instances.len()
    }
}

/// Run the full generation pass for `config`.
///
/// Returns an error only for fatal pre-flight problems (invalid
/// configuration, output root creation); per-instance and pm2 failures are
/// recorded in the returned report.
pub fn run(config: &GeneratorConfig) -> Result<RunReport> {
    config.validate()?;

    let output_root = Path::new(&config.output_base_path);
    fs::create_dir_all(output_root)?;

    info!(
        "generating {} instance(s) from {} into {}",
        config.instances.len(),
        config.source_path,
        config.output_base_path
    );

    let mut reports = Vec::with_capacity(config.instances.len());
    for instance in &config.instances {
        let mut report = InstanceReport {
            instance_name: instance.instance_name.clone(),
            folder_name: instance.folder_name.clone(),
            copy_outcomes: Vec::new(),
            error: None,
        };

        match generate_instance(config, instance, &mut report.copy_outcomes) {
            Ok(()) => info!("instance '{}' generated", instance.instance_name),
            Err(e) => {
                error!("instance '{}' failed: {}", instance.instance_name, e);
                report.error = Some(e);
            }
        }
        reports.push(report);
    }

    let pm2_error = scripts::write_pm2_artifacts(output_root, &config.instances).err();
    if let Some(e) = &pm2_error {
        log::warn!("could not generate pm2 command artifacts: {}", e);
    }

    Ok(RunReport {
        instances: reports,
        pm2_error,
    })
}

/// The per-instance pipeline: replicate → extras → settings → scripts.
fn generate_instance(
    config: &GeneratorConfig,
    instance: &InstanceSpec,
    copy_outcomes: &mut Vec<CopyOutcome>,
) -> Result<()> {
    let source_root = Path::new(&config.source_path);
    let instance_dir = Path::new(&config.output_base_path).join(&instance.folder_name);

    let wrap_copy = |e: Error| Error::Copy {
        instance: instance.instance_name.clone(),
        message: e.to_string(),
    };

    copy_outcomes.extend(
        replicate::replicate(source_root, &instance_dir, &config.exclude_files)
            .map_err(wrap_copy)?,
    );
    copy_outcomes.extend(
        replicate::copy_extras(source_root, &instance_dir, &config.copy_additional_files)
            .map_err(wrap_copy)?,
    );

    let settings_path = Path::new(&config.base_app_settings_path);
    let rendered = settings::render(settings_path, instance)?;
    fs::write(instance_dir.join(SETTINGS_FILE_NAME), rendered)?;

    scripts::write_startup_scripts(&instance_dir, instance)?;
    Ok(())
}

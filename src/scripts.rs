//! Generated startup and process-manager scripts
//!
//! Two kinds of artifacts are produced. Per instance, a pair of startup
//! scripts (`start-<folder>.bat` and `start-<folder>.ps1`) that print the
//! instance's configuration, export the queue name, and launch the
//! application executable. Once per run, three aggregate pm2 artifacts in
//! the output root: a readable command list and two start-all scripts (one
//! per shell dialect).
//!
//! Script content is plain string substitution over the instance fields; the
//! interesting policy (what inputs are available) lives in the orchestrator.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::InstanceSpec;
use crate::error::{Error, Result};

/// Name of the application executable each instance runs.
pub const EXECUTABLE_NAME: &str = "Pyxoom-Rabbit.exe";

/// Worker count passed to `pm2 start`.
const PM2_WORKER_COUNT: u32 = 4;

/// Write the per-instance startup scripts into the instance directory.
pub fn write_startup_scripts(instance_dir: &Path, instance: &InstanceSpec) -> Result<()> {
    let bat = format!(
        r#"@echo off
echo Starting Pyxoom-Rabbit - Instance: {name}
echo Description: {description}
echo.
echo Configuration:
echo - Client ID: {client_id}
echo - Empresa ID: {empresa_id}
echo - RabbitMQ Channel: {channel}
echo - Log Path: {log_path}
echo.
echo Press any key to continue...
pause > nul

set QUEUE_NAME={channel}
{exe}

echo.
echo The application has exited.
pause
"#,
        name = instance.instance_name,
        description = instance.description,
        client_id = instance.client_id,
        empresa_id = instance.empresa_id,
        channel = instance.rabbit_mq_channel,
        log_path = instance.log_path,
        exe = EXECUTABLE_NAME,
    );

    let ps1 = format!(
        r#"# Startup script for Pyxoom-Rabbit - Instance: {name}
# Description: {description}

Write-Host "Starting Pyxoom-Rabbit - Instance: {name}" -ForegroundColor Green
Write-Host "Description: {description}" -ForegroundColor Yellow
Write-Host ""
Write-Host "Configuration:" -ForegroundColor Cyan
Write-Host "- Client ID: {client_id}" -ForegroundColor White
Write-Host "- Empresa ID: {empresa_id}" -ForegroundColor White
Write-Host "- RabbitMQ Channel: {channel}" -ForegroundColor White
Write-Host "- Log Path: {log_path}" -ForegroundColor White
Write-Host ""

$env:QUEUE_NAME = "{channel}"
& ".\{exe}"

Write-Host ""
Write-Host "The application has exited." -ForegroundColor Red
Read-Host "Press Enter to exit"
"#,
        name = instance.instance_name,
        description = instance.description,
        client_id = instance.client_id,
        empresa_id = instance.empresa_id,
        channel = instance.rabbit_mq_channel,
        log_path = instance.log_path,
        exe = EXECUTABLE_NAME,
    );

    fs::write(
        instance_dir.join(format!("start-{}.bat", instance.folder_name)),
        bat,
    )?;
    fs::write(
        instance_dir.join(format!("start-{}.ps1", instance.folder_name)),
        ps1,
    )?;
    Ok(())
}

/// Write the aggregate pm2 artifacts covering every instance: a plain-text
/// command list, a `.bat` start-all script and a `.ps1` start-all script.
pub fn write_pm2_artifacts(output_root: &Path, instances: &[InstanceSpec]) -> Result<()> {
    fs::create_dir_all(output_root).map_err(|e| Error::Scripts {
        message: e.to_string(),
    })?;

    let mut txt_lines: Vec<String> = Vec::new();
    let mut bat_lines: Vec<String> = vec![
        "@echo off".to_string(),
        "echo Starting processes with pm2...".to_string(),
        String::new(),
        "REM Verify that pm2 is installed".to_string(),
        "pm2 --version >nul 2>&1".to_string(),
        "if errorlevel 1 (".to_string(),
        "    echo ERROR: pm2 is not installed or not on the PATH".to_string(),
        "    echo Install pm2 with: npm install -g pm2".to_string(),
        "    pause".to_string(),
        "    exit /b 1".to_string(),
        ")".to_string(),
        String::new(),
    ];
    let mut ps1_lines: Vec<String> = vec![
        "# Starts a pm2 process for each instance".to_string(),
        "Write-Host \"Starting processes with pm2...\" -ForegroundColor Green".to_string(),
        String::new(),
    ];

    for instance in instances {
        let exe_path = executable_path(output_root, instance);
        let exe_display = exe_path.display();
        let exe_quoted = format!("\"{}\"", exe_display);
        let name_quoted = format!("\"{}\"", instance.instance_name);

        let stop_cmd = format!("pm2 stop {}", name_quoted);
        let delete_cmd = format!("pm2 delete {}", name_quoted);
        let start_cmd = format!(
            "pm2 start {} --name {} --instances {}",
            exe_quoted, name_quoted, PM2_WORKER_COUNT
        );

        // Readable command triple
        txt_lines.push(stop_cmd.clone());
        txt_lines.push(delete_cmd.clone());
        txt_lines.push(start_cmd.clone());

        // BAT: suppress stop/delete output, surface start errors, skip start
        // with a visible error when the executable is missing
        bat_lines.push(format!(
            "echo Processing instance: {}",
            instance.instance_name
        ));
        bat_lines.push(format!("{} 1>nul 2>nul", stop_cmd));
        bat_lines.push(format!("{} 1>nul 2>nul", delete_cmd));
        bat_lines.push(format!("if not exist \"{}\" (", exe_display));
        bat_lines.push(format!(
            "    echo ERROR: executable not found: {}",
            exe_display
        ));
        bat_lines.push("    echo Check that the path is correct".to_string());
        bat_lines.push(") else (".to_string());
        bat_lines.push(format!("    {}", start_cmd));
        bat_lines.push(")".to_string());
        bat_lines.push(String::new());

        // PS1: silence stop/delete
        ps1_lines.push(format!("{} | Out-Null", stop_cmd));
        ps1_lines.push(format!("{} | Out-Null", delete_cmd));
        ps1_lines.push(start_cmd);
    }

    bat_lines.push(String::new());
    bat_lines.push("echo.".to_string());
    bat_lines.push("echo Done. Check process status with: pm2 list".to_string());
    bat_lines.push("echo.".to_string());
    bat_lines.push("pause".to_string());

    ps1_lines.push(String::new());
    ps1_lines.push("Write-Host \"Done.\" -ForegroundColor Cyan".to_string());

    write_lines(&output_root.join("pm2-commands.txt"), &txt_lines)?;
    write_lines(&output_root.join("pm2-start-all.bat"), &bat_lines)?;
    write_lines(&output_root.join("pm2-start-all.ps1"), &ps1_lines)?;
    Ok(())
}

/// Absolute path of one instance's executable, used by the pm2 commands.
fn executable_path(output_root: &Path, instance: &InstanceSpec) -> PathBuf {
    let joined = output_root
        .join(&instance.folder_name)
        .join(EXECUTABLE_NAME);
    std::path::absolute(&joined).unwrap_or(joined)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).map_err(|e| Error::Scripts {
        message: format!("{}: {}", path.display(), e),
    })
}

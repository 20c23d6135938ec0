// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use tracing::{error, info, warn};
use wasla_golive_core::{
    catalog_doctor, default_catalog, exit_code_for_report, explain_output, list_output,
    load_catalog, render_json, render_jsonl, render_text, GoLiveChecker, ProbeCatalog,
    StartupCheck, StartupOutcome, TenantStateSource,
};
use wasla_golive_model::{Report, TenantId};
use wasla_golive_store::{SqliteTenantStore, TenantFixture};

use crate::config::GoLiveConfig;
use crate::errors::{CliError, ExitCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

fn configured_catalog(config: &GoLiveConfig) -> Result<ProbeCatalog, CliError> {
    match &config.catalog_path {
        Some(path) => Ok(load_catalog(path)?),
        None => Ok(default_catalog()?),
    }
}

fn build_checker(config: &GoLiveConfig) -> Result<GoLiveChecker, CliError> {
    let policy = config.score_policy().map_err(CliError::Config)?;
    let catalog = configured_catalog(config)?;
    Ok(GoLiveChecker::from_catalog(&catalog, policy)?)
}

fn open_store(config: &GoLiveConfig) -> Result<SqliteTenantStore, CliError> {
    Ok(SqliteTenantStore::open(&config.db_path)?)
}

fn describe_outcome(outcome: &StartupOutcome) -> String {
    match outcome {
        StartupOutcome::Disabled => "startup check disabled".to_string(),
        StartupOutcome::AlreadyCompleted => "startup check already completed".to_string(),
        StartupOutcome::InProgress => "startup check already running".to_string(),
        StartupOutcome::Skipped { reason } => format!("startup check skipped: {reason}"),
        StartupOutcome::Completed { reports, failed } => {
            let blocked = reports.iter().filter(|r| !r.ok()).count();
            format!(
                "startup check completed: tenants={} blocked={blocked} failed={}",
                reports.len() + failed.len(),
                failed.len()
            )
        }
        StartupOutcome::Failed { error_code } => format!("startup check failed: {error_code}"),
    }
}

fn run_startup_hook(config: &GoLiveConfig, store: &SqliteTenantStore) -> StartupOutcome {
    let checker = match build_checker(config) {
        Ok(checker) => checker,
        Err(err) => {
            error!(
                error_code = "configuration",
                detail = %err,
                "go_live_startup_check_failed"
            );
            return StartupOutcome::Failed {
                error_code: "configuration".to_string(),
            };
        }
    };
    StartupCheck::new(checker, config.startup_check_enabled).on_migrations_applied(store)
}

pub fn migrate(config: &GoLiveConfig) -> Result<ExitCode, CliError> {
    let mut store = open_store(config)?;
    let (from, to) = store.migrate()?;
    println!("schema migrated: {from} -> {to}");
    let outcome = run_startup_hook(config, &store);
    println!("{}", describe_outcome(&outcome));
    Ok(ExitCode::Success)
}

/// Never fails the process: the hook is fail-open.
pub fn startup(config: &GoLiveConfig) -> Result<ExitCode, CliError> {
    let outcome = match open_store(config) {
        Ok(store) => run_startup_hook(config, &store),
        Err(err) => {
            warn!(
                error_code = "store_open",
                detail = %err,
                "go_live_startup_check_failed"
            );
            StartupOutcome::Failed {
                error_code: "store_open".to_string(),
            }
        }
    };
    println!("{}", describe_outcome(&outcome));
    Ok(ExitCode::Success)
}

pub fn check(
    config: &GoLiveConfig,
    tenant: Option<&str>,
    all: bool,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let checker = build_checker(config)?;
    let store = open_store(config)?;
    let tenants = if all {
        store.list_tenants()?
    } else {
        let raw = tenant.ok_or_else(|| CliError::Config("pass --tenant or --all".to_string()))?;
        vec![TenantId::parse(raw).map_err(|err| CliError::Config(err.to_string()))?]
    };

    let mut reports = Vec::with_capacity(tenants.len());
    for tenant in &tenants {
        let report = checker.check_tenant(&store, tenant)?;
        info!(
            tenant = %report.tenant(),
            ok = report.ok(),
            score = report.score(),
            hard_blockers = report.hard_blockers().len(),
            warnings = report.warnings().len(),
            "go_live_check"
        );
        reports.push(report);
    }

    let rendered = render_reports(&reports, all, format)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    let blocked = reports.iter().any(|r| exit_code_for_report(r) != 0);
    Ok(if blocked {
        ExitCode::Blocked
    } else {
        ExitCode::Success
    })
}

fn render_reports(
    reports: &[Report],
    all: bool,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(reports
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Json if all => {
            serde_json::to_string_pretty(reports).map_err(|err| CliError::Render(err.to_string()))
        }
        OutputFormat::Json => reports
            .iter()
            .map(render_json)
            .collect::<Result<Vec<_>, _>>()
            .map(|rows| rows.join("\n"))
            .map_err(CliError::Render),
        OutputFormat::Jsonl => reports
            .iter()
            .map(render_jsonl)
            .collect::<Result<Vec<_>, _>>()
            .map(|rows| rows.join("\n"))
            .map_err(CliError::Render),
    }
}

pub fn probes_list(config: &GoLiveConfig) -> Result<ExitCode, CliError> {
    let catalog = configured_catalog(config)?;
    println!("{}", list_output(&catalog));
    Ok(ExitCode::Success)
}

pub fn probes_explain(config: &GoLiveConfig, id: &str) -> Result<ExitCode, CliError> {
    let catalog = configured_catalog(config)?;
    println!("{}", explain_output(&catalog, id)?);
    Ok(ExitCode::Success)
}

pub fn catalog_validate(path: &Path) -> Result<ExitCode, CliError> {
    let catalog = load_catalog(path)?;
    let enabled = catalog.probes.iter().filter(|p| p.enabled).count();
    println!(
        "catalog ok: {} probes ({enabled} enabled)",
        catalog.probes.len()
    );
    Ok(ExitCode::Success)
}

pub fn catalog_doctor_cmd(path: &Path) -> Result<ExitCode, CliError> {
    let catalog = load_catalog(path)?;
    let problems = catalog_doctor(&catalog);
    if problems.is_empty() {
        println!("catalog doctor: no problems in {}", catalog.origin);
        return Ok(ExitCode::Success);
    }
    for problem in &problems {
        println!("{problem}");
    }
    Ok(ExitCode::Validation)
}

pub fn tenant_import(config: &GoLiveConfig, file: &Path) -> Result<ExitCode, CliError> {
    let fixture = TenantFixture::load(file)?;
    let mut store = open_store(config)?;
    let tenant = store.import_tenant(&fixture)?;
    println!("imported tenant {tenant}");
    Ok(ExitCode::Success)
}

pub fn tenant_list(config: &GoLiveConfig) -> Result<ExitCode, CliError> {
    let store = open_store(config)?;
    for tenant in store.list_tenants()? {
        println!("{tenant}");
    }
    Ok(ExitCode::Success)
}

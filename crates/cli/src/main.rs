//! `prepdesk` binary
//!
//! One invocation runs either a self-test (`--test`) or a single notification
//! pass (`--check`). Scheduling is left to cron or CI. Exit status is 0 on
//! full success and 1 otherwise, including usage errors.

mod logging;
mod wiring;

use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgGroup, Parser};
use prepdesk_core::{CheckOutcome, Orchestrator, OrchestratorSettings};
use prepdesk_infra::config;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "prepdesk",
    version,
    about = "Posts a ticket performance briefing to Slack ahead of each 1on1"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["test", "check"])))]
struct Cli {
    /// Verify calendar, ticketing and messaging connectivity
    #[arg(long)]
    test: bool,

    /// Scan for upcoming 1on1 meetings and post briefings
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    SelfTest,
    Check,
}

impl Cli {
    const fn mode(&self) -> Mode {
        if self.test {
            Mode::SelfTest
        } else {
            Mode::Check
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    // A missing .env file is fine; the process environment is used as-is.
    dotenvy::dotenv().ok();
    logging::init();

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = err.label(), %err, "configuration could not be loaded");
            return ExitCode::FAILURE;
        }
    };

    let orchestrator = Orchestrator::new(
        wiring::collaborators(&config),
        OrchestratorSettings::from_config(&config),
    );

    let success = match cli.mode() {
        Mode::Check => run_check(&orchestrator).await,
        Mode::SelfTest => run_self_test(&orchestrator).await,
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_check(orchestrator: &Orchestrator) -> bool {
    let report = orchestrator.run_check(Utc::now()).await;
    if report.is_success() {
        info!(
            meetings = report.meetings_detected,
            sent = report.reports_sent,
            missing_snapshots = report.missing_snapshots,
            delivery_failures = report.delivery_failures,
            "check completed"
        );
    } else {
        error!(
            failed_collaborators = ?report.collaborator_failures,
            scan_failed = report.scan_failed,
            "check failed"
        );
    }
    report.is_success()
}

async fn run_self_test(orchestrator: &Orchestrator) -> bool {
    let report = orchestrator.self_test(Utc::now()).await;
    for (name, outcome) in [
        ("calendar", &report.calendar),
        ("ticketing", &report.ticketing),
        ("messaging", &report.messaging),
    ] {
        match outcome {
            CheckOutcome::Passed { detail } => info!(collaborator = name, %detail, "self-test passed"),
            CheckOutcome::Failed { error } => warn!(collaborator = name, %error, "self-test failed"),
        }
    }

    if report.is_success() {
        info!("all integrations working");
    } else {
        error!("self-test failed");
    }
    report.is_success()
}

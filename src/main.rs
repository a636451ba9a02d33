// src/main.rs
// =============================================================================
// Entry point.
//
// What happens here:
// 1. Parse command-line arguments (src/cli.rs)
// 2. Install the tracing subscriber (logs go to stderr)
// 3. Either start the HTTP service or run a single audit
// 4. Exit with a code scripts can rely on:
//      0 = audit ran (whatever the score)
//      1 = the URL was rejected (missing, malformed, bad scheme, internal)
//      2 = anything else (fetch failure, bind failure, ...)
// =============================================================================

mod checks;
mod cli;
mod config;
mod engine;
mod error;
mod fetch;
mod gate;
mod guard;
mod markup;
mod report;
mod server;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checks::Status;
use cli::{Cli, Commands};
use engine::AuditEngine;
use gate::InMemoryRateLimiter;
use report::AuditReport;
use server::AppState;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs)?;

    let audit_config = cli.audit_config();

    match cli.command {
        Commands::Serve {
            bind,
            rate_limit_max,
            rate_limit_window_ms,
            trust_proxy_headers,
        } => {
            let state = AppState {
                engine: Arc::new(AuditEngine::with_http(audit_config)),
                limiter: Arc::new(InMemoryRateLimiter::new()),
                gate: Arc::new(cli::gate_config(
                    rate_limit_max,
                    rate_limit_window_ms,
                    trust_proxy_headers,
                )),
            };
            server::serve(bind, state).await?;
            Ok(0)
        }
        Commands::Audit { url, json } => {
            let engine = AuditEngine::with_http(audit_config);
            match engine.audit(&url).await {
                Ok(report) => {
                    print_results(&report, json)?;
                    Ok(0)
                }
                Err(e) if e.is_validation() => {
                    eprintln!("❌ {}", e);
                    Ok(1)
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    Ok(2)
                }
            }
        }
    }
}

/// RUST_LOG wins; otherwise info, or debug with --verbose
fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}

fn print_results(report: &AuditReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &AuditReport) {
    println!("🔍 SEO audit: {}", report.url);
    println!();
    println!("{:<16} {:<12} {:<60}", "CHECK", "STATUS", "MESSAGE");
    println!("{}", "=".repeat(88));

    for (name, result) in report.checks.iter() {
        println!(
            "{:<16} {:<12} {:<60}",
            name.key(),
            format_status(result.status),
            result.message
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   🏆 Score: {}/100", report.overall_score);
    println!("   ❌ Critical: {}", report.issues.critical);
    println!("   ⚠️  Warnings: {}", report.issues.warning);
    println!("   ✅ Passed: {}", report.issues.passed);

    if !report.recommendations.is_empty() {
        println!();
        println!("💡 Recommendations:");
        for rec in &report.recommendations {
            println!("   - {}", rec);
        }
    }
}

fn format_status(status: Status) -> &'static str {
    match status {
        Status::Pass => "✅ PASS",
        Status::Warning => "⚠️  WARN",
        Status::Fail => "❌ FAIL",
    }
}

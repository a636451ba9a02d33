// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Two subcommands:
//   serve   run the HTTP audit service
//   audit   run one audit from the terminal and print the report
//
// Every serve option can also come from an SEO_AUDIT_* environment variable,
// so the same binary runs unchanged in a container.
// =============================================================================

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{AuditConfig, GateConfig, DEFAULT_USER_AGENT};

#[derive(Parser, Debug)]
#[command(
    name = "seo-audit",
    version,
    about = "Single-page SEO audits over HTTP or from the terminal",
    long_about = "seo-audit fetches one public web page, runs twelve on-page SEO checks \
                  against it and returns a scored report with recommendations. \
                  Internal and private-network targets are refused before any request is made."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// User-Agent for outbound requests
    #[arg(long, global = true, env = "SEO_AUDIT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service (POST /seo-audit, GET /health)
    ///
    /// Example: seo-audit serve --bind 0.0.0.0:8080
    Serve {
        /// Address to listen on
        #[arg(long, env = "SEO_AUDIT_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Audits allowed per client within one window
        #[arg(long, env = "SEO_AUDIT_RATE_LIMIT_MAX", default_value_t = 10)]
        rate_limit_max: u32,

        /// Rate-limit window in milliseconds
        #[arg(long, env = "SEO_AUDIT_RATE_LIMIT_WINDOW_MS", default_value_t = 60_000)]
        rate_limit_window_ms: u64,

        /// Key clients by X-Forwarded-For / X-Real-IP / CF-Connecting-IP.
        /// Only enable behind a proxy that sets these headers.
        #[arg(long, env = "SEO_AUDIT_TRUST_PROXY_HEADERS")]
        trust_proxy_headers: bool,
    },

    /// Audit a single URL and print the report
    ///
    /// Example: seo-audit audit example.com --json
    Audit {
        /// Page to audit; "example.com" is treated as https://example.com/
        url: String,

        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            user_agent: self.user_agent.clone(),
            ..AuditConfig::default()
        }
    }
}

/// Gate settings from the serve flags
pub fn gate_config(rate_limit_max: u32, rate_limit_window_ms: u64, trust_proxy_headers: bool) -> GateConfig {
    GateConfig {
        max_requests: rate_limit_max,
        window: Duration::from_millis(rate_limit_window_ms),
        trust_proxy_headers,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. `global = true` lets -v and --json-logs appear after the subcommand
//    (`seo-audit audit example.com -v`).
//
// 2. A bool flag with `env` accepts true/false/1/0 style values from the
//    environment; the flag itself takes no value on the command line.
// -----------------------------------------------------------------------------

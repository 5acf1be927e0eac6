mod api;
mod config;
mod ipc;
mod model;
mod session;
mod sort;
mod validate;
mod views;

use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .init();

    let service = api::HttpService::new(&config.api_base_url, config.request_timeout)?;
    info!(api = %config.api_base_url, "rosterd starting");
    let mut state = ipc::AppState::new(config, Box::new(service));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                warn!(error = %e, "unparseable request");
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                let _ = writeln!(stdout, "{resp}");
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(stdout, "{resp}");
        let _ = stdout.flush();
    }

    info!("stdin closed, exiting");
    Ok(())
}

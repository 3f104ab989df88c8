//! Evaluate a route for a principal and print the guard's explanation as JSON.
//!
//! Usage: `guardctl <role|-|@claims.json> <path>`. `-` means signed out, and
//! `@file` reads session claims from a JSON file. Role tokens outside the known
//! set are evaluated as unknown roles.

use std::time::Instant;

use anyhow::{Context, bail};
use chrono::Utc;
use homebid_auth::{AccessGuard, GuardConfig, RouteRequest, explain};
use homebid_shell::cli::{PrincipalArg, snapshot_for};

fn main() -> anyhow::Result<()> {
    homebid_observability::init_pretty();

    let mut args = std::env::args().skip(1);
    let (Some(principal), Some(path)) = (args.next(), args.next()) else {
        bail!("usage: guardctl <role|-|@claims.json> <path>");
    };

    let config = GuardConfig::from_env().context("invalid HOMEBID_* configuration")?;
    let guard = AccessGuard::new(config);

    let snapshot = snapshot_for(&PrincipalArg::parse(&principal), Utc::now(), Instant::now())?;
    let route = RouteRequest::new(path);

    let verdict = guard.plan(&snapshot, &route);
    let explanation = explain(&snapshot, &route, &verdict);

    let json = serde_json::to_string_pretty(&explanation).context("failed to encode explanation")?;
    println!("{json}");
    if let Some(message) = verdict.message {
        tracing::info!("{message}");
    }
    Ok(())
}

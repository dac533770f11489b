//! Run report: a table on stdout and an optional JSON file.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::driver::{AccountReport, MigrationOutcome, MigrationSummary, SkipReason};

fn account_json(account: &AccountReport) -> Value {
    let mut entry = json!({
        "index": account.index,
        "sourceAddress": account.source_address,
        "publicKey": account.public_key,
        "state": format!("{:?}", account.outcome.state()),
    });

    match &account.outcome {
        MigrationOutcome::Claimed { tx_hash } => {
            entry["outcome"] = json!("Claimed");
            entry["txHash"] = json!(tx_hash.to_string());
        }
        MigrationOutcome::Skipped(reason) => {
            entry["outcome"] = json!(reason.kind());
            if let SkipReason::MultisigUnsupported { memberships } = reason {
                entry["multisigAccounts"] = json!(memberships);
            }
        }
        MigrationOutcome::Failed(err) => {
            entry["outcome"] = json!(err.kind());
            entry["error"] = json!(err.to_string());
            if let Some(tx_hash) = err.tx_hash() {
                entry["txHash"] = json!(tx_hash.to_string());
            }
        }
    }
    entry
}

pub fn summary_json(summary: &MigrationSummary) -> Value {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    json!({
        "network": summary.network,
        "destination": summary.destination.to_string(),
        "updated_at": now,
        "accounts": summary.accounts.iter().map(account_json).collect::<Vec<_>>(),
    })
}

/// Write the JSON report, replacing any previous one.
pub fn write_report(path: &Path, summary: &MigrationSummary) -> Result<()> {
    write_json_atomic(path, &summary_json(summary))
}

/// One line per account, for the operator's terminal.
pub fn render_summary(summary: &MigrationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Migration to {} on {}:",
        summary.destination, summary.network
    );
    for account in &summary.accounts {
        let address = account.source_address.as_deref().unwrap_or("<invalid key>");
        let detail = match &account.outcome {
            MigrationOutcome::Claimed { tx_hash } => format!("Claimed {tx_hash}"),
            MigrationOutcome::Skipped(reason) => format!("Skipped ({})", reason.kind()),
            MigrationOutcome::Failed(err) => format!("{} ({err})", err.kind()),
        };
        let _ = writeln!(out, "  #{:<3} {:<41}  {}", account.index, address, detail);
    }
    out
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised = serde_json::to_string_pretty(value).context("failed serialising report JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

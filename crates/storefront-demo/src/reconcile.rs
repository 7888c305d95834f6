use std::fmt::Write as _;

use clap::Args;
use serde::Serialize;
use storefront_reconcile::{Change, ChangeSummary, ReconcileError, Snapshot, SnapshotReconciler};
use tracing::debug;

use crate::error::Result;
use crate::profile::{ScreenConfig, ScreenOverrides};

#[derive(Debug, Clone, Args)]
pub struct ReconcileArgs {
    /// Profile committed first.
    #[arg(long, default_value = "storefront")]
    pub from: String,

    /// Profile reconciled against it.
    #[arg(long, default_value = "reshuffled")]
    pub to: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ReconcileReport<'a> {
    from: &'a str,
    to: &'a str,
    summary: ChangeSummary,
    changes: &'a [Change],
    snapshot: &'a Snapshot,
}

pub fn run_reconcile(args: ReconcileArgs) -> Result<()> {
    let from = ScreenConfig::load(&args.from, ScreenOverrides::default(), None)?;
    let to = ScreenConfig::load(&args.to, ScreenOverrides::default(), None)?;
    print!("{}", render_reconcile(&from, &to, args.json)?);
    Ok(())
}

/// Commit `from`, reconcile `to` against it and format the changes.
///
/// The change list is replayed onto the first snapshot before reporting; a
/// mismatch is returned as an error.
pub fn render_reconcile(from: &ScreenConfig, to: &ScreenConfig, json: bool) -> Result<String> {
    let mut reconciler = SnapshotReconciler::new();
    reconciler.reconcile(&from.descriptors())?;
    let previous = reconciler.snapshot().clone();

    let result = reconciler.reconcile(&to.descriptors())?;
    let replayed = result.replay(&previous)?;
    if replayed != result.snapshot {
        return Err(ReconcileError::replay("replayed changes do not reach the new snapshot").into());
    }
    debug!(changes = result.changes.len(), "Replay matches reconciled snapshot");

    if json {
        let report = ReconcileReport {
            from: &from.profile,
            to: &to.profile,
            summary: result.summary(),
            changes: &result.changes,
            snapshot: &result.snapshot,
        };
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} -> {}", from.profile, to.profile);
    if result.is_empty() {
        let _ = writeln!(out, "no changes");
        return Ok(out);
    }
    for change in &result.changes {
        let _ = writeln!(out, "{}", describe_change(change, &previous, &result.snapshot));
    }
    let summary = result.summary();
    let _ = writeln!(
        out,
        "sections -{} +{}, items -{} +{} ~{}",
        summary.sections_removed,
        summary.sections_inserted,
        summary.items_removed,
        summary.items_inserted,
        summary.items_moved
    );
    Ok(out)
}

fn section_name(snapshot: &Snapshot, index: usize) -> String {
    snapshot
        .sections()
        .get(index)
        .map_or_else(|| format!("#{index}"), |s| s.kind.to_string())
}

fn describe_change(change: &Change, old: &Snapshot, new: &Snapshot) -> String {
    match change {
        Change::SectionRemoved { index } => {
            format!("- section {index} {}", section_name(old, *index))
        }
        Change::SectionInserted { index, section } => {
            format!("+ section {index} {section}")
        }
        Change::ItemRemoved { at, id } => {
            format!("- item {}.{} {id}", at.section, at.index)
        }
        Change::ItemInserted { at, id } => {
            format!("+ item {}.{} {id}", at.section, at.index)
        }
        Change::ItemMoved { from, to, id } => format!(
            "~ item {}.{} -> {}.{} {id} ({})",
            from.section,
            from.index,
            to.section,
            to.index,
            section_name(new, to.section)
        ),
    }
}

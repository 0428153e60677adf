// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use cw_core::JobSpec;
use cw_engine::{JobChange, Plan, ReconcileReport};
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render jobs as an aligned table.
pub fn format_jobs(jobs: &[JobSpec]) -> String {
    if jobs.is_empty() {
        return "No cronjobs\n".to_string();
    }
    let headers = ["NAME", "SCHEDULE", "POLICY", "SUSPENDED", "COMMAND"];
    let rows: Vec<[String; 5]> = jobs
        .iter()
        .map(|j| {
            [
                j.name.clone(),
                j.schedule.clone(),
                j.concurrency_policy.to_string(),
                if j.suspend { "yes" } else { "no" }.to_string(),
                j.command.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_row(&headers);
    for row in &rows {
        push_row(&row.each_ref().map(String::as_str));
    }
    out
}

pub fn format_plan(plan: &Plan) -> String {
    let mut out = format!(
        "Plan for {}: {} -> {}\n",
        plan.app,
        plan.previous_image.as_deref().unwrap_or("(none)"),
        plan.new_image
    );
    if plan.is_noop() {
        out.push_str("No changes\n");
        return out;
    }
    for job in plan.deploy.iter().chain(&plan.remove) {
        let marker = match job.change {
            JobChange::Create => '+',
            JobChange::Update => '~',
            JobChange::Unchanged => '=',
            JobChange::Remove => '-',
        };
        out.push_str(&format!("  {} {} ({})\n", marker, job.name, job.backend_name));
    }
    out
}

pub fn format_report(app: &str, report: &ReconcileReport) -> String {
    let mut out = format!(
        "Reconciled {} to {}: {} deployed, {} removed\n",
        app,
        report.image,
        report.deployed.len(),
        report.removed.len()
    );
    if !report.stale_failures.is_empty() {
        out.push_str(&format!(
            "warning: could not remove {}\n",
            report.stale_failures.join(", ")
        ));
    }
    out
}

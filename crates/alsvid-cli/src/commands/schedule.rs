//! Schedule command: solve a code file's schedules and report statistics.

use anyhow::Context;
use console::style;
use serde_json::json;

use alsvid_code::io::read_tanner_graph_file;
use alsvid_compile::{schedule_model, verify_schedules};

/// Execute the schedule command.
pub fn execute(input: &str, as_json: bool) -> anyhow::Result<()> {
    let mut model = read_tanner_graph_file(input)
        .with_context(|| format!("cannot read Tanner graph `{input}`"))?;
    schedule_model(&mut model).context("schedule solve failed")?;
    verify_schedules(&model).context("schedule verification failed")?;

    let max_depth = model.checks().iter().map(|c| c.depth()).max().unwrap_or(0);
    if as_json {
        let checks: Vec<_> = model
            .checks()
            .iter()
            .map(|c| {
                json!({
                    "check": c.id.0,
                    "basis": c.basis.to_string(),
                    "weight": c.weight(),
                    "depth": c.depth(),
                })
            })
            .collect();
        let report = json!({
            "input": input,
            "data_qubits": model.num_data_qubits(),
            "checks": checks,
            "max_depth": max_depth,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} checks over {} data qubits",
            style("scheduled").green().bold(),
            model.checks().len(),
            model.num_data_qubits(),
        );
        for check in model.checks() {
            println!(
                "  {}{:<4} weight {:<3} depth {}",
                check.basis,
                check.id.0,
                check.weight(),
                check.depth(),
            );
        }
        println!("  max depth: {max_depth}");
    }
    Ok(())
}

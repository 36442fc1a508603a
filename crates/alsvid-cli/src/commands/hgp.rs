//! HGP command: build a hypergraph-product code and write its Tanner graph.

use anyhow::Context;
use console::style;

use alsvid_code::builders::make_hypergraph_product;
use alsvid_code::io::write_tanner_graph_file;
use alsvid_code::ldpc::make_regular_tanner_graph;

/// Execute the HGP command.
pub fn execute(out: &str, rows: usize, cols: usize, scale: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        rows > 0 && cols > 0 && scale > 0,
        "seed parameters must be positive"
    );
    let seed = make_regular_tanner_graph(rows, cols, scale);
    let model = make_hypergraph_product(&seed).context("product construction failed")?;

    let stabs = model.checks().len();
    let logical = model.num_data_qubits().saturating_sub(stabs);
    write_tanner_graph_file(&model, out)
        .with_context(|| format!("cannot write Tanner graph `{out}`"))?;

    println!(
        "{} {} ({} data qubits, {} logical qubits)",
        style("wrote").green().bold(),
        out,
        model.num_data_qubits(),
        logical,
    );
    Ok(())
}

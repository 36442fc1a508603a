//! Generate command: compile a code into a memory-experiment program.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{bail, Context};
use console::style;
use tracing::{info, warn};

use alsvid_code::builders::{make_hexagonal, make_hycc_d4, make_rotated};
use alsvid_code::{io, Basis, TannerModel};
use alsvid_compile::{schedule_model, FlagPlan};
use alsvid_qes::{ExperimentConfig, InteractionMode, MemoryExperiment};

use crate::{CodeFamily, Memory};

/// Arguments for the generate command.
pub struct GenArgs {
    pub out: String,
    pub code: CodeFamily,
    pub input: Option<String>,
    pub distance: u32,
    pub rounds: u32,
    pub memory: Memory,
    pub flags: bool,
    pub combined: bool,
}

/// Execute the generate command.
pub fn execute(args: GenArgs) -> anyhow::Result<()> {
    let memory = match args.memory {
        Memory::X => Basis::X,
        Memory::Z => Basis::Z,
    };

    let (mut model, mode) = build_model(&args)?;
    if model.checks().iter().any(|c| !c.is_scheduled()) {
        schedule_model(&mut model).context("schedule solve failed")?;
    }

    let mut plan = FlagPlan::new(&model);
    if args.flags {
        plan_flags(&model, memory, &mut plan);
    }

    let config = ExperimentConfig {
        memory,
        rounds: args.rounds,
        mode,
    };
    let program = MemoryExperiment::new(&model, &plan, config)
        .emit()
        .context("emission failed")?;

    let out = File::create(&args.out)
        .with_context(|| format!("cannot create output file `{}`", args.out))?;
    program.write_to(BufWriter::new(out))?;

    println!(
        "{} {} ({} data qubits, {} checks, {} flags, {} rounds)",
        style("wrote").green().bold(),
        args.out,
        model.num_data_qubits(),
        model.checks().len(),
        plan.len(),
        args.rounds,
    );
    Ok(())
}

/// Build the Tanner model and pick the interaction mode for a family.
fn build_model(args: &GenArgs) -> anyhow::Result<(TannerModel, InteractionMode)> {
    let pair = match args.code {
        CodeFamily::Hex => {
            let model = make_hexagonal(args.distance, args.combined)?;
            // Combined schedules extract both member checks in one pass;
            // otherwise the plaquette is the extraction unit.
            let mode = if args.combined {
                InteractionMode::PerCheck
            } else {
                InteractionMode::PerPlaquette
            };
            (model, mode)
        }
        CodeFamily::Hycc => (make_hycc_d4()?, InteractionMode::PerCheck),
        CodeFamily::Surface => (make_rotated(args.distance)?, InteractionMode::PerCheck),
        CodeFamily::File => {
            let Some(input) = &args.input else {
                bail!("--code file requires --input");
            };
            let model = io::read_tanner_graph_file(input)
                .with_context(|| format!("cannot read Tanner graph `{input}`"))?;
            (model, InteractionMode::PerCheck)
        }
    };
    if args.combined && args.code != CodeFamily::Hex {
        warn!("--combined only applies to the hex family; ignoring");
    }
    Ok(pair)
}

/// Pair off each plaquette's support and guard the pairs on the member
/// check opposite to the memory basis; only those flags can produce
/// detection events.
fn plan_flags(model: &TannerModel, memory: Basis, plan: &mut FlagPlan) {
    if model.plaquettes().is_empty() {
        warn!("code has no plaquette structure; no flags placed");
        return;
    }
    let mut requested = 0;
    for plaquette in model.plaquettes() {
        let Some(owner) = model.plaquette_member(plaquette.id, memory.opposite()) else {
            continue;
        };
        for pair in plaquette.support.chunks(2) {
            if let [Some(q1), Some(q2)] = pair {
                requested += 1;
                plan.add_flag(model, *q1, *q2, owner);
            }
        }
    }
    info!(
        requested,
        placed = plan.len(),
        "flag planning complete"
    );
}

//! Memory-experiment circuit emission.
//!
//! The emitter walks three phases. PROLOGUE resets the data qubits and
//! rotates them into the memory basis if needed. BODY repeats per round:
//! the syndrome-extraction sub-circuit (flag setup, layered data
//! interactions, mirrored flag teardown, then flag and check measurements),
//! followed by the round's detection events. EPILOGUE rotates back,
//! measures the data qubits, declares the final events comparing each
//! stabilizer's last outcome against the parity of its support's data
//! measurements, and declares the logical observables.
//!
//! Same-depth interactions across all checks are batched into single
//! instructions; the layering is what makes the schedule physically valid,
//! not a formatting choice.

use tracing::{debug, info};

use alsvid_code::{Basis, CheckId, QubitId, TannerModel};
use alsvid_compile::FlagPlan;

use crate::error::{QesError, QesResult};
use crate::events::{base_offset, EventIndexer, MeasCounter};
use crate::mode::{layout_for, ExtractionPass, InteractionLayout, InteractionMode};
use crate::program::{Opcode, Program};

/// Configuration surface for a memory experiment.
#[derive(Debug, Clone, Copy)]
pub struct ExperimentConfig {
    /// The logical basis preserved across rounds.
    pub memory: Basis,
    /// Number of syndrome-extraction rounds; at least one.
    pub rounds: u32,
    /// How stabilizers are addressed.
    pub mode: InteractionMode,
}

/// Emits a multi-round memory experiment for a scheduled, flag-planned code.
pub struct MemoryExperiment<'a> {
    model: &'a TannerModel,
    flags: &'a FlagPlan,
    config: ExperimentConfig,
    layout: Box<dyn InteractionLayout>,
}

/// Mutable emission state, local to one `emit` call.
struct EmitState {
    program: Program,
    meas: MeasCounter,
    events: EventIndexer,
}

impl EmitState {
    /// Emit a measurement batch, recording each outcome index.
    fn measure(&mut self, operands: Vec<u32>) {
        for &q in &operands {
            self.meas.record(QubitId(q));
        }
        self.program.op(Opcode::Measure, operands);
    }
}

impl<'a> MemoryExperiment<'a> {
    /// Create an emitter; the interaction layout is fixed here.
    pub fn new(model: &'a TannerModel, flags: &'a FlagPlan, config: ExperimentConfig) -> Self {
        Self {
            model,
            flags,
            config,
            layout: layout_for(config.mode),
        }
    }

    /// Emit the full program.
    pub fn emit(&self) -> QesResult<Program> {
        if self.config.rounds == 0 {
            return Err(QesError::ZeroRounds);
        }
        let passes = self.layout.passes(self.model);
        let memory_units = self.layout.memory_units(self.model, self.config.memory);
        let events_per_round = self.events_per_round(&passes, &memory_units);
        info!(
            memory = %self.config.memory,
            rounds = self.config.rounds,
            units = memory_units.len(),
            flags = self.flags.len(),
            "emitting memory experiment"
        );

        let mut state = EmitState {
            program: Program::new(),
            meas: MeasCounter::new(),
            events: EventIndexer::new(),
        };
        let data: Vec<u32> = self.model.data_qubits().map(|q| q.0).collect();

        state.program.block_comment("PROLOGUE");
        state.program.op(Opcode::Reset, data.clone());
        if self.config.memory == Basis::X {
            state.program.op(Opcode::H, data.clone());
        }

        state.program.block_comment("BODY");
        for round in 0..self.config.rounds {
            let prev = state.meas.snapshot();
            state.program.annotation("timing_error");
            for pass in &passes {
                self.extract(pass, &mut state);
            }
            self.round_events(round, &prev, events_per_round, &passes, &memory_units, &mut state)?;
        }

        state.program.block_comment("EPILOGUE");
        if self.config.memory == Basis::X {
            state.program.op(Opcode::H, data.clone());
        }
        state.measure(data);
        self.epilogue_events(events_per_round, &memory_units, &mut state)?;
        self.observables(&mut state)?;

        debug!(
            statements = state.program.statements().len(),
            events = state.events.num_events(),
            measurements = state.meas.total(),
            "emission complete"
        );
        Ok(state.program)
    }

    /// Total detection events declared per BODY round.
    fn events_per_round(&self, passes: &[ExtractionPass], memory_units: &[CheckId]) -> u32 {
        let eventful_flags = self
            .flags
            .flags()
            .iter()
            .filter(|f| self.model.check(f.owner).basis != self.config.memory)
            .count();
        let aux: usize = passes
            .iter()
            .filter(|p| p.basis.is_some_and(|b| b != self.config.memory))
            .map(|p| p.checks.len())
            .sum();
        (memory_units.len() + eventful_flags + aux) as u32
    }

    /// One extraction pass: resets, basis rotations, flag setup, layered
    /// data interactions, flag teardown, measurements.
    fn extract(&self, pass: &ExtractionPass, state: &mut EmitState) {
        let flag_qubits: Vec<u32> = pass
            .checks
            .iter()
            .flat_map(|&c| self.flags.flags_of(c))
            .map(|f| f.qubit.0)
            .collect();
        let ancillas: Vec<u32> = pass
            .checks
            .iter()
            .map(|&c| self.model.check(c).ancilla.0)
            .collect();
        let x_ancillas: Vec<u32> = pass
            .checks
            .iter()
            .filter(|&&c| self.model.check(c).basis == Basis::X)
            .map(|&c| self.model.check(c).ancilla.0)
            .collect();

        let program = &mut state.program;
        program.op(Opcode::Reset, flag_qubits.clone());
        program.op(Opcode::Reset, ancillas.clone());
        program.op(Opcode::H, x_ancillas.clone());

        program.comment("FLAG SETUP");
        self.flag_hadamards(pass, program);
        self.flag_cnots(pass, program);

        program.comment("DATA CNOTS");
        self.data_cnots(pass, program);

        program.comment("FLAG TEARDOWN");
        self.flag_cnots(pass, program);
        self.flag_hadamards(pass, program);

        program.op(Opcode::H, x_ancillas);
        state.measure(flag_qubits);
        state.measure(ancillas);
    }

    /// Layered Hadamards bringing Z-owned flags into the |+> basis.
    fn flag_hadamards(&self, pass: &ExtractionPass, program: &mut Program) {
        let mut depth = 0;
        loop {
            let mut batch = vec![];
            let mut deeper = false;
            for &c in &pass.checks {
                let Some(flag) = self.flags.flags_of(c).nth(depth) else {
                    continue;
                };
                deeper = true;
                if self.model.check(c).basis == Basis::Z {
                    batch.push(flag.qubit.0);
                }
            }
            if !deeper {
                break;
            }
            program.op(Opcode::H, batch);
            depth += 1;
        }
    }

    /// Layered flag-ancilla couplings; direction follows the owner basis.
    fn flag_cnots(&self, pass: &ExtractionPass, program: &mut Program) {
        let mut depth = 0;
        loop {
            let mut batch = vec![];
            let mut deeper = false;
            for &c in &pass.checks {
                let Some(flag) = self.flags.flags_of(c).nth(depth) else {
                    continue;
                };
                deeper = true;
                let ancilla = self.model.check(c).ancilla;
                match self.model.check(c).basis {
                    Basis::X => batch.extend([ancilla.0, flag.qubit.0]),
                    Basis::Z => batch.extend([flag.qubit.0, ancilla.0]),
                }
            }
            if !deeper {
                break;
            }
            program.op(Opcode::Cx, batch);
            depth += 1;
        }
    }

    /// Layered data-qubit interactions, one batch per schedule slot.
    ///
    /// A data qubit couples to its guarding flag when one exists,
    /// otherwise directly to the check ancilla.
    fn data_cnots(&self, pass: &ExtractionPass, program: &mut Program) {
        let max_depth = pass
            .checks
            .iter()
            .map(|&c| self.model.check(c).depth())
            .max()
            .unwrap_or(0);
        for depth in 0..max_depth {
            let mut batch = vec![];
            for &c in &pass.checks {
                let check = self.model.check(c);
                let Some(&Some(dq)) = check.schedule.get(depth) else {
                    continue;
                };
                let fq = self.flags.flag_for(c, dq).unwrap_or(check.ancilla);
                match check.basis {
                    Basis::X => batch.extend([fq.0, dq.0]),
                    Basis::Z => batch.extend([dq.0, fq.0]),
                }
            }
            program.op(Opcode::Cx, batch);
        }
    }

    /// The round's detection events, in measurement order.
    fn round_events(
        &self,
        round: u32,
        prev: &MeasCounter,
        events_per_round: u32,
        passes: &[ExtractionPass],
        memory_units: &[CheckId],
        state: &mut EmitState,
    ) -> QesResult<()> {
        match self.config.mode {
            InteractionMode::PerCheck => {
                self.comparison_events(round, prev, events_per_round, memory_units, state)?;
                for check in self.model.checks() {
                    if check.basis == self.config.memory {
                        continue;
                    }
                    for flag in self.flags.flags_of(check.id) {
                        self.flag_event(flag.qubit, state)?;
                    }
                }
            }
            InteractionMode::PerPlaquette => {
                for pass in passes {
                    if pass.basis == Some(self.config.memory) {
                        self.comparison_events(round, prev, events_per_round, memory_units, state)?;
                    } else {
                        // The off-basis pass contributes flag-style events:
                        // its outcomes guard the memory syndrome but do not
                        // feed the next round's comparisons.
                        for &c in &pass.checks {
                            for flag in self.flags.flags_of(c) {
                                self.flag_event(flag.qubit, state)?;
                            }
                        }
                        for &c in &pass.checks {
                            self.flag_event(self.model.check(c).ancilla, state)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Cross-round comparison events for the memory stabilizers.
    fn comparison_events(
        &self,
        round: u32,
        prev: &MeasCounter,
        events_per_round: u32,
        memory_units: &[CheckId],
        state: &mut EmitState,
    ) -> QesResult<()> {
        for &unit in memory_units {
            let check = self.model.check(unit);
            let event = state.events.next_event();
            if let Some(color) = check.color {
                state.program.property("color", i64::from(color));
            }
            state.program.property(
                "base",
                base_offset(event, events_per_round, self.config.rounds),
            );
            let current = state.meas.get(check.ancilla)?;
            if round == 0 {
                state.program.op(Opcode::Event, vec![event, current]);
            } else {
                let previous = prev.get(check.ancilla)?;
                state
                    .program
                    .op(Opcode::Event, vec![event, current, previous]);
            }
        }
        Ok(())
    }

    /// A single-reference flag-style event for `qubit`'s latest outcome.
    fn flag_event(&self, qubit: QubitId, state: &mut EmitState) -> QesResult<()> {
        let event = state.events.next_event();
        let outcome = state.meas.get(qubit)?;
        state.program.annotation("flag");
        state.program.op(Opcode::Event, vec![event, outcome]);
        Ok(())
    }

    /// Final events comparing each memory stabilizer's last mid-circuit
    /// outcome against the parity of its support's data measurements,
    /// recomputed from the stabilizer's own schedule since the epilogue
    /// measures data qubits rather than ancillas.
    fn epilogue_events(
        &self,
        events_per_round: u32,
        memory_units: &[CheckId],
        state: &mut EmitState,
    ) -> QesResult<()> {
        for &unit in memory_units {
            let check = self.model.check(unit);
            let event = state.events.next_event();
            state.program.property(
                "base",
                base_offset(event, events_per_round, self.config.rounds),
            );
            if let Some(color) = check.color {
                state.program.property("color", i64::from(color));
            }
            let mut operands = vec![event];
            for &dq in check.schedule.iter().flatten() {
                operands.push(state.meas.get(dq)?);
            }
            operands.push(state.meas.get(check.ancilla)?);
            state.program.op(Opcode::Event, operands);
        }
        Ok(())
    }

    /// Logical-observable declarations over the final data measurements.
    fn observables(&self, state: &mut EmitState) -> QesResult<()> {
        for obs in self.model.observables(self.config.memory) {
            let index = state.events.next_obs();
            let mut operands = vec![index];
            for &q in obs {
                operands.push(state.meas.get(q)?);
            }
            state.program.op(Opcode::Obs, operands);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_code::builders::make_rotated;

    fn experiment(rounds: u32) -> (TannerModel, ExperimentConfig) {
        let model = make_rotated(3).unwrap();
        let config = ExperimentConfig {
            memory: Basis::Z,
            rounds,
            mode: InteractionMode::PerCheck,
        };
        (model, config)
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let (model, config) = experiment(0);
        let flags = FlagPlan::new(&model);
        let err = MemoryExperiment::new(&model, &flags, config).emit();
        assert!(matches!(err, Err(QesError::ZeroRounds)));
    }

    #[test]
    fn test_phases_are_marked() {
        let (model, config) = experiment(2);
        let flags = FlagPlan::new(&model);
        let program = MemoryExperiment::new(&model, &flags, config).emit().unwrap();
        let text = program.to_string();
        assert!(text.contains("# PROLOGUE"));
        assert!(text.contains("# BODY"));
        assert!(text.contains("# EPILOGUE"));
        assert!(text.contains("@annotation timing_error"));
    }

    #[test]
    fn test_data_layers_match_schedule_depth() {
        let (model, config) = experiment(1);
        let flags = FlagPlan::new(&model);
        let program = MemoryExperiment::new(&model, &flags, config).emit().unwrap();
        // All rotated-surface schedules are four slots deep, so one round
        // emits exactly four cx batches.
        assert_eq!(program.ops_of(Opcode::Cx).count(), 4);
    }

    #[test]
    fn test_round_zero_events_have_single_reference() {
        let (model, config) = experiment(1);
        let flags = FlagPlan::new(&model);
        let program = MemoryExperiment::new(&model, &flags, config).emit().unwrap();
        let z_count = model.checks_of(Basis::Z).count();
        let events: Vec<&[u32]> = program.ops_of(Opcode::Event).collect();
        // One round: z_count round-0 events plus z_count epilogue events.
        assert_eq!(events.len(), 2 * z_count);
        for event in &events[..z_count] {
            assert_eq!(event.len(), 2, "round-0 event compares one outcome");
        }
        for event in &events[z_count..] {
            assert!(event.len() > 2, "epilogue event spans the support");
        }
    }
}

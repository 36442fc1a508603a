//! Dense typed Tanner-graph model.
//!
//! A [`TannerModel`] stores the bipartite structure of a quantum
//! error-correcting code: data qubits, X/Z parity checks with their ordered
//! support, optional plaquette groupings for color codes, and logical
//! observables. Entities are plain records held in dense arrays indexed by
//! small integer ids; check/qubit adjacency is kept as explicit index lists
//! so invariants can be checked without a generic graph library.
//!
//! Physical qubit ids share one address space: data qubits use their labels,
//! check ancillas are allocated above the largest data label, and flag
//! ancillas (allocated by the compiler) sit above [`TannerModel::qubit_bound`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodeError, CodeResult};

/// Physical qubit id (data qubit, check ancilla, or flag ancilla).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a check in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckId(pub u32);

/// Index of a plaquette in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaquetteId(pub u32);

/// Pauli basis of a check or of a memory experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// X-type stabilizer / X memory.
    X,
    /// Z-type stabilizer / Z memory.
    Z,
}

impl Basis {
    /// The complementary basis.
    pub fn opposite(self) -> Self {
        match self {
            Basis::X => Basis::Z,
            Basis::Z => Basis::X,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::X => write!(f, "x"),
            Basis::Z => write!(f, "z"),
        }
    }
}

/// A data qubit record.
#[derive(Debug, Clone)]
pub struct DataQubit {
    /// Physical qubit id (the qubit's label).
    pub qubit: QubitId,
    /// Color, for color-code layouts.
    pub color: Option<u8>,
}

/// A parity-check record.
///
/// The support is the ordered list of data qubits the check acts on; gaps
/// (`None`) mark boundary positions where a geometric neighbor is absent.
/// The schedule assigns each non-gap support qubit to a time slot: slot `t`
/// (1-indexed) holds the qubit at `schedule[t - 1]`. An empty schedule means
/// the check has not been scheduled yet.
#[derive(Debug, Clone)]
pub struct Check {
    /// This check's id.
    pub id: CheckId,
    /// Stabilizer type.
    pub basis: Basis,
    /// The ancilla qubit measured to read this check's syndrome.
    pub ancilla: QubitId,
    /// Ordered support, possibly with gaps.
    pub support: Vec<Option<QubitId>>,
    /// Time-slot assignment; empty until scheduled.
    pub schedule: Vec<Option<QubitId>>,
    /// Color, for color codes.
    pub color: Option<u8>,
    /// Owning plaquette, for color codes.
    pub plaquette: Option<PlaquetteId>,
}

impl Check {
    /// Non-gap support qubits in support order.
    pub fn support_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.support.iter().filter_map(|q| *q)
    }

    /// Number of non-gap support qubits.
    pub fn weight(&self) -> usize {
        self.support.iter().filter(|q| q.is_some()).count()
    }

    /// Whether `q` is in this check's support.
    pub fn supports(&self, q: QubitId) -> bool {
        self.support.contains(&Some(q))
    }

    /// Whether the schedule has been populated.
    pub fn is_scheduled(&self) -> bool {
        !self.schedule.is_empty()
    }

    /// The 1-indexed time slot assigned to `q`, if scheduled.
    pub fn slot_of(&self, q: QubitId) -> Option<u32> {
        self.schedule
            .iter()
            .position(|s| *s == Some(q))
            .map(|t| t as u32 + 1)
    }

    /// Scheduled depth (number of slots), or 0 if unscheduled.
    pub fn depth(&self) -> usize {
        self.schedule.len()
    }
}

/// A color-code plaquette: one X and one Z check sharing identical support.
#[derive(Debug, Clone)]
pub struct Plaquette {
    /// This plaquette's id.
    pub id: PlaquetteId,
    /// Member checks (at most one per basis).
    pub checks: Vec<CheckId>,
    /// Ordered support shared by the member checks.
    pub support: Vec<Option<QubitId>>,
    /// Color in {0, 1, 2}.
    pub color: u8,
}

/// The Tanner-graph model of a quantum error-correcting code.
#[derive(Debug, Clone, Default)]
pub struct TannerModel {
    data: Vec<DataQubit>,
    checks: Vec<Check>,
    plaquettes: Vec<Plaquette>,
    obs_x: Vec<Vec<QubitId>>,
    obs_z: Vec<Vec<QubitId>>,
    /// Data-qubit label -> dense index into `data` / `checks_on`.
    data_index: FxHashMap<QubitId, usize>,
    /// Per data qubit (dense index), the checks whose support contains it.
    checks_on: Vec<Vec<CheckId>>,
    /// Next free physical qubit id.
    next_qubit: u32,
    /// Lowest allocated ancilla id, once any check exists.
    first_ancilla: Option<u32>,
}

impl TannerModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data qubit with the given label. Idempotent.
    ///
    /// Fails if the label lands in the already-allocated ancilla range:
    /// data qubits must be declared before the checks that use them push
    /// the ancilla watermark past their labels.
    pub fn add_data_qubit(&mut self, qubit: QubitId) -> CodeResult<()> {
        if self.data_index.contains_key(&qubit) {
            return Ok(());
        }
        if let Some(first) = self.first_ancilla {
            if qubit.0 >= first {
                return Err(CodeError::LabelCollision { qubit });
            }
        }
        self.data_index.insert(qubit, self.data.len());
        self.data.push(DataQubit { qubit, color: None });
        self.checks_on.push(vec![]);
        self.next_qubit = self.next_qubit.max(qubit.0 + 1);
        Ok(())
    }

    /// Add a check over the given support. Allocates the check's ancilla.
    ///
    /// Every non-gap support entry must name an existing data qubit.
    pub fn add_check(&mut self, basis: Basis, support: Vec<Option<QubitId>>) -> CodeResult<CheckId> {
        for q in support.iter().filter_map(|q| *q) {
            if !self.data_index.contains_key(&q) {
                return Err(CodeError::UnknownDataQubit { qubit: q });
            }
        }
        let id = CheckId(self.checks.len() as u32);
        let ancilla = QubitId(self.next_qubit);
        self.next_qubit += 1;
        self.first_ancilla.get_or_insert(ancilla.0);
        for q in support.iter().filter_map(|q| *q) {
            let idx = self.data_index[&q];
            self.checks_on[idx].push(id);
        }
        self.checks.push(Check {
            id,
            basis,
            ancilla,
            support,
            schedule: vec![],
            color: None,
            plaquette: None,
        });
        Ok(id)
    }

    /// Add a plaquette over the given support.
    pub fn add_plaquette(&mut self, support: Vec<Option<QubitId>>, color: u8) -> PlaquetteId {
        let id = PlaquetteId(self.plaquettes.len() as u32);
        self.plaquettes.push(Plaquette {
            id,
            checks: vec![],
            support,
            color,
        });
        id
    }

    /// Register `check` as a member of `plaquette`.
    pub fn assign_plaquette(&mut self, check: CheckId, plaquette: PlaquetteId) -> CodeResult<()> {
        if check.0 as usize >= self.checks.len() {
            return Err(CodeError::UnknownCheck { plaquette, check });
        }
        self.checks[check.0 as usize].plaquette = Some(plaquette);
        self.plaquettes[plaquette.0 as usize].checks.push(check);
        Ok(())
    }

    /// Set a check's color.
    pub fn set_check_color(&mut self, check: CheckId, color: u8) {
        self.checks[check.0 as usize].color = Some(color);
    }

    /// Populate a check's schedule. Write-once.
    ///
    /// The schedule must assign every non-gap support qubit exactly one
    /// slot and contain no qubit outside the support.
    pub fn set_schedule(
        &mut self,
        check: CheckId,
        schedule: Vec<Option<QubitId>>,
    ) -> CodeResult<()> {
        let ch = &self.checks[check.0 as usize];
        if ch.is_scheduled() {
            return Err(CodeError::ScheduleAlreadySet { check });
        }
        let mut assigned: Vec<QubitId> = schedule.iter().filter_map(|q| *q).collect();
        let mut support: Vec<QubitId> = ch.support_qubits().collect();
        assigned.sort_unstable();
        support.sort_unstable();
        if assigned != support {
            return Err(CodeError::ScheduleMismatch { check });
        }
        self.checks[check.0 as usize].schedule = schedule;
        Ok(())
    }

    /// Append a logical observable in the given basis.
    pub fn add_observable(&mut self, basis: Basis, support: Vec<QubitId>) {
        match basis {
            Basis::X => self.obs_x.push(support),
            Basis::Z => self.obs_z.push(support),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// All data qubits, in declaration order.
    pub fn data_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.data.iter().map(|d| d.qubit)
    }

    /// Number of data qubits.
    pub fn num_data_qubits(&self) -> usize {
        self.data.len()
    }

    /// Whether `qubit` is a declared data qubit.
    pub fn has_data_qubit(&self, qubit: QubitId) -> bool {
        self.data_index.contains_key(&qubit)
    }

    /// All checks, in id order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The check with the given id.
    pub fn check(&self, id: CheckId) -> &Check {
        &self.checks[id.0 as usize]
    }

    /// Checks of one basis, in id order.
    pub fn checks_of(&self, basis: Basis) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(move |c| c.basis == basis)
    }

    /// All plaquettes, in id order.
    pub fn plaquettes(&self) -> &[Plaquette] {
        &self.plaquettes
    }

    /// The plaquette with the given id.
    pub fn plaquette(&self, id: PlaquetteId) -> &Plaquette {
        &self.plaquettes[id.0 as usize]
    }

    /// The member check of `plaquette` in the given basis.
    pub fn plaquette_member(&self, plaquette: PlaquetteId, basis: Basis) -> Option<CheckId> {
        self.plaquettes[plaquette.0 as usize]
            .checks
            .iter()
            .copied()
            .find(|&c| self.check(c).basis == basis)
    }

    /// Logical observables in the given basis.
    pub fn observables(&self, basis: Basis) -> &[Vec<QubitId>] {
        match basis {
            Basis::X => &self.obs_x,
            Basis::Z => &self.obs_z,
        }
    }

    /// Checks whose support contains `qubit`.
    pub fn checks_on(&self, qubit: QubitId) -> &[CheckId] {
        self.data_index
            .get(&qubit)
            .map(|&i| self.checks_on[i].as_slice())
            .unwrap_or(&[])
    }

    /// One past the largest allocated physical qubit id.
    ///
    /// Flag ancillas are allocated from this bound upward.
    pub fn qubit_bound(&self) -> u32 {
        self.next_qubit
    }

    /// Maximum non-gap support size over all checks.
    pub fn max_check_weight(&self) -> usize {
        self.checks.iter().map(Check::weight).max().unwrap_or(0)
    }

    /// Data qubits shared by two checks, in `a`'s support order.
    pub fn shared_support(&self, a: CheckId, b: CheckId) -> Vec<QubitId> {
        let cb = self.check(b);
        self.check(a)
            .support_qubits()
            .filter(|&q| cb.supports(q))
            .collect()
    }
}

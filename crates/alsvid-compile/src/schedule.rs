//! Incremental syndrome-extraction schedule solving.
//!
//! Checks are solved one at a time in id order; each solve sees the
//! finalized schedules of every previously processed (or pre-seeded) check
//! as immutable constraints. Per check, the solve assigns every non-gap
//! support qubit a distinct 1-indexed time slot such that
//!
//! 1. no slot already used for the same data qubit by an earlier check is
//!    reused (a data qubit cannot be mid-interaction with two checks), and
//! 2. for every earlier check of the opposite basis, the number of shared
//!    qubits on which this check acts strictly *before* the earlier check
//!    is even, so the anticommuting contributions cancel pairwise.
//!
//! The depth (maximum slot) is minimized by iterative deepening: target
//! depths grow from the support size to twice the maximum check weight,
//! and each target is searched exhaustively by backtracking, so the first
//! solution found is depth-minimal and the feasibility conditions are
//! enforced exactly rather than checked after the fact.

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use alsvid_code::{Basis, Check, CheckId, QubitId, TannerModel};

use crate::error::{CompileError, CompileResult};

/// Backtracking-step budget per check; exhausting it aborts compilation.
const STEP_BUDGET: u64 = 1 << 24;

/// Slot assignments of already-finalized checks, indexed by data qubit.
#[derive(Debug, Default)]
struct Prior {
    slots: FxHashMap<QubitId, Vec<(CheckId, Basis, u32)>>,
}

impl Prior {
    fn absorb(&mut self, check: &Check) {
        for (t, q) in check.schedule.iter().enumerate() {
            if let Some(q) = q {
                self.slots
                    .entry(*q)
                    .or_default()
                    .push((check.id, check.basis, t as u32 + 1));
            }
        }
    }
}

/// Compute schedules for every unscheduled check in the model.
///
/// Pre-seeded schedules are kept as-is and treated as fixed constraints.
/// Fails with [`CompileError::ScheduleInfeasible`] (or `ScheduleTimeout`)
/// without committing a partial schedule for the offending check.
#[instrument(skip(model))]
pub fn schedule_model(model: &mut TannerModel) -> CompileResult<()> {
    let slot_bound = (2 * model.max_check_weight()).max(1) as u32;

    let mut prior = Prior::default();
    let mut pending = vec![];
    for check in model.checks() {
        if check.is_scheduled() {
            prior.absorb(check);
        } else {
            pending.push(check.id);
        }
    }
    info!(
        checks = model.checks().len(),
        pending = pending.len(),
        slot_bound,
        "scheduling syndrome extraction"
    );

    for id in pending {
        let schedule = solve_check(model, &prior, id, slot_bound)?;
        debug!(check = ?id, depth = schedule.len(), "scheduled");
        model.set_schedule(id, schedule)?;
        prior.absorb(model.check(id));
    }
    Ok(())
}

/// One parity group: the shared qubits between the current check and one
/// earlier check of the opposite basis.
struct Group {
    /// (support index, earlier check's slot for that qubit).
    members: Vec<(usize, u32)>,
}

/// The constraint problem for a single check.
struct Problem {
    support: Vec<QubitId>,
    /// Per support index, slots already taken for that qubit.
    forbidden: Vec<Vec<u32>>,
    groups: Vec<Group>,
    /// Per support index, (group index, earlier slot) memberships.
    groups_of: Vec<Vec<(usize, u32)>>,
}

fn solve_check(
    model: &TannerModel,
    prior: &Prior,
    id: CheckId,
    slot_bound: u32,
) -> CompileResult<Vec<Option<QubitId>>> {
    let check = model.check(id);
    let support: Vec<QubitId> = check.support_qubits().collect();

    let mut forbidden = vec![vec![]; support.len()];
    let mut group_map: FxHashMap<CheckId, Vec<(usize, u32)>> = FxHashMap::default();
    for (i, q) in support.iter().enumerate() {
        let Some(entries) = prior.slots.get(q) else {
            continue;
        };
        for &(other, basis, slot) in entries {
            forbidden[i].push(slot);
            if basis != check.basis {
                group_map.entry(other).or_default().push((i, slot));
            }
        }
    }
    for (other, members) in &group_map {
        if members.len() > 2 {
            // The parity rule is only validated for overlaps of one or two
            // qubits; larger overlaps deserve a look at the code geometry.
            warn!(
                check = ?id,
                earlier = ?other,
                shared = members.len(),
                "check pair overlaps on more than two qubits"
            );
        }
    }

    let mut groups_of: Vec<Vec<(usize, u32)>> = vec![vec![]; support.len()];
    let mut groups = vec![];
    for members in group_map.into_values() {
        for &(i, slot) in &members {
            groups_of[i].push((groups.len(), slot));
        }
        groups.push(Group { members });
    }
    let problem = Problem {
        support,
        forbidden,
        groups,
        groups_of,
    };

    // Most-constrained qubits first.
    let mut order: Vec<usize> = (0..problem.support.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(problem.forbidden[i].len()));

    let mut steps = STEP_BUDGET;
    for depth in problem.support.len() as u32..=slot_bound {
        let mut search = Search {
            problem: &problem,
            order: &order,
            depth,
            assigned: vec![0; problem.support.len()],
            used: vec![false; depth as usize + 1],
            group_state: problem
                .groups
                .iter()
                .map(|g| GroupState {
                    remaining: g.members.len(),
                    parity: 0,
                })
                .collect(),
        };
        match search.run(0, &mut steps) {
            Outcome::Found => {
                let mut schedule = vec![None; depth as usize];
                for (i, &q) in problem.support.iter().enumerate() {
                    schedule[search.assigned[i] as usize - 1] = Some(q);
                }
                return Ok(schedule);
            }
            Outcome::Exhausted => {}
            Outcome::OutOfSteps => {
                return Err(CompileError::ScheduleTimeout { check: id });
            }
        }
    }
    Err(CompileError::ScheduleInfeasible {
        check: id,
        support: problem.support,
    })
}

struct GroupState {
    remaining: usize,
    parity: u8,
}

enum Outcome {
    Found,
    Exhausted,
    OutOfSteps,
}

struct Search<'p> {
    problem: &'p Problem,
    order: &'p [usize],
    depth: u32,
    /// Per support index, assigned slot (0 = unassigned).
    assigned: Vec<u32>,
    used: Vec<bool>,
    group_state: Vec<GroupState>,
}

impl Search<'_> {
    fn run(&mut self, pos: usize, steps: &mut u64) -> Outcome {
        if *steps == 0 {
            return Outcome::OutOfSteps;
        }
        *steps -= 1;
        if pos == self.order.len() {
            return Outcome::Found;
        }
        let idx = self.order[pos];
        for slot in 1..=self.depth {
            if self.used[slot as usize] || self.problem.forbidden[idx].contains(&slot) {
                continue;
            }
            // A completed parity group must be even; equality with the
            // earlier slot is impossible here, so the indicator is strict.
            let mut consistent = true;
            for &(g, earlier) in &self.problem.groups_of[idx] {
                let state = &mut self.group_state[g];
                state.parity ^= u8::from(slot < earlier);
                state.remaining -= 1;
                if state.remaining == 0 && state.parity == 1 {
                    consistent = false;
                }
            }
            if consistent {
                self.used[slot as usize] = true;
                self.assigned[idx] = slot;
                match self.run(pos + 1, steps) {
                    Outcome::Exhausted => {}
                    done => return done,
                }
                self.used[slot as usize] = false;
                self.assigned[idx] = 0;
            }
            for &(g, earlier) in &self.problem.groups_of[idx] {
                let state = &mut self.group_state[g];
                state.parity ^= u8::from(slot < earlier);
                state.remaining += 1;
            }
        }
        Outcome::Exhausted
    }
}

/// The exact feasibility predicate over a fully scheduled model.
///
/// Verifies, for checks extracted simultaneously, per-check slot
/// uniqueness, cross-check qubit non-collision, and the even commutation
/// parity between differently-typed pairs (oriented by id order, matching
/// the solve order).
pub fn verify_schedules(model: &TannerModel) -> CompileResult<()> {
    for check in model.checks() {
        if !check.is_scheduled() {
            return Err(CompileError::MissingSchedule { check: check.id });
        }
        let mut seen: Vec<QubitId> = check.schedule.iter().filter_map(|q| *q).collect();
        let assigned = seen.len();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != assigned || assigned != check.weight() {
            return Err(CompileError::MissingSchedule { check: check.id });
        }
    }
    for a in model.checks() {
        for b in model.checks() {
            if b.id <= a.id {
                continue;
            }
            let mut before = 0u32;
            let mut shares = false;
            for q in a.support_qubits().filter(|&q| b.supports(q)) {
                shares = true;
                let (sa, sb) = match (a.slot_of(q), b.slot_of(q)) {
                    (Some(sa), Some(sb)) => (sa, sb),
                    _ => return Err(CompileError::MissingSchedule { check: a.id }),
                };
                if sa == sb {
                    return Err(CompileError::SlotCollision {
                        first: a.id,
                        second: b.id,
                        qubit: q,
                        slot: sa,
                    });
                }
                if sb < sa {
                    before += 1;
                }
            }
            if shares && a.basis != b.basis && before % 2 == 1 {
                return Err(CompileError::CommutationViolation {
                    first: a.id,
                    second: b.id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_code::builders::make_hycc_d4;

    fn q(id: u32) -> QubitId {
        QubitId(id)
    }

    fn model_with_data(n: u32) -> TannerModel {
        let mut model = TannerModel::new();
        for i in 0..n {
            model.add_data_qubit(q(i)).unwrap();
        }
        model
    }

    #[test]
    fn test_unconstrained_check_gets_minimal_depth() {
        let mut model = model_with_data(3);
        let c = model
            .add_check(Basis::Z, vec![Some(q(0)), Some(q(1)), Some(q(2))])
            .unwrap();
        schedule_model(&mut model).unwrap();
        let check = model.check(c);
        // Depth equals the support size: one distinct slot per qubit.
        assert_eq!(check.depth(), 3);
        let mut slots: Vec<u32> = check.support_qubits().map(|x| check.slot_of(x).unwrap()).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![1, 2, 3]);
    }

    #[test]
    fn test_two_check_commutation_scenario() {
        // Check A (Z over [1, 2]) is fixed with schedule [2, 1]; check B
        // (X over [2, 3]) shares qubit 2 and must not collide with A's
        // slot 1 while keeping the ordering parity even, which pins the
        // shared qubit after A's interaction.
        let mut model = model_with_data(4);
        let a = model.add_check(Basis::Z, vec![Some(q(1)), Some(q(2))]).unwrap();
        model.set_schedule(a, vec![Some(q(2)), Some(q(1))]).unwrap();
        let b = model.add_check(Basis::X, vec![Some(q(2)), Some(q(3))]).unwrap();

        schedule_model(&mut model).unwrap();

        let check_b = model.check(b);
        assert_eq!(check_b.schedule, vec![Some(q(3)), Some(q(2))]);
        assert_ne!(check_b.slot_of(q(2)), Some(1), "slot 1 would collide with A");
        verify_schedules(&model).unwrap();
    }

    #[test]
    fn test_qubit_reuse_avoided_across_checks() {
        let mut model = model_with_data(5);
        let a = model
            .add_check(Basis::Z, vec![Some(q(0)), Some(q(1)), Some(q(2))])
            .unwrap();
        let b = model
            .add_check(Basis::Z, vec![Some(q(2)), Some(q(3)), Some(q(4))])
            .unwrap();
        schedule_model(&mut model).unwrap();
        assert_ne!(model.check(a).slot_of(q(2)), model.check(b).slot_of(q(2)));
        verify_schedules(&model).unwrap();
    }

    #[test]
    fn test_infeasible_schedule_is_fatal() {
        // Five alternating-type weight-1 checks on one qubit need five
        // distinct slots, but the bound is twice the maximum weight (2).
        let mut model = model_with_data(1);
        for i in 0..5 {
            let basis = if i % 2 == 0 { Basis::Z } else { Basis::X };
            model.add_check(basis, vec![Some(q(0))]).unwrap();
        }
        let err = schedule_model(&mut model).unwrap_err();
        match err {
            CompileError::ScheduleInfeasible { check, support } => {
                assert_eq!(check, CheckId(2));
                assert_eq!(support, vec![q(0)]);
            }
            other => panic!("expected infeasibility, got {other}"),
        }
    }

    #[test]
    fn test_pre_seeded_schedules_are_kept() {
        let mut model = model_with_data(2);
        let c = model.add_check(Basis::Z, vec![Some(q(0)), Some(q(1))]).unwrap();
        model
            .set_schedule(c, vec![None, Some(q(1)), Some(q(0))])
            .unwrap();
        schedule_model(&mut model).unwrap();
        assert_eq!(model.check(c).schedule, vec![None, Some(q(1)), Some(q(0))]);
    }

    #[test]
    fn test_hycc_d4_schedules_and_verifies() {
        let mut model = make_hycc_d4().unwrap();
        schedule_model(&mut model).unwrap();
        verify_schedules(&model).unwrap();
        let bound = 2 * model.max_check_weight();
        for check in model.checks() {
            assert!(check.depth() >= check.weight());
            assert!(check.depth() <= bound);
        }
    }

    #[test]
    fn test_verify_catches_slot_collision() {
        let mut model = model_with_data(3);
        let a = model.add_check(Basis::Z, vec![Some(q(0)), Some(q(1))]).unwrap();
        let b = model.add_check(Basis::X, vec![Some(q(0)), Some(q(2))]).unwrap();
        model.set_schedule(a, vec![Some(q(0)), Some(q(1))]).unwrap();
        model.set_schedule(b, vec![Some(q(0)), Some(q(2))]).unwrap();
        assert!(matches!(
            verify_schedules(&model),
            Err(CompileError::SlotCollision { qubit, slot: 1, .. }) if qubit == q(0)
        ));
    }

    #[test]
    fn test_verify_catches_commutation_violation() {
        let mut model = model_with_data(4);
        let a = model.add_check(Basis::Z, vec![Some(q(1)), Some(q(2))]).unwrap();
        let b = model.add_check(Basis::X, vec![Some(q(2)), Some(q(3))]).unwrap();
        // A acts on qubit 2 at slot 2; B acts on it at slot 1 — a single
        // inverted ordering, so the parity sum is odd.
        model.set_schedule(a, vec![Some(q(1)), Some(q(2))]).unwrap();
        model.set_schedule(b, vec![Some(q(2)), Some(q(3))]).unwrap();
        assert!(matches!(
            verify_schedules(&model),
            Err(CompileError::CommutationViolation { .. })
        ));
    }
}

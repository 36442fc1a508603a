//! Flag-ancilla planning.
//!
//! A flag guards a pair of data qubits inside one check's interaction
//! sequence: a single fault on the check ancilla between the two
//! interactions propagates onto both qubits, and the flag catches it. A
//! flag is only worth its qubit if the resulting hook error has a
//! well-defined signature, i.e. if exactly one or two checks of the
//! complementary basis see exactly one of the guarded qubits; otherwise
//! the request is dropped.

use rustc_hash::FxHashMap;
use tracing::debug;

use alsvid_code::{CheckId, QubitId, TannerModel};

/// The checks whose syndromes a triggered flag implicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookEdge {
    /// First implicated check.
    pub first: CheckId,
    /// Second implicated check, or `None` at a code boundary.
    pub second: Option<CheckId>,
}

/// A registered flag ancilla.
#[derive(Debug, Clone)]
pub struct Flag {
    /// The flag's physical qubit.
    pub qubit: QubitId,
    /// The check whose extraction this flag participates in.
    pub owner: CheckId,
    /// The guarded pair of data qubits.
    pub pair: (QubitId, QubitId),
    /// Where a hook error from this flag would show up.
    pub hook: HookEdge,
}

#[derive(Debug, Default)]
struct OwnerFlags {
    /// Flag indices in registration order.
    all: Vec<usize>,
    /// Guarded data qubit -> flag index.
    by_data: FxHashMap<QubitId, usize>,
}

/// The set of flags planned for one compilation.
///
/// Flag qubits are allocated above the model's data/ancilla id range, so
/// the plan must be built after the model is complete.
#[derive(Debug)]
pub struct FlagPlan {
    next_qubit: u32,
    flags: Vec<Flag>,
    owners: FxHashMap<CheckId, OwnerFlags>,
}

impl FlagPlan {
    /// Create an empty plan for `model`.
    pub fn new(model: &TannerModel) -> Self {
        Self {
            next_qubit: model.qubit_bound(),
            flags: vec![],
            owners: FxHashMap::default(),
        }
    }

    /// Request a flag guarding `(q1, q2)` during the extraction of `check`.
    ///
    /// Computes the propagation set: checks of the complementary basis
    /// whose support contains exactly one of the pair. A set of size 0
    /// carries no syndrome information and a set larger than 2 admits no
    /// single hook edge, so such requests are dropped without mutating the
    /// plan. Returns the allocated flag qubit on success.
    pub fn add_flag(
        &mut self,
        model: &TannerModel,
        q1: QubitId,
        q2: QubitId,
        check: CheckId,
    ) -> Option<QubitId> {
        let owner = model.check(check);
        if !owner.supports(q1) || !owner.supports(q2) {
            debug!(?check, %q1, %q2, "flag pair outside the owner's support");
            return None;
        }
        let complement = owner.basis.opposite();
        let mut hooked: Vec<CheckId> = vec![];
        for id in model.checks_on(q1).iter().chain(model.checks_on(q2)) {
            let other = model.check(*id);
            if other.id == check || other.basis != complement || hooked.contains(id) {
                continue;
            }
            let overlap = usize::from(other.supports(q1)) + usize::from(other.supports(q2));
            if overlap == 1 {
                hooked.push(other.id);
            }
        }
        if hooked.is_empty() || hooked.len() > 2 {
            debug!(
                ?check,
                %q1,
                %q2,
                propagation = hooked.len(),
                "dropping flag request with degenerate propagation set"
            );
            return None;
        }

        let qubit = QubitId(self.next_qubit);
        self.next_qubit += 1;
        let hook = HookEdge {
            first: hooked[0],
            second: hooked.get(1).copied(),
        };
        let index = self.flags.len();
        self.flags.push(Flag {
            qubit,
            owner: check,
            pair: (q1, q2),
            hook,
        });
        let owner_flags = self.owners.entry(check).or_default();
        owner_flags.all.push(index);
        owner_flags.by_data.insert(q1, index);
        owner_flags.by_data.insert(q2, index);
        Some(qubit)
    }

    /// All registered flags, in registration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Flags owned by `check`, in registration order.
    pub fn flags_of(&self, check: CheckId) -> impl Iterator<Item = &Flag> {
        self.owners
            .get(&check)
            .into_iter()
            .flat_map(|o| o.all.iter().map(|&i| &self.flags[i]))
    }

    /// The flag guarding `data` within `check`'s extraction, if any.
    pub fn flag_for(&self, check: CheckId, data: QubitId) -> Option<QubitId> {
        self.owners
            .get(&check)?
            .by_data
            .get(&data)
            .map(|&i| self.flags[i].qubit)
    }

    /// Number of registered flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the plan holds no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// One past the largest allocated qubit id, flags included.
    pub fn qubit_bound(&self) -> u32 {
        self.next_qubit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_code::{Basis, TannerModel};

    fn q(id: u32) -> QubitId {
        QubitId(id)
    }

    /// Owner Z check over [0, 1]; X checks as specified by their supports.
    fn setup(x_supports: &[&[u32]]) -> (TannerModel, CheckId) {
        let mut model = TannerModel::new();
        let max = x_supports
            .iter()
            .flat_map(|s| s.iter())
            .copied()
            .max()
            .unwrap_or(1)
            .max(1);
        for i in 0..=max {
            model.add_data_qubit(q(i)).unwrap();
        }
        let owner = model.add_check(Basis::Z, vec![Some(q(0)), Some(q(1))]).unwrap();
        for support in x_supports {
            let support = support.iter().map(|&x| Some(q(x))).collect();
            model.add_check(Basis::X, support).unwrap();
        }
        (model, owner)
    }

    #[test]
    fn test_flag_accepted_with_two_hooked_checks() {
        let (model, owner) = setup(&[&[0, 2], &[1, 3]]);
        let mut plan = FlagPlan::new(&model);
        let fq = plan.add_flag(&model, q(0), q(1), owner).unwrap();
        assert_eq!(fq, QubitId(model.qubit_bound()));
        assert_eq!(plan.len(), 1);
        let flag = &plan.flags()[0];
        assert_eq!(flag.hook.first, CheckId(1));
        assert_eq!(flag.hook.second, Some(CheckId(2)));
        assert_eq!(plan.flag_for(owner, q(0)), Some(fq));
        assert_eq!(plan.flag_for(owner, q(1)), Some(fq));
    }

    #[test]
    fn test_flag_accepted_at_boundary() {
        let (model, owner) = setup(&[&[1, 2]]);
        let mut plan = FlagPlan::new(&model);
        plan.add_flag(&model, q(0), q(1), owner).unwrap();
        assert_eq!(plan.flags()[0].hook.second, None);
    }

    #[test]
    fn test_flag_rejected_with_empty_propagation_set() {
        // The only X check sees both guarded qubits, so nothing is hooked.
        let (model, owner) = setup(&[&[0, 1]]);
        let mut plan = FlagPlan::new(&model);
        assert_eq!(plan.add_flag(&model, q(0), q(1), owner), None);
        assert!(plan.is_empty());
        assert_eq!(plan.qubit_bound(), model.qubit_bound());
    }

    #[test]
    fn test_flag_rejected_with_oversized_propagation_set() {
        let (model, owner) = setup(&[&[0, 2], &[0, 3], &[1, 4]]);
        let mut plan = FlagPlan::new(&model);
        assert_eq!(plan.add_flag(&model, q(0), q(1), owner), None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_same_basis_neighbors_are_ignored() {
        // A Z neighbor seeing one guarded qubit does not count toward the
        // propagation set of a Z-owned flag.
        let (mut model, owner) = setup(&[&[0, 2]]);
        model.add_check(Basis::Z, vec![Some(q(1)), Some(q(2))]).unwrap();
        let mut plan = FlagPlan::new(&model);
        plan.add_flag(&model, q(0), q(1), owner).unwrap();
        assert_eq!(plan.flags()[0].hook.first, CheckId(1));
        assert_eq!(plan.flags()[0].hook.second, None);
    }

    #[test]
    fn test_flag_qubits_allocated_sequentially() {
        let (model, owner) = setup(&[&[0, 2], &[1, 3]]);
        let mut plan = FlagPlan::new(&model);
        let f1 = plan.add_flag(&model, q(0), q(1), owner).unwrap();
        let f2 = plan.add_flag(&model, q(0), q(1), owner).unwrap();
        assert_eq!(f2.0, f1.0 + 1);
        assert_eq!(plan.qubit_bound(), f2.0 + 1);
        assert_eq!(plan.flags_of(owner).count(), 2);
    }

    #[test]
    fn test_pair_outside_support_is_dropped() {
        let (model, owner) = setup(&[&[0, 2]]);
        let mut plan = FlagPlan::new(&model);
        assert_eq!(plan.add_flag(&model, q(0), q(2), owner), None);
    }
}

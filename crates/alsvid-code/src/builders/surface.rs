//! Rotated surface-code Tanner graphs.

use crate::error::CodeResult;
use crate::model::{Basis, QubitId, TannerModel};

/// Build a distance-`d` rotated surface code with the standard interleaved
/// (N/Z-shaped) four-slot schedules baked in.
pub fn make_rotated(d: u32) -> CodeResult<TannerModel> {
    let mut model = TannerModel::new();

    for n in 0..d * d {
        model.add_data_qubit(QubitId(n))?;
    }
    model.add_observable(Basis::X, (0..d).map(QubitId).collect());
    model.add_observable(Basis::Z, (0..d).map(|x| QubitId((d - 1) + x * d)).collect());

    let some = |q: u32| Some(QubitId(q));

    // Boundary checks first, then the bulk.
    for r in (0..d.saturating_sub(1)).step_by(2) {
        let (q1, q2) = (r, r + 1);
        let ch = model.add_check(Basis::Z, vec![some(q1), some(q2)])?;
        model.set_schedule(ch, vec![some(q2), some(q1), None, None])?;
        let (q1, q2) = (d * (d - 1) + r + 1, d * (d - 1) + r + 2);
        let ch = model.add_check(Basis::Z, vec![some(q1), some(q2)])?;
        model.set_schedule(ch, vec![None, None, some(q2), some(q1)])?;
    }
    for c in (0..d.saturating_sub(1)).step_by(2) {
        let (q1, q2) = (c * d + d - 1, (c + 1) * d + d - 1);
        let ch = model.add_check(Basis::X, vec![some(q1), some(q2)])?;
        model.set_schedule(ch, vec![None, None, some(q2), some(q1)])?;
        let (q1, q2) = ((c + 1) * d, (c + 2) * d);
        let ch = model.add_check(Basis::X, vec![some(q1), some(q2)])?;
        model.set_schedule(ch, vec![some(q2), some(q1), None, None])?;
    }
    for r in 0..d - 1 {
        for c in 0..d - 1 {
            let (nw, ne, sw, se) = (r + c * d, r + (c + 1) * d, r + 1 + c * d, r + 1 + (c + 1) * d);
            if (r + c) % 2 == 1 {
                let ch = model.add_check(Basis::Z, vec![some(nw), some(ne), some(sw), some(se)])?;
                model.set_schedule(ch, vec![some(se), some(ne), some(sw), some(nw)])?;
            } else {
                let ch = model.add_check(Basis::X, vec![some(nw), some(ne), some(sw), some(se)])?;
                model.set_schedule(ch, vec![some(se), some(sw), some(ne), some(nw)])?;
            }
        }
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_d3_counts() {
        let model = make_rotated(3).unwrap();
        assert_eq!(model.num_data_qubits(), 9);
        // d^2 - 1 stabilizers for one logical qubit.
        assert_eq!(model.checks().len(), 8);
        assert!(model.checks().iter().all(|c| c.is_scheduled()));
        assert_eq!(model.checks_of(Basis::X).count(), 4);
        assert_eq!(model.checks_of(Basis::Z).count(), 4);
    }

    #[test]
    fn test_rotated_weights() {
        let model = make_rotated(5);
        let model = model.unwrap();
        let mut w2 = 0;
        let mut w4 = 0;
        for check in model.checks() {
            match check.weight() {
                2 => w2 += 1,
                4 => w4 += 1,
                w => panic!("unexpected check weight {w}"),
            }
        }
        assert_eq!(w2, 8);
        assert_eq!(w4, 16);
    }

    #[test]
    fn test_rotated_no_slot_collisions() {
        let model = make_rotated(3).unwrap();
        for a in model.checks() {
            for b in model.checks() {
                if b.id <= a.id {
                    continue;
                }
                for q in a.support_qubits().filter(|&q| b.supports(q)) {
                    assert_ne!(a.slot_of(q), b.slot_of(q), "{q} shared by two checks at once");
                }
            }
        }
    }
}

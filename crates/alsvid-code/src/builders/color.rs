//! Color-code Tanner graphs.

use rustc_hash::FxHashMap;

use crate::error::CodeResult;
use crate::model::{Basis, QubitId, TannerModel};

/// Build a distance-`d` hexagonal (weight-6 RGB plaquette) color code.
///
/// Data qubits and plaquettes are laid out on a triangular patch; every
/// plaquette carries one X and one Z check over the same six-qubit support
/// (with gaps on the boundary). With `both_at_once` the two checks of a
/// plaquette get interleaved seven-slot schedules so they can be extracted
/// simultaneously; otherwise both get the standard six-slot order and are
/// meant to be extracted in separate per-basis passes.
pub fn make_hexagonal(d: u32, both_at_once: bool) -> CodeResult<TannerModel> {
    let mut model = TannerModel::new();

    let side_len = (3 * d as i32 - 1) / 2;
    let mut offset = 2;
    let mut loc_map: FxHashMap<(i32, i32), QubitId> = FxHashMap::default();
    let mut check_locs: Vec<(i32, i32)> = vec![];
    let mut obs: Vec<QubitId> = vec![];

    let mut n = 0u32;
    for r in 0..side_len {
        let mut row_off = offset;
        for c in 0..=r {
            if row_off == 0 {
                check_locs.push((r, c));
            } else {
                let q = QubitId(n);
                loc_map.insert((r, c), q);
                model.add_data_qubit(q)?;
                if c == 0 {
                    // Left edge of the triangle: an X and Z logical operator.
                    obs.push(q);
                }
                n += 1;
            }
            row_off = (row_off + 1) % 3;
        }
        offset = (offset + 1) % 3;
    }
    model.add_observable(Basis::X, obs.clone());
    model.add_observable(Basis::Z, obs);

    let get_loc = |r: i32, c: i32| loc_map.get(&(r, c)).copied();

    for &(i, j) in &check_locs {
        //     a   b           a  b
        //   f   P   c    -->  f  P  c
        //     e   d              e  d
        let a = get_loc(i - 1, j - 1);
        let b = get_loc(i - 1, j);
        let c = get_loc(i, j + 1);
        let d = get_loc(i + 1, j + 1);
        let e = get_loc(i + 1, j);
        let f = get_loc(i, j - 1);

        let support = vec![a, b, c, d, e, f];
        let color = (i % 3) as u8;
        let plaq = model.add_plaquette(support.clone(), color);
        for basis in [Basis::X, Basis::Z] {
            let schedule = if both_at_once {
                match basis {
                    Basis::Z => vec![b, c, d, a, f, e, None],
                    Basis::X => vec![None, b, a, f, c, d, e],
                }
            } else {
                vec![b, c, e, d, a, f]
            };
            let ch = model.add_check(basis, support.clone())?;
            model.set_check_color(ch, color);
            model.assign_plaquette(ch, plaq)?;
            model.set_schedule(ch, schedule)?;
        }
    }
    Ok(model)
}

/// Build the 24-qubit, distance-4 hyperbolic color code.
///
/// Operator supports are tabulated; schedules are left empty for the
/// schedule solver since this family has no known-good fixed order.
pub fn make_hycc_d4() -> CodeResult<TannerModel> {
    let red: [&[u32]; 4] = [
        &[0, 1, 2, 3, 4, 5],
        &[6, 7, 8, 9, 10, 11],
        &[12, 13, 14, 15, 16, 17],
        &[18, 19, 20, 21, 22, 23],
    ];
    let green: [&[u32]; 2] = [
        &[0, 2, 6, 8, 23, 21, 15, 17],
        &[20, 22, 14, 16, 3, 1, 7, 9],
    ];
    let blue: [&[u32]; 2] = [
        &[2, 4, 8, 10, 21, 19, 13, 15],
        &[18, 20, 14, 12, 3, 5, 9, 11],
    ];
    let obs_list: [&[u32]; 8] = [
        &[11, 10, 4, 5],
        &[4, 5, 12, 13],
        &[7, 6, 0, 1],
        &[0, 1, 16, 17],
        &[9, 11, 18, 20],
        &[8, 10, 4, 2],
        &[22, 20, 9, 7],
        &[6, 8, 2, 0],
    ];

    let mut model = TannerModel::new();
    for i in 0..24 {
        model.add_data_qubit(QubitId(i))?;
    }
    for obs in obs_list {
        let support: Vec<QubitId> = obs.iter().map(|&q| QubitId(q)).collect();
        model.add_observable(Basis::X, support.clone());
        model.add_observable(Basis::Z, support);
    }
    for (color, group) in [red.as_slice(), green.as_slice(), blue.as_slice()]
        .into_iter()
        .enumerate()
    {
        for &support in group {
            let support: Vec<Option<QubitId>> =
                support.iter().map(|&q| Some(QubitId(q))).collect();
            let plaq = model.add_plaquette(support.clone(), color as u8);
            for basis in [Basis::X, Basis::Z] {
                let ch = model.add_check(basis, support.clone())?;
                model.set_check_color(ch, color as u8);
                model.assign_plaquette(ch, plaq)?;
            }
        }
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hexagonal_d3_counts() {
        let model = make_hexagonal(3, false).unwrap();
        // Distance-3 triangular patch: 7 data qubits, 3 plaquettes.
        assert_eq!(model.num_data_qubits(), 7);
        assert_eq!(model.plaquettes().len(), 3);
        assert_eq!(model.checks().len(), 6);
        for check in model.checks() {
            assert!(check.is_scheduled());
            assert_eq!(check.depth(), 6);
        }
        assert_eq!(model.observables(Basis::X).len(), 1);
        assert_eq!(model.observables(Basis::Z).len(), 1);
    }

    #[test]
    fn test_hexagonal_both_at_once_schedules() {
        let model = make_hexagonal(3, true).unwrap();
        for check in model.checks() {
            assert_eq!(check.depth(), 7, "combined schedules span seven slots");
        }
        // Within a plaquette the X and Z member never collide on a slot.
        for plaq in model.plaquettes() {
            let cx = model.plaquette_member(plaq.id, Basis::X).unwrap();
            let cz = model.plaquette_member(plaq.id, Basis::Z).unwrap();
            for q in model.check(cx).support_qubits() {
                assert_ne!(
                    model.check(cx).slot_of(q),
                    model.check(cz).slot_of(q),
                    "qubit {q} double-booked"
                );
            }
        }
    }

    #[test]
    fn test_hexagonal_plaquette_pairing() {
        let model = make_hexagonal(5, false).unwrap();
        for plaq in model.plaquettes() {
            assert_eq!(plaq.checks.len(), 2);
            let cx = model.plaquette_member(plaq.id, Basis::X).unwrap();
            let cz = model.plaquette_member(plaq.id, Basis::Z).unwrap();
            assert_eq!(model.check(cx).support, model.check(cz).support);
            assert_eq!(model.check(cx).color, Some(plaq.color));
        }
    }

    #[test]
    fn test_hycc_d4_structure() {
        let model = make_hycc_d4().unwrap();
        assert_eq!(model.num_data_qubits(), 24);
        assert_eq!(model.plaquettes().len(), 8);
        assert_eq!(model.checks().len(), 16);
        assert!(model.checks().iter().all(|c| !c.is_scheduled()));
        assert_eq!(model.observables(Basis::Z).len(), 8);
    }
}

//! Property-based tests for the F2 linear algebra.

use alsvid_code::f2::{kernel_basis, quotient_basis, row_basis, F2Matrix};
use proptest::prelude::*;

fn arb_matrix() -> impl Strategy<Value = F2Matrix> {
    (1_usize..=6, 1_usize..=6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(0_u8..=1, cols), rows)
            .prop_map(|rows| F2Matrix::from_rows(&rows))
    })
}

proptest! {
    #[test]
    fn kernel_vectors_are_annihilated(m in arb_matrix()) {
        for v in kernel_basis(&m) {
            for i in 0..m.num_rows() {
                let dot: u8 = (0..m.num_cols())
                    .map(|j| m.get(i, j) & v[j])
                    .fold(0, |acc, b| acc ^ b);
                prop_assert_eq!(dot, 0);
            }
        }
    }

    #[test]
    fn rank_nullity_holds(m in arb_matrix()) {
        prop_assert_eq!(m.rank() + kernel_basis(&m).len(), m.num_cols());
    }

    #[test]
    fn row_basis_spans_the_row_space(m in arb_matrix()) {
        let basis = row_basis(&m);
        prop_assert_eq!(basis.len(), m.rank());
        if !basis.is_empty() {
            prop_assert_eq!(F2Matrix::from_rows(&basis).rank(), m.rank());
        }
    }

    #[test]
    fn quotient_completes_to_full_rank(m in arb_matrix()) {
        let basis = row_basis(&m);
        let quo = quotient_basis(&basis, m.num_cols());
        prop_assert_eq!(basis.len() + quo.len(), m.num_cols());
        let mut all = basis;
        all.extend(quo);
        if !all.is_empty() {
            prop_assert_eq!(F2Matrix::from_rows(&all).rank(), m.num_cols());
        }
    }

    #[test]
    fn transpose_preserves_rank(m in arb_matrix()) {
        prop_assert_eq!(m.rank(), m.transpose().rank());
    }
}

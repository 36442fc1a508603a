//! Dense linear algebra over F2.
//!
//! Used to derive logical-operator representatives for product-constructed
//! codes: row reduction, row/kernel bases, and quotient (complement) bases.

/// A dense matrix over F2, one byte per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F2Matrix {
    rows: usize,
    cols: usize,
    bits: Vec<u8>,
}

impl F2Matrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            bits: vec![0; rows * cols],
        }
    }

    /// Build from row vectors. All rows must share one length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == cols));
        Self {
            rows: rows.len(),
            cols,
            bits: rows.iter().flat_map(|r| r.iter().map(|&b| b & 1)).collect(),
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Entry at (i, j).
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.bits[i * self.cols + j]
    }

    /// Set entry at (i, j).
    pub fn set(&mut self, i: usize, j: usize, v: u8) {
        self.bits[i * self.cols + j] = v & 1;
    }

    /// Row `i` as a vector.
    pub fn row(&self, i: usize) -> Vec<u8> {
        self.bits[i * self.cols..(i + 1) * self.cols].to_vec()
    }

    /// The transpose.
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.set(j, i, self.get(i, j));
            }
        }
        t
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.bits.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    fn xor_row_into(&mut self, src: usize, dst: usize) {
        for j in 0..self.cols {
            self.bits[dst * self.cols + j] ^= self.bits[src * self.cols + j];
        }
    }

    /// Reduced row-echelon form and the pivot column indices.
    pub fn rref(&self) -> (F2Matrix, Vec<usize>) {
        let mut a = self.clone();
        let mut pivots = vec![];
        let mut p = 0;
        for k in 0..a.cols {
            if p >= a.rows {
                break;
            }
            if a.get(p, k) == 0 {
                let Some(swap) = (p + 1..a.rows).find(|&i| a.get(i, k) == 1) else {
                    continue;
                };
                a.swap_rows(p, swap);
            }
            pivots.push(k);
            for i in 0..a.rows {
                if i != p && a.get(i, k) == 1 {
                    a.xor_row_into(p, i);
                }
            }
            p += 1;
        }
        (a, pivots)
    }

    /// Rank over F2.
    pub fn rank(&self) -> usize {
        self.rref().1.len()
    }
}

/// A basis for the row space: the nonzero rows of the reduced echelon form.
pub fn row_basis(m: &F2Matrix) -> Vec<Vec<u8>> {
    let (r, pivots) = m.rref();
    (0..pivots.len()).map(|p| r.row(p)).collect()
}

/// A basis for the kernel (null space) of `m`.
pub fn kernel_basis(m: &F2Matrix) -> Vec<Vec<u8>> {
    let (a, pivots) = m.rref();
    let mut basis = vec![];
    for j in 0..a.num_cols() {
        if pivots.contains(&j) {
            continue;
        }
        let mut v = vec![0u8; a.num_cols()];
        v[j] = 1;
        for (i, &pc) in pivots.iter().enumerate() {
            v[pc] = a.get(i, j);
        }
        basis.push(v);
    }
    basis
}

/// A basis for F2^n / span(`basis`): unit vectors independent of the span.
///
/// Pivots the columns of [B | I] and keeps the identity columns that
/// survive, so the returned vectors complete `basis` to all of F2^n.
pub fn quotient_basis(basis: &[Vec<u8>], n: usize) -> Vec<Vec<u8>> {
    let mut echelon: Vec<Vec<u8>> = vec![];
    let reduce = |mut v: Vec<u8>, echelon: &mut Vec<Vec<u8>>, keep: bool| -> Option<Vec<u8>> {
        for e in echelon.iter() {
            let lead = e.iter().position(|&b| b == 1)?;
            if v[lead] == 1 {
                for (vi, ei) in v.iter_mut().zip(e.iter()) {
                    *vi ^= ei;
                }
            }
        }
        if v.iter().all(|&b| b == 0) {
            return None;
        }
        if keep {
            echelon.push(v.clone());
            echelon.sort_by_key(|e| e.iter().position(|&b| b == 1));
            Some(v)
        } else {
            echelon.push(v);
            echelon.sort_by_key(|e| e.iter().position(|&b| b == 1));
            None
        }
    };
    for b in basis {
        debug_assert_eq!(b.len(), n);
        reduce(b.clone(), &mut echelon, false);
    }
    let mut quo = vec![];
    for j in 0..n {
        let mut unit = vec![0u8; n];
        unit[j] = 1;
        if reduce(unit.clone(), &mut echelon, true).is_some() {
            quo.push(unit);
        }
    }
    quo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rref_identity() {
        let m = F2Matrix::from_rows(&[vec![1, 0], vec![0, 1]]);
        let (r, pivots) = m.rref();
        assert_eq!(r, m);
        assert_eq!(pivots, vec![0, 1]);
    }

    #[test]
    fn test_rref_dependent_rows() {
        // Row 2 = row 0 + row 1.
        let m = F2Matrix::from_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]]);
        let (_, pivots) = m.rref();
        assert_eq!(pivots.len(), 2);
        assert_eq!(m.rank(), 2);
    }

    #[test]
    fn test_kernel_vectors_annihilate() {
        let m = F2Matrix::from_rows(&[vec![1, 1, 0, 1], vec![0, 1, 1, 0]]);
        let ker = kernel_basis(&m);
        assert_eq!(ker.len(), 2);
        for v in &ker {
            for i in 0..m.num_rows() {
                let dot: u8 = (0..m.num_cols()).map(|j| m.get(i, j) & v[j]).sum::<u8>() & 1;
                assert_eq!(dot, 0, "kernel vector {v:?} fails row {i}");
            }
        }
    }

    #[test]
    fn test_quotient_completes_basis() {
        let basis = vec![vec![1, 1, 0], vec![0, 1, 1]];
        let quo = quotient_basis(&basis, 3);
        assert_eq!(quo.len(), 1);
        // Together they span F2^3.
        let mut all = basis.clone();
        all.extend(quo);
        assert_eq!(F2Matrix::from_rows(&all).rank(), 3);
    }

    #[test]
    fn test_quotient_of_full_space_is_empty() {
        let basis = vec![vec![1, 0], vec![1, 1]];
        assert!(quotient_basis(&basis, 2).is_empty());
    }
}

//! Classical regular-LDPC seed codes.
//!
//! Builds (r, c, s)-regular bipartite Tanner graphs by progressive edge
//! growth, which tends to maximize girth, and exports their parity-check
//! matrices. These seed the hypergraph-product construction.

use rustc_hash::FxHashSet;

use crate::f2::F2Matrix;

/// A classical bipartite Tanner graph: bits on one side, checks on the other.
#[derive(Debug, Clone)]
pub struct SeedGraph {
    num_bits: usize,
    num_checks: usize,
    /// Per bit, the checks it participates in.
    bit_adj: Vec<Vec<usize>>,
    /// Per check, the bits it constrains.
    check_adj: Vec<Vec<usize>>,
}

impl SeedGraph {
    /// An edgeless graph with the given shape.
    pub fn new(num_bits: usize, num_checks: usize) -> Self {
        Self {
            num_bits,
            num_checks,
            bit_adj: vec![vec![]; num_bits],
            check_adj: vec![vec![]; num_checks],
        }
    }

    /// Number of bits.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Number of checks.
    pub fn num_checks(&self) -> usize {
        self.num_checks
    }

    /// Connect bit `b` and check `c`.
    pub fn add_edge(&mut self, b: usize, c: usize) {
        self.bit_adj[b].push(c);
        self.check_adj[c].push(b);
    }

    fn remove_edge(&mut self, b: usize, c: usize) {
        self.bit_adj[b].retain(|&x| x != c);
        self.check_adj[c].retain(|&x| x != b);
    }

    /// Whether bit `b` and check `c` are connected.
    pub fn has_edge(&self, b: usize, c: usize) -> bool {
        self.bit_adj[b].contains(&c)
    }

    /// Checks adjacent to bit `b`.
    pub fn checks_of_bit(&self, b: usize) -> &[usize] {
        &self.bit_adj[b]
    }

    /// Bits adjacent to check `c`.
    pub fn bits_of_check(&self, c: usize) -> &[usize] {
        &self.check_adj[c]
    }

    /// The parity-check matrix: one row per check, one column per bit.
    pub fn parity_check_matrix(&self) -> F2Matrix {
        let mut h = F2Matrix::zeros(self.num_checks, self.num_bits);
        for (c, bits) in self.check_adj.iter().enumerate() {
            for &b in bits {
                h.set(c, b, 1);
            }
        }
        h
    }
}

/// Make a Tanner graph with `c * s` bits and `r * s` checks such that each
/// bit is connected to `r` checks and each check to `c` bits, attempting to
/// achieve high girth via progressive edge growth.
pub fn make_regular_tanner_graph(r: usize, c: usize, s: usize) -> SeedGraph {
    let mut gr = SeedGraph::new(c * s, r * s);
    for b in 0..c * s {
        progressive_edge_growth(&mut gr, b, r);
    }
    gr
}

/// Add `degree` edges from bit `b`, each time choosing the check that is
/// farthest from `b`'s current neighborhood (deepest terrace), breaking
/// ties toward minimum check degree.
fn progressive_edge_growth(gr: &mut SeedGraph, b: usize, degree: usize) {
    for k in 0..degree {
        let candidates: Vec<usize> = if k == 0 {
            (0..gr.num_checks()).collect()
        } else {
            let (compl, _) = terrace_search(gr, b);
            compl.into_iter().collect()
        };
        let min_degree = candidates
            .iter()
            .map(|&c| gr.bits_of_check(c).len())
            .min()
            .unwrap_or(0);
        let mut best: Option<(usize, usize)> = None;
        for &cand in &candidates {
            if gr.bits_of_check(cand).len() != min_degree {
                continue;
            }
            let depth = lookahead(gr, b, cand);
            match best {
                Some((_, d)) if d >= depth => {}
                _ => best = Some((cand, depth)),
            }
        }
        if let Some((cand, _)) = best {
            gr.add_edge(b, cand);
        }
    }
}

/// Expand BFS terraces from bit `b`'s check neighborhood until the next
/// terrace would cover every check or stops growing. Returns the complement
/// of the last strict terrace and the search depth.
fn terrace_search(gr: &SeedGraph, b: usize) -> (FxHashSet<usize>, usize) {
    let mut curr: FxHashSet<usize> = gr.checks_of_bit(b).iter().copied().collect();
    let mut compl: FxHashSet<usize> = (0..gr.num_checks()).filter(|c| !curr.contains(c)).collect();
    let mut depth = 0;
    while curr.len() < gr.num_checks() {
        let mut next = FxHashSet::default();
        for &x in &curr {
            for &y in gr.bits_of_check(x) {
                for &z in gr.checks_of_bit(y) {
                    next.insert(z);
                }
            }
        }
        if next.len() == gr.num_checks() || next.len() == curr.len() {
            break;
        }
        compl = (0..gr.num_checks()).filter(|c| !next.contains(c)).collect();
        curr = next;
        depth += 1;
    }
    (compl, depth)
}

/// Search depth that would result from adding edge (b, c). Deeper is better.
fn lookahead(gr: &mut SeedGraph, b: usize, c: usize) -> usize {
    gr.add_edge(b, c);
    let (_, depth) = terrace_search(gr, b);
    gr.remove_edge(b, c);
    depth
}

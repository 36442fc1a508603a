//! Hypergraph-product code construction.
//!
//! Takes a classical seed code and forms the product: data qubits live on
//! (bit, bit) and (check, check) pairs, Z stabilizers on (bit, check) pairs,
//! X stabilizers on (check, bit) pairs. Logical observables are derived from
//! kernel and quotient bases of the seed's parity-check matrix.

use rustc_hash::FxHashMap;

use crate::error::CodeResult;
use crate::f2::{kernel_basis, quotient_basis, row_basis, F2Matrix};
use crate::ldpc::SeedGraph;
use crate::model::{Basis, QubitId, TannerModel};

/// A node of the product lattice: either side copies the seed's node list
/// (bits first, then checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SeedNode {
    Bit(usize),
    Check(usize),
}

/// Build the hypergraph-product Tanner model of `seed`.
pub fn make_hypergraph_product(seed: &SeedGraph) -> CodeResult<TannerModel> {
    let nodes: Vec<SeedNode> = (0..seed.num_bits())
        .map(SeedNode::Bit)
        .chain((0..seed.num_checks()).map(SeedNode::Check))
        .collect();

    // First pass: classify product nodes.
    let mut data: Vec<(SeedNode, SeedNode)> = vec![];
    let mut xstab: Vec<(SeedNode, SeedNode)> = vec![];
    let mut zstab: Vec<(SeedNode, SeedNode)> = vec![];
    let mut prod_map: FxHashMap<(SeedNode, SeedNode), usize> = FxHashMap::default();
    for &i in &nodes {
        for &j in &nodes {
            match (i, j) {
                (SeedNode::Bit(_), SeedNode::Bit(_)) | (SeedNode::Check(_), SeedNode::Check(_)) => {
                    prod_map.insert((i, j), data.len());
                    data.push((i, j));
                }
                (SeedNode::Bit(_), SeedNode::Check(_)) => zstab.push((i, j)),
                (SeedNode::Check(_), SeedNode::Bit(_)) => xstab.push((i, j)),
            }
        }
    }

    let has_edge = |u: SeedNode, v: SeedNode| match (u, v) {
        (SeedNode::Bit(b), SeedNode::Check(c)) | (SeedNode::Check(c), SeedNode::Bit(b)) => {
            seed.has_edge(b, c)
        }
        _ => false,
    };

    // A data qubit (i, j) supports a stabilizer (x, y) if either
    //   (1) (i, x) is a seed edge and j == y, or
    //   (2) (j, y) is a seed edge and i == x.
    let support_of = |&(x, y): &(SeedNode, SeedNode)| -> Vec<Option<QubitId>> {
        data.iter()
            .enumerate()
            .filter(|&(_, &(i, j))| (has_edge(i, x) && j == y) || (has_edge(j, y) && i == x))
            .map(|(k, _)| Some(QubitId(k as u32)))
            .collect()
    };

    let mut model = TannerModel::new();
    for k in 0..data.len() {
        model.add_data_qubit(QubitId(k as u32))?;
    }
    let (x_obs, z_obs) = observables(seed, &data, &xstab, &zstab, &prod_map);
    for obs in x_obs {
        model.add_observable(Basis::X, obs);
    }
    for obs in z_obs {
        model.add_observable(Basis::Z, obs);
    }
    for s in &xstab {
        model.add_check(Basis::X, support_of(s))?;
    }
    for s in &zstab {
        model.add_check(Basis::Z, support_of(s))?;
    }
    Ok(model)
}

/// Logical observables of the product code.
///
/// X observables: { Fn/row(H) x ker(H) | 0 } U { 0 | ker(Ht) x Fm/row(Ht) }
/// Z observables: { ker(H) x Fn/row(H) | 0 } U { 0 | Fm/row(Ht) x ker(Ht) }
///
/// The kernel factor sits on the coordinate a stabilizer of the opposite
/// type sweeps with a parity-check row, so every overlap is even.
fn observables(
    seed: &SeedGraph,
    data: &[(SeedNode, SeedNode)],
    xstab: &[(SeedNode, SeedNode)],
    zstab: &[(SeedNode, SeedNode)],
    prod_map: &FxHashMap<(SeedNode, SeedNode), usize>,
) -> (Vec<Vec<QubitId>>, Vec<Vec<QubitId>>) {
    let h = seed.parity_check_matrix();
    let ht = h.transpose();
    let ker_h = kernel_basis(&h);
    let ker_ht = kernel_basis(&ht);
    let nquo = quotient_basis(&row_basis(&h), h.num_cols());
    let mquo = quotient_basis(&row_basis(&ht), ht.num_cols());

    let bits: Vec<SeedNode> = (0..seed.num_bits()).map(SeedNode::Bit).collect();
    let checks: Vec<SeedNode> = (0..seed.num_checks()).map(SeedNode::Check).collect();

    let cartprod = |lhs: &[Vec<u8>], rhs: &[Vec<u8>], vertices: &[SeedNode]| -> Vec<Vec<QubitId>> {
        let mut obs_list = vec![];
        for v in lhs {
            for w in rhs {
                let mut obs = vec![];
                for (i, &vi) in v.iter().enumerate() {
                    if vi == 0 {
                        continue;
                    }
                    for (j, &wj) in w.iter().enumerate() {
                        if wj == 0 {
                            continue;
                        }
                        obs.push(QubitId(prod_map[&(vertices[i], vertices[j])] as u32));
                    }
                }
                obs_list.push(obs);
            }
        }
        obs_list
    };

    let mut x_obs = cartprod(&nquo, &ker_h, &bits);
    x_obs.extend(cartprod(&ker_ht, &mquo, &checks));
    let mut z_obs = cartprod(&ker_h, &nquo, &bits);
    z_obs.extend(cartprod(&mquo, &ker_ht, &checks));

    // Keep as many representatives as there are logical qubits, largest
    // support first.
    let nlq = data.len().saturating_sub(xstab.len() + zstab.len());
    x_obs.sort_by(|a, b| b.len().cmp(&a.len()));
    z_obs.sort_by(|a, b| b.len().cmp(&a.len()));
    x_obs.truncate(nlq);
    z_obs.truncate(nlq);
    (x_obs, z_obs)
}

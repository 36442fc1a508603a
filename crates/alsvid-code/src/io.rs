//! Plain-text Tanner-graph serialization.
//!
//! One line per check, `<X|Z><index>,<qubit>,<qubit>,...`; observable lines
//! carry an `O` prefix. Example (not a real code):
//!
//! ```text
//! Z0,0,1,2
//! Z1,2,3,4
//! X0,1,2,3
//! OZ0,0,1,3
//! ```
//!
//! The reader collects every referenced data qubit first so that check
//! ancillas are numbered above the largest label; checks are then added
//! X-basis first, in file order, matching the writer.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{CodeError, CodeResult};
use crate::model::{Basis, QubitId, TannerModel};

/// Parse a Tanner-graph model from text.
pub fn parse_tanner_graph(input: &str) -> CodeResult<TannerModel> {
    let mut model = TannerModel::new();
    let mut x_supports: Vec<Vec<Option<QubitId>>> = vec![];
    let mut z_supports: Vec<Vec<Option<QubitId>>> = vec![];

    for (lineno, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = lineno + 1;
        let mut fields = line.split(',');
        let head = fields.next().unwrap_or_default();
        let support = fields
            .map(|tok| {
                tok.trim()
                    .parse::<u32>()
                    .map(QubitId)
                    .map_err(|_| CodeError::Parse {
                        line: lineno,
                        message: format!("bad qubit label `{tok}`"),
                    })
            })
            .collect::<CodeResult<Vec<QubitId>>>()?;
        if support.is_empty() {
            return Err(CodeError::Parse {
                line: lineno,
                message: "declaration has no support".into(),
            });
        }
        for &q in &support {
            model.add_data_qubit(q)?;
        }
        let (is_obs, rest) = match head.strip_prefix(['O', 'o']) {
            Some(rest) => (true, rest),
            None => (false, head),
        };
        let basis = match rest.chars().next() {
            Some('X' | 'x') => Basis::X,
            Some('Z' | 'z') => Basis::Z,
            _ => {
                return Err(CodeError::Parse {
                    line: lineno,
                    message: format!("bad declaration head `{head}`"),
                });
            }
        };
        // The index after the basis letter is decorative; it only has to
        // be numeric.
        if rest[1..].parse::<u32>().is_err() {
            return Err(CodeError::Parse {
                line: lineno,
                message: format!("bad declaration index in `{head}`"),
            });
        }
        if is_obs {
            model.add_observable(basis, support);
        } else {
            let support = support.into_iter().map(Some).collect();
            match basis {
                Basis::X => x_supports.push(support),
                Basis::Z => z_supports.push(support),
            }
        }
    }
    for support in x_supports {
        model.add_check(Basis::X, support)?;
    }
    for support in z_supports {
        model.add_check(Basis::Z, support)?;
    }
    Ok(model)
}

/// Read a Tanner-graph model from a file.
pub fn read_tanner_graph_file(path: impl AsRef<Path>) -> CodeResult<TannerModel> {
    let mut input = String::new();
    File::open(path)?.read_to_string(&mut input)?;
    parse_tanner_graph(&input)
}

/// Write a Tanner-graph model as text.
pub fn write_tanner_graph<W: Write>(model: &TannerModel, mut w: W) -> CodeResult<()> {
    let (mut x_ctr, mut z_ctr) = (0, 0);
    for check in model.checks() {
        match check.basis {
            Basis::X => {
                write!(w, "X{x_ctr}")?;
                x_ctr += 1;
            }
            Basis::Z => {
                write!(w, "Z{z_ctr}")?;
                z_ctr += 1;
            }
        }
        for q in check.support_qubits() {
            write!(w, ",{}", q.0)?;
        }
        writeln!(w)?;
    }
    for basis in [Basis::X, Basis::Z] {
        for (i, obs) in model.observables(basis).iter().enumerate() {
            write!(w, "O{}{i}", if basis == Basis::X { 'X' } else { 'Z' })?;
            for q in obs {
                write!(w, ",{}", q.0)?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Write a Tanner-graph model to a file.
pub fn write_tanner_graph_file(model: &TannerModel, path: impl AsRef<Path>) -> CodeResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_tanner_graph(model, &mut w)?;
    w.flush()?;
    Ok(())
}

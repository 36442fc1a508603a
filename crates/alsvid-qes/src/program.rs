//! QES instruction-stream programs.
//!
//! A program is an ordered list of statements in the line-oriented QES
//! format: operations render as `opcode a,b,...;`, metadata as
//! `@annotation name` / `@property name value`, comments with a leading
//! `#`. Operand lists double as qubit ids (gates, measurements) and as
//! measurement-record or event indices (`event`, `obs`).

use std::fmt;
use std::io::{self, Write};

/// Operation opcodes in the QES format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Reset qubits to |0⟩.
    Reset,
    /// Hadamard on each operand.
    H,
    /// CNOT on consecutive (control, target) operand pairs.
    Cx,
    /// Measure each operand in the Z basis.
    Measure,
    /// Declare a detection event: event index, then measurement records.
    Event,
    /// Declare an observable: observable index, then measurement records.
    Obs,
}

impl Opcode {
    /// The opcode's mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Reset => "reset",
            Opcode::H => "h",
            Opcode::Cx => "cx",
            Opcode::Measure => "measure",
            Opcode::Event => "event",
            Opcode::Obs => "obs",
        }
    }
}

/// One line of a QES program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// An operation with its operand list.
    Op {
        /// The opcode.
        opcode: Opcode,
        /// Operands; never empty.
        operands: Vec<u32>,
    },
    /// `@annotation <name>` attached to the following operation.
    Annotation(String),
    /// `@property <name> <value>` attached to the following operation.
    Property {
        /// Property key.
        name: String,
        /// Property value.
        value: i64,
    },
    /// A `#` comment line.
    Comment(String),
    /// A block comment (comment framed by bare `#` lines).
    BlockComment(String),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Op { opcode, operands } => {
                write!(f, "{} ", opcode.name())?;
                for (i, op) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{op}")?;
                }
                write!(f, ";")
            }
            Statement::Annotation(name) => write!(f, "@annotation {name}"),
            Statement::Property { name, value } => write!(f, "@property {name} {value}"),
            Statement::Comment(text) => write!(f, "# {text}"),
            Statement::BlockComment(text) => write!(f, "#\n# {text} \n#"),
        }
    }
}

/// An ordered QES instruction stream.
#[derive(Debug, Clone, Default)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// The statements in emission order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Append an operation. An empty operand list is a no-op.
    pub fn op(&mut self, opcode: Opcode, operands: Vec<u32>) {
        if operands.is_empty() {
            return;
        }
        self.statements.push(Statement::Op { opcode, operands });
    }

    /// Append an `@annotation` line.
    pub fn annotation(&mut self, name: impl Into<String>) {
        self.statements.push(Statement::Annotation(name.into()));
    }

    /// Append an `@property` line.
    pub fn property(&mut self, name: impl Into<String>, value: i64) {
        self.statements.push(Statement::Property {
            name: name.into(),
            value,
        });
    }

    /// Append a comment line.
    pub fn comment(&mut self, text: impl Into<String>) {
        self.statements.push(Statement::Comment(text.into()));
    }

    /// Append a framed block comment.
    pub fn block_comment(&mut self, text: impl Into<String>) {
        self.statements.push(Statement::BlockComment(text.into()));
    }

    /// All operations, skipping metadata and comments.
    pub fn ops(&self) -> impl Iterator<Item = (Opcode, &[u32])> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Op { opcode, operands } => Some((*opcode, operands.as_slice())),
            _ => None,
        })
    }

    /// All operations with the given opcode.
    pub fn ops_of(&self, opcode: Opcode) -> impl Iterator<Item = &[u32]> {
        self.ops()
            .filter_map(move |(op, args)| (op == opcode).then_some(args))
    }

    /// Serialize the program to a writer.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for statement in &self.statements {
            writeln!(w, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

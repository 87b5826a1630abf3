//! Genoscope VM - a scope-driven virtual CPU for linear genetic programs
//!
//! The genome is a flat sequence of fixed-shape instructions, yet it
//! behaves like a nested-block language: every structured instruction
//! carries a numeric scope argument, and the interpreter reconstructs
//! conditionals, loops, function bodies, and scoped register snapshots
//! from those numbers alone. There are no block terminators; a block
//! ends where the next structured instruction declares a scope at or
//! below it.
//!
//! ## Layout
//!
//! - [`Op`] / [`Instruction`] / [`Genome`]: the instruction set
//! - [`InstLib`]: names, arities, descriptions, argument aliases
//! - [`Interpreter`]: CPU state, the scope engine, and dispatch
//! - [`listing`]: the indented textual genome form
//!
//! ## Example
//!
//! ```
//! use genoscope::vm::{Interpreter, Op};
//!
//! let mut cpu = Interpreter::new();
//! cpu.push_op(Op::SetReg, 0, 7, 0);
//! cpu.push_op(Op::SetReg, 1, 3, 0);
//! cpu.push_op(Op::Add, 0, 1, 2);
//! cpu.process(3);
//! assert_eq!(cpu.reg(2), 10.0);
//! ```

mod instruction;
mod interpreter;
mod library;
pub mod listing;
mod op;

pub use instruction::{Genome, Instruction};
pub use interpreter::{Interpreter, RegBackup, ScopeFrame, ScopeType, VmConfig};
pub use library::{InstEntry, InstLib};
pub use listing::{genome_to_string, parse_genome, read_genome, write_genome, ParseError};
pub use op::Op;

/// Register count; also sizes the I/O buffers, the auxiliary stacks,
/// and the function-id space.
pub const REGS: usize = 16;

/// Arguments carried by every instruction.
pub const INST_ARGS: usize = 3;

/// Capacity of each auxiliary stack; a push past it is dropped.
pub const STACK_CAP: usize = 16;

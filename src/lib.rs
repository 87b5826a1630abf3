//! # Genoscope - a linear genetic programming virtual machine
//!
//! A register CPU whose program, the *genome*, is a flat sequence of
//! 25 fixed-shape instructions. Control flow is scope-driven: structured
//! instructions (`If`, `While`, `Countdown`, `Define`, `Scope`) carry a
//! numeric scope argument and the interpreter rebuilds nesting from
//! those numbers at run time, with no end markers in the instruction
//! stream. That keeps every mutation of every position executable, the
//! property linear GP depends on.
//!
//! ## Core pieces
//!
//! - **Instruction set**: [`Op`], [`Instruction`], [`Genome`]
//! - **Scope engine**: loop-back, function return, forward skip, and
//!   scoped register restoration, all inferred from scope numbers
//! - **Instruction library**: [`InstLib`], the shared name/arity/alias
//!   registry behind the textual form
//! - **Listings**: an indented, re-parseable rendering of a genome
//!   (`vm::listing`, [`loader`])
//!
//! ## Example
//!
//! ```
//! use genoscope::{Interpreter, Op};
//!
//! let mut cpu = Interpreter::new();
//! cpu.push_op(Op::SetReg, 0, 3, 0);   // r0 = 3
//! cpu.push_op(Op::SetReg, 1, 0, 0);   // r1 = 0
//! cpu.push_op(Op::Countdown, 0, 1, 0); // repeat while r0 != 0
//! cpu.push_op(Op::Inc, 1, 0, 0);      //   r1 += 1
//! cpu.push_op(Op::Scope, 0, 0, 0);    // closes the loop body
//! cpu.process(9);
//! assert_eq!(cpu.reg(1), 3.0);
//! ```
//!
//! Execution never fails: division by zero bumps an error counter,
//! out-of-range register arguments wrap, stale function calls are
//! no-ops, and falling off the genome end wraps back to the start.
//! Bound execution by the number of steps you hand to
//! [`Interpreter::process`].

// The virtual machine: instruction set, scope engine, interpreter,
// listings.
pub mod vm;
pub use vm::{
    // Core types
    Genome, InstEntry, InstLib, Instruction, Interpreter, Op, VmConfig,
    // Scope engine state
    RegBackup, ScopeFrame, ScopeType,
    // Listing form
    genome_to_string, parse_genome, ParseError,
    // Bounds
    INST_ARGS, REGS, STACK_CAP,
};

// Error types
mod error;
pub use error::{GenoscopeError, Result};

// Genome file helpers
pub mod loader;
pub use loader::{load_path, load_string, save_path};

//! Op - Opcode definitions for the Genoscope VM
//!
//! The opcode set is fixed: 25 executable operations covering register
//! arithmetic, comparisons, scope-structured control flow, function
//! definition/call, the per-register auxiliary stacks, and I/O buffers.
//! Mutation draws uniformly from `Op::ALL`; there is no trap opcode, so
//! every instruction a genome can hold is executable.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operation opcode.
///
/// Display names, arities, and descriptions live in the instruction
/// library ([`InstLib`](crate::vm::InstLib)); the interpreter dispatches
/// on the variant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Op {
    /// Increment a register
    Inc,
    /// Decrement a register
    Dec,
    /// Logically toggle a register (0 <-> 1)
    Not,
    /// Set a register to a literal value
    SetReg,
    /// regs[c] = regs[a] + regs[b]
    Add,
    /// regs[c] = regs[a] - regs[b]
    Sub,
    /// regs[c] = regs[a] * regs[b]
    Mult,
    /// regs[c] = regs[a] / regs[b]; counts an error when regs[b] is zero
    Div,
    /// Modulo slot; behaviour is governed by `VmConfig::remainder_mod`
    Mod,
    /// regs[c] = (regs[a] == regs[b])
    TestEqu,
    /// regs[c] = (regs[a] != regs[b])
    TestNEqu,
    /// regs[c] = (regs[a] < regs[b])
    TestLess,
    /// Enter scope args[1] when regs[args[0]] is nonzero, else skip it
    If,
    /// Loop scope args[1] while regs[args[0]] is nonzero
    While,
    /// Like While, but decrements the test register on each body entry
    Countdown,
    /// Skip forward past the end of scope args[0]
    Break,
    /// Enter (or unwind to) scope args[0]
    Scope,
    /// Record a function body in scope args[1] under id args[0]
    Define,
    /// Invoke the function recorded under id args[0]
    Call,
    /// Push regs[args[0]] onto auxiliary stack args[1]
    Push,
    /// Pop auxiliary stack args[0] into regs[args[1]]
    Pop,
    /// regs[args[1]] = inputs[args[0]]
    Input,
    /// outputs[args[1]] = regs[args[0]]
    Output,
    /// regs[args[1]] = regs[args[0]]
    CopyVal,
    /// Snapshot regs[args[0]]; restored when the current scope exits
    ScopeReg,
}

impl Op {
    /// Every opcode, in declaration order. Uniform random instruction
    /// draws index into this table.
    pub const ALL: [Op; 25] = [
        Op::Inc,
        Op::Dec,
        Op::Not,
        Op::SetReg,
        Op::Add,
        Op::Sub,
        Op::Mult,
        Op::Div,
        Op::Mod,
        Op::TestEqu,
        Op::TestNEqu,
        Op::TestLess,
        Op::If,
        Op::While,
        Op::Countdown,
        Op::Break,
        Op::Scope,
        Op::Define,
        Op::Call,
        Op::Push,
        Op::Pop,
        Op::Input,
        Op::Output,
        Op::CopyVal,
        Op::ScopeReg,
    ];

    /// Number of opcodes (the exclusive bound for random draws).
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this opcode in `Op::ALL`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Opcode at `index`, or `None` past the end of the set.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this opcode opens a scope (has a nonzero declared scope).
    pub const fn is_structured(self) -> bool {
        matches!(
            self,
            Op::If | Op::While | Op::Countdown | Op::Define | Op::Scope
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::vm::InstLib::global().name_of(*self))
    }
}

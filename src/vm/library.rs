//! InstLib - the instruction library
//!
//! A process-wide registry mapping each opcode to its display name,
//! declared arity, and human description, plus a table of named argument
//! literals. Only the genome printer and parser consult it; the
//! interpreter dispatches on [`Op`] directly.
//!
//! The argument table holds two alias families for each register index
//! `i` in `0..16`: the decimal numeral `"i"` and the register alias
//! `"Reg<A+i>"` (so `"RegA"` is 0 and `"RegP"` is 15).

use super::Op;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Metadata for one opcode.
#[derive(Debug, Clone, Copy)]
pub struct InstEntry {
    /// Opcode this entry describes
    pub op: Op,
    /// Display name used by the printer and parser
    pub name: &'static str,
    /// Declared arity (how many arguments are printed and parsed)
    pub num_args: usize,
    /// Human description
    pub description: &'static str,
}

/// The instruction library.
///
/// Immutable after construction; use [`InstLib::global`] for the shared
/// process-wide instance.
pub struct InstLib {
    /// Entries indexed by `Op::index()`.
    entries: Vec<InstEntry>,
    /// Display name -> opcode.
    name_map: HashMap<&'static str, Op>,
    /// Named argument literal -> value.
    arg_map: HashMap<String, i32>,
}

impl InstLib {
    /// The shared library instance, built once on first use.
    pub fn global() -> &'static InstLib {
        static LIB: OnceLock<InstLib> = OnceLock::new();
        LIB.get_or_init(InstLib::build)
    }

    fn build() -> Self {
        let mut lib = Self {
            entries: Vec::with_capacity(Op::COUNT),
            name_map: HashMap::new(),
            arg_map: HashMap::new(),
        };

        lib.add(Op::Inc, "Inc", 1, "Increment value in register specified by Arg1");
        lib.add(Op::Dec, "Dec", 1, "Decrement value in register specified by Arg1");
        lib.add(Op::Not, "Not", 1, "Logically toggle value in register specified by Arg1");
        lib.add(Op::SetReg, "SetReg", 2, "Set Arg1 to numerical value of Arg2");
        lib.add(Op::Add, "Add", 3, "Arg3 = Arg1 + Arg2");
        lib.add(Op::Sub, "Sub", 3, "Arg3 = Arg1 - Arg2");
        lib.add(Op::Mult, "Mult", 3, "Arg3 = Arg1 * Arg2");
        lib.add(Op::Div, "Div", 3, "Arg3 = Arg1 / Arg2");
        lib.add(Op::Mod, "Mod", 3, "Arg3 = Arg1 % Arg2");
        lib.add(Op::TestEqu, "TestEqu", 3, "Arg3 = (Arg1 == Arg2)");
        lib.add(Op::TestNEqu, "TestNEqu", 3, "Arg3 = (Arg1 != Arg2)");
        lib.add(Op::TestLess, "TestLess", 3, "Arg3 = (Arg1 < Arg2)");
        lib.add(Op::If, "If", 2, "If Arg1 != 0, enter scope Arg2; else skip over scope");
        lib.add(Op::While, "While", 2, "Until Arg1 != 0, repeat scope Arg2; else skip over scope");
        lib.add(Op::Countdown, "Countdown", 3, "Countdown Arg1 to zero; scope to Arg2");
        lib.add(Op::Break, "Break", 1, "Break out of scope Arg1");
        lib.add(Op::Scope, "Scope", 1, "Set scope to Arg1");
        lib.add(Op::Define, "Define", 2, "Build a function called Arg1 in scope Arg2");
        lib.add(Op::Call, "Call", 1, "Call previously defined function called Arg1");
        lib.add(Op::Push, "Push", 2, "Push register Arg1 onto stack Arg2");
        lib.add(Op::Pop, "Pop", 2, "Pop stack Arg1 into register Arg2");
        lib.add(Op::Input, "Input", 2, "Pull next value from input buffer Arg1 into register Arg2");
        lib.add(Op::Output, "Output", 2, "Push reg Arg1 into output buffer Arg2");
        lib.add(Op::CopyVal, "CopyVal", 2, "Copy reg Arg1 into reg Arg2");
        lib.add(Op::ScopeReg, "ScopeReg", 1, "Backup reg Arg1; restore at end of scope");

        // Args can be named by value or as a register.
        for i in 0..super::REGS {
            lib.add_arg(i.to_string(), i as i32);
            lib.add_arg(format!("Reg{}", (b'A' + i as u8) as char), i as i32);
        }

        lib
    }

    fn add(&mut self, op: Op, name: &'static str, num_args: usize, description: &'static str) {
        debug_assert_eq!(self.entries.len(), op.index());
        self.entries.push(InstEntry { op, name, num_args, description });
        self.name_map.insert(name, op);
    }

    fn add_arg(&mut self, name: String, value: i32) {
        self.arg_map.insert(name, value);
    }

    /// Display name of an opcode.
    pub fn name_of(&self, op: Op) -> &'static str {
        self.entries[op.index()].name
    }

    /// Declared arity of an opcode.
    pub fn num_args(&self, op: Op) -> usize {
        self.entries[op.index()].num_args
    }

    /// Human description of an opcode.
    pub fn description(&self, op: Op) -> &'static str {
        self.entries[op.index()].description
    }

    /// Full metadata entry of an opcode.
    pub fn entry(&self, op: Op) -> &InstEntry {
        &self.entries[op.index()]
    }

    /// Resolve a display name back to its opcode.
    pub fn op_by_name(&self, name: &str) -> Option<Op> {
        self.name_map.get(name).copied()
    }

    /// Resolve a named argument literal.
    pub fn arg_by_name(&self, name: &str) -> Option<i32> {
        self.arg_map.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_op_registered() {
        let lib = InstLib::global();
        for op in Op::ALL {
            let entry = lib.entry(op);
            assert_eq!(entry.op, op);
            assert!(entry.num_args <= 3);
            assert!(!entry.description.is_empty());
            assert_eq!(lib.op_by_name(entry.name), Some(op));
        }
    }

    #[test]
    fn test_arities() {
        let lib = InstLib::global();
        assert_eq!(lib.num_args(Op::Inc), 1);
        assert_eq!(lib.num_args(Op::SetReg), 2);
        assert_eq!(lib.num_args(Op::Add), 3);
        assert_eq!(lib.num_args(Op::If), 2);
        // Countdown declares a third, unused argument.
        assert_eq!(lib.num_args(Op::Countdown), 3);
        assert_eq!(lib.num_args(Op::Break), 1);
        assert_eq!(lib.num_args(Op::Call), 1);
        assert_eq!(lib.num_args(Op::ScopeReg), 1);
    }

    #[test]
    fn test_arg_aliases() {
        let lib = InstLib::global();
        assert_eq!(lib.arg_by_name("0"), Some(0));
        assert_eq!(lib.arg_by_name("15"), Some(15));
        assert_eq!(lib.arg_by_name("RegA"), Some(0));
        assert_eq!(lib.arg_by_name("RegC"), Some(2));
        assert_eq!(lib.arg_by_name("RegP"), Some(15));
        assert_eq!(lib.arg_by_name("RegQ"), None);
        assert_eq!(lib.arg_by_name("16"), None);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(InstLib::global().op_by_name("Jump"), None);
        assert_eq!(InstLib::global().op_by_name("inc"), None);
    }

    #[test]
    fn test_global_is_singleton() {
        let a = InstLib::global() as *const InstLib;
        let b = InstLib::global() as *const InstLib;
        assert_eq!(a, b);
    }
}

//! Interpreter - the virtual CPU executing a genome
//!
//! State is a fixed-width register file plus input/output buffers, one
//! bounded auxiliary value stack per register, a function-entry table,
//! and the scope engine's three stacks. A tick fetches the instruction
//! under the pointer, dispatches it, and advances the pointer; falling
//! off the end of the genome wraps to position 0 after collapsing every
//! non-root scope. Execution never aborts: the only runtime failure,
//! division or modulo by zero, bumps a counter and moves on.

mod scope;

pub use scope::{RegBackup, ScopeFrame, ScopeType};

use super::{listing, Genome, Instruction, Op, REGS, STACK_CAP};
use crate::error::GenoscopeError;
use rand::Rng;
use std::io;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interpreter configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VmConfig {
    /// When set, `Mod` computes a true remainder. The default mirrors
    /// the historical hardware, where `Mod` divides; archived genomes
    /// were evolved against that behaviour.
    pub remainder_mod: bool,
}

/// The scope-driven virtual CPU.
pub struct Interpreter {
    genome: Genome,
    regs: [f64; REGS],
    inputs: [f64; REGS],
    outputs: [f64; REGS],
    stacks: [Vec<f64>; REGS],
    /// Genome position of each function's Define, -1 when undefined
    fun_starts: [i32; REGS],
    inst_ptr: usize,
    scope_stack: Vec<ScopeFrame>,
    reg_stack: Vec<RegBackup>,
    call_stack: Vec<usize>,
    errors: usize,
    config: VmConfig,
}

/// Register index from a raw instruction argument.
fn reg_idx(arg: i32) -> usize {
    arg as usize % REGS
}

fn random_inst<R: Rng>(rng: &mut R) -> Instruction {
    Instruction::new(
        Op::ALL[rng.gen_range(0..Op::COUNT)],
        rng.gen_range(0..REGS as i32),
        rng.gen_range(0..REGS as i32),
        rng.gen_range(0..REGS as i32),
    )
}

impl Interpreter {
    pub fn new() -> Self {
        let mut cpu = Self {
            genome: Genome::new(),
            regs: [0.0; REGS],
            inputs: [0.0; REGS],
            outputs: [0.0; REGS],
            stacks: std::array::from_fn(|_| Vec::new()),
            fun_starts: [-1; REGS],
            inst_ptr: 0,
            scope_stack: vec![ScopeFrame::new(0, ScopeType::Root, 0)],
            reg_stack: Vec::new(),
            call_stack: Vec::new(),
            errors: 0,
            config: VmConfig::default(),
        };
        cpu.reset_hardware();
        cpu
    }

    pub fn with_config(config: VmConfig) -> Self {
        let mut cpu = Self::new();
        cpu.config = config;
        cpu
    }

    pub fn config(&self) -> VmConfig {
        self.config
    }

    // === Lifecycle ===

    /// Clear the genome and reset the hardware.
    pub fn reset(&mut self) {
        self.genome.clear();
        self.reset_hardware();
    }

    /// Reset the CPU state but keep the genome.
    ///
    /// Registers come back initialized to their own index, so `regs[0]`
    /// is 0 and `regs[11]` is 11.
    pub fn reset_hardware(&mut self) {
        for i in 0..REGS {
            self.regs[i] = i as f64;
            self.inputs[i] = 0.0;
            self.outputs[i] = 0.0;
            self.stacks[i].clear();
            self.fun_starts[i] = -1;
        }
        self.errors = 0;
        // Snapshots must not leak into the fresh register file.
        self.reg_stack.clear();
        self.reset_ip();
    }

    /// Rewind the instruction pointer, forcibly exiting every non-root
    /// scope and dropping pending returns.
    pub fn reset_ip(&mut self) {
        self.inst_ptr = 0;
        while self.scope_stack.len() > 1 {
            self.exit_scope();
        }
        self.call_stack.clear();
    }

    // === Genome lifecycle ===

    pub fn push_inst(&mut self, inst: Instruction) {
        self.genome.push(inst);
    }

    pub fn push_op(&mut self, op: Op, a0: i32, a1: i32, a2: i32) {
        self.genome.push(Instruction::new(op, a0, a1, a2));
    }

    /// Append `count` uniformly random instructions.
    pub fn push_random<R: Rng>(&mut self, rng: &mut R, count: usize) {
        for _ in 0..count {
            self.genome.push(random_inst(rng));
        }
    }

    pub fn set_inst(&mut self, pos: usize, inst: Instruction) {
        self.genome[pos] = inst;
    }

    pub fn set_op(&mut self, pos: usize, op: Op, a0: i32, a1: i32, a2: i32) {
        self.genome[pos].set(op, a0, a1, a2);
    }

    pub fn set_genome(&mut self, genome: Genome) {
        self.genome = genome;
    }

    /// Overwrite position `pos` with a uniformly random instruction.
    pub fn randomize_inst<R: Rng>(&mut self, pos: usize, rng: &mut R) {
        self.genome[pos] = random_inst(rng);
    }

    // === Accessors ===

    pub fn inst(&self, pos: usize) -> Instruction {
        self.genome[pos]
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn genome_len(&self) -> usize {
        self.genome.len()
    }

    pub fn reg(&self, id: usize) -> f64 {
        self.regs[id]
    }

    pub fn input(&self, id: usize) -> f64 {
        self.inputs[id]
    }

    pub fn output(&self, id: usize) -> f64 {
        self.outputs[id]
    }

    pub fn ip(&self) -> usize {
        self.inst_ptr
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn set_input(&mut self, id: usize, value: f64) {
        self.inputs[id] = value;
    }

    /// Fill the input buffer from a slice; extra values are ignored.
    pub fn set_inputs(&mut self, values: &[f64]) {
        for (slot, value) in self.inputs.iter_mut().zip(values) {
            *slot = *value;
        }
    }

    // === Execution ===

    /// One fetch/dispatch/advance cycle.
    pub fn single_process(&mut self) {
        if self.inst_ptr >= self.genome.len() {
            self.reset_ip();
            if self.genome.is_empty() {
                return;
            }
        }
        let inst = self.genome[self.inst_ptr];
        self.process_inst(inst);
        self.inst_ptr += 1;
    }

    /// Run `num_insts` cycles.
    pub fn process(&mut self, num_insts: usize) {
        for _ in 0..num_insts {
            self.single_process();
        }
    }

    /// Dispatch one instruction against the current state.
    ///
    /// The pointer is not advanced here; that is the tick's job. The
    /// scope engine relies on this split when it re-dispatches a loop
    /// header or a return target.
    pub fn process_inst(&mut self, inst: Instruction) {
        let [a0, a1, a2] = inst.args;
        match inst.op {
            Op::Inc => self.regs[reg_idx(a0)] += 1.0,
            Op::Dec => self.regs[reg_idx(a0)] -= 1.0,
            Op::Not => {
                let r = reg_idx(a0);
                self.regs[r] = if self.regs[r] == 0.0 { 1.0 } else { 0.0 };
            }
            Op::SetReg => self.regs[reg_idx(a0)] = a1 as f64,
            Op::Add => self.regs[reg_idx(a2)] = self.reg_val(a0) + self.reg_val(a1),
            Op::Sub => self.regs[reg_idx(a2)] = self.reg_val(a0) - self.reg_val(a1),
            Op::Mult => self.regs[reg_idx(a2)] = self.reg_val(a0) * self.reg_val(a1),

            Op::Div => {
                let denom = self.reg_val(a1);
                if denom == 0.0 {
                    self.errors += 1;
                } else {
                    self.regs[reg_idx(a2)] = self.reg_val(a0) / denom;
                }
            }

            Op::Mod => {
                let base = self.reg_val(a1);
                if base == 0.0 {
                    self.errors += 1;
                } else if self.config.remainder_mod {
                    self.regs[reg_idx(a2)] = self.reg_val(a0) % base;
                } else {
                    self.regs[reg_idx(a2)] = self.reg_val(a0) / base;
                }
            }

            Op::TestEqu => {
                self.regs[reg_idx(a2)] = flag(self.reg_val(a0) == self.reg_val(a1));
            }
            Op::TestNEqu => {
                self.regs[reg_idx(a2)] = flag(self.reg_val(a0) != self.reg_val(a1));
            }
            Op::TestLess => {
                self.regs[reg_idx(a2)] = flag(self.reg_val(a0) < self.reg_val(a1));
            }

            // args[0] = test register, args[1] = scope
            Op::If => {
                if self.enter_or_exit(a1, ScopeType::Basic) && self.reg_val(a0) == 0.0 {
                    self.bypass_scope(a1);
                }
            }

            Op::While => {
                if self.enter_or_exit(a1, ScopeType::Loop) && self.reg_val(a0) == 0.0 {
                    self.bypass_scope(a1);
                }
            }

            Op::Countdown => {
                if self.enter_or_exit(a1, ScopeType::Loop) {
                    if self.reg_val(a0) == 0.0 {
                        self.bypass_scope(a1);
                    } else {
                        self.regs[reg_idx(a0)] -= 1.0;
                    }
                }
            }

            Op::Break => self.bypass_scope(a0),
            Op::Scope => {
                self.enter_or_exit(a0, ScopeType::Basic);
            }

            Op::Define => {
                if self.enter_or_exit(a1, ScopeType::Basic) {
                    self.fun_starts[reg_idx(a0)] = self.inst_ptr as i32;
                    // The body only runs when called.
                    self.bypass_scope(a1);
                }
            }

            Op::Call => {
                let def_pos = self.fun_starts[reg_idx(a0)];
                if def_pos < 0 {
                    return;
                }
                let def_pos = def_pos as usize;
                // The definition may have been mutated away since it ran.
                if def_pos >= self.genome.len() || self.genome[def_pos].op != Op::Define {
                    return;
                }
                // Re-enter the function's original scope; the entry fails
                // if an enclosing scope still has to unwind first.
                let fun_scope = self.genome[def_pos].args[1];
                if self.enter_or_exit(fun_scope, ScopeType::Function) {
                    self.call_stack.push(self.inst_ptr + 1);
                    self.inst_ptr = def_pos + 1;
                }
            }

            Op::Push => {
                let value = self.reg_val(a0);
                self.push_stack(reg_idx(a1), value);
            }
            Op::Pop => self.regs[reg_idx(a1)] = self.pop_stack(reg_idx(a0)),
            Op::Input => self.regs[reg_idx(a1)] = self.inputs[reg_idx(a0)],
            Op::Output => self.outputs[reg_idx(a1)] = self.regs[reg_idx(a0)],
            Op::CopyVal => self.regs[reg_idx(a1)] = self.regs[reg_idx(a0)],

            Op::ScopeReg => {
                let r = reg_idx(a0);
                self.reg_stack.push(RegBackup {
                    scope: self.cur_scope(),
                    reg_id: r,
                    value: self.regs[r],
                });
            }
        }
    }

    fn reg_val(&self, arg: i32) -> f64 {
        self.regs[reg_idx(arg)]
    }

    fn push_stack(&mut self, id: usize, value: f64) {
        if self.stacks[id].len() >= STACK_CAP {
            return;
        }
        self.stacks[id].push(value);
    }

    fn pop_stack(&mut self, id: usize) -> f64 {
        self.stacks[id].pop().unwrap_or(0.0)
    }

    // === Textual form ===

    /// Write the genome's textual form, indented by scope.
    pub fn print_genome<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        listing::write_genome(&self.genome, out)
    }

    /// The genome's textual form as a string.
    pub fn genome_string(&self) -> String {
        listing::genome_to_string(&self.genome)
    }

    /// Replace the genome with one parsed from `input`.
    pub fn load<R: io::BufRead>(&mut self, input: R) -> Result<(), GenoscopeError> {
        self.genome = listing::read_genome(input)?;
        Ok(())
    }
}

fn flag(test: bool) -> f64 {
    if test {
        1.0
    } else {
        0.0
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

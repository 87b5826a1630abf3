//! Genome file loading - a thin convenience layer over the listing form
//!
//! The interpreter itself only speaks streams ([`Interpreter::load`] and
//! [`Interpreter::print_genome`](crate::vm::Interpreter::print_genome));
//! this module adds path-based helpers for tools that keep genomes on
//! disk.
//!
//! [`Interpreter::load`]: crate::vm::Interpreter::load

use crate::vm::{listing, Genome};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a genome from a listing file.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Genome> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read genome file {}", path.display()))?;
    listing::parse_genome(&source)
        .with_context(|| format!("Failed to parse genome file {}", path.display()))
}

/// Parse a genome from in-memory listing text.
pub fn load_string(source: &str) -> Result<Genome> {
    Ok(listing::parse_genome(source)?)
}

/// Write a genome to a listing file.
pub fn save_path<P: AsRef<Path>>(path: P, genome: &Genome) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, listing::genome_to_string(genome))
        .with_context(|| format!("Failed to write genome file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{Instruction, Op};

    #[test]
    fn test_load_string() {
        let genome = load_string("SetReg 0 7\nInc 0\n").unwrap();
        assert_eq!(
            genome,
            vec![
                Instruction::new(Op::SetReg, 0, 7, 0),
                Instruction::new(Op::Inc, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn test_load_string_reports_line() {
        let err = load_string("Inc 0\nNope 1\n").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_save_and_load_path() {
        let genome = vec![
            Instruction::new(Op::While, 0, 1, 0),
            Instruction::new(Op::Dec, 0, 0, 0),
            Instruction::new(Op::Scope, 0, 0, 0),
        ];
        let path = std::env::temp_dir().join("genoscope_loader_test.gen");
        save_path(&path, &genome).unwrap();
        let reloaded = load_path(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(reloaded, genome);
    }

    #[test]
    fn test_load_missing_path() {
        assert!(load_path("/nonexistent/genoscope.gen").is_err());
    }
}

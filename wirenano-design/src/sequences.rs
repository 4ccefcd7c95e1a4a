/*
wirenano, automated scaffold routing for wireframe DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Scaffold and staple sequences.

use super::{ScaffoldSequenceError, Staples};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

pub const DEFAULT_SCAFFOLD_LENGTH: usize = 7249;
const DEFAULT_SCAFFOLD_SEED: u64 = 7249;

/// A sequence of `length` random bases drawn from `seed`.
///
/// Sequences drawn from the same seed share their prefix.
pub fn random_scaffold(length: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length)
        .map(|_| ['A', 'C', 'G', 'T'][rng.gen_range(0..4)])
        .collect()
}

/// The scaffold used when no sequence is given, for circuits of at most
/// `DEFAULT_SCAFFOLD_LENGTH` bases.
///
/// It is generated from a fixed seed the first time it is needed, so every run uses the same
/// sequence.
pub fn default_scaffold() -> &'static str {
    static DEFAULT_SCAFFOLD: OnceLock<String> = OnceLock::new();
    DEFAULT_SCAFFOLD.get_or_init(|| random_scaffold(DEFAULT_SCAFFOLD_LENGTH, DEFAULT_SCAFFOLD_SEED))
}

/// Upper case `sequence` and remove its whitespaces, checking that it only contains nucleotides.
pub fn normalize_sequence(sequence: &str) -> Result<String, ScaffoldSequenceError> {
    let mut ret = String::with_capacity(sequence.len());
    for (position, base) in sequence.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let base = base.to_ascii_uppercase();
        if !matches!(base, 'A' | 'C' | 'G' | 'T' | 'U') {
            return Err(ScaffoldSequenceError::InvalidBase { position, base });
        }
        ret.push(base);
    }
    if ret.is_empty() {
        Err(ScaffoldSequenceError::Empty)
    } else {
        Ok(ret)
    }
}

/// The scaffold sequence fitted to a circuit of `circuit_length` bases.
///
/// Without a sequence, the default scaffold is used if the circuit fits in it and a random
/// sequence of exactly `circuit_length` bases otherwise. A given sequence shorter than the
/// circuit is repeated, a longer one is truncated. Fails if the lengths differ by more than
/// `tolerance`.
pub fn prepare_scaffold_sequence(
    sequence: Option<&str>,
    circuit_length: usize,
    tolerance: Option<usize>,
) -> Result<String, ScaffoldSequenceError> {
    let sequence = match sequence {
        Some(sequence) => normalize_sequence(sequence)?,
        None if circuit_length > DEFAULT_SCAFFOLD_LENGTH => {
            log::info!(
                "The scaffold has {} bases, more than the {} of the default scaffold, using a random sequence",
                circuit_length,
                DEFAULT_SCAFFOLD_LENGTH
            );
            return Ok(random_scaffold(circuit_length, DEFAULT_SCAFFOLD_SEED));
        }
        None => default_scaffold().to_string(),
    };
    let sequence_length = sequence.len();
    let difference = sequence_length.abs_diff(circuit_length);
    if let Some(tolerance) = tolerance.filter(|t| difference > *t) {
        return Err(ScaffoldSequenceError::LengthMismatch {
            circuit_length,
            sequence_length,
            tolerance,
        });
    }
    if sequence_length > circuit_length {
        log::warn!(
            "The scaffold sequence has {} bases, only the first {} are used",
            sequence_length,
            circuit_length
        );
    } else if sequence_length < circuit_length {
        log::warn!(
            "The scaffold sequence has {} bases but the scaffold has {}, the sequence is repeated",
            sequence_length,
            circuit_length
        );
    }
    Ok(sequence.chars().cycle().take(circuit_length).collect())
}

/// True if the sequence is RNA.
pub fn is_rna(sequence: &str) -> bool {
    sequence.contains('U')
}

pub fn complement(base: char, rna: bool) -> char {
    match base {
        'A' if rna => 'U',
        'A' => 'T',
        'T' | 'U' => 'A',
        'G' => 'C',
        'C' => 'G',
        _ => '?',
    }
}

/// The 5' to 3' sequence of the strand paired with `sequence`.
pub fn reverse_complement(sequence: &str, rna: bool) -> String {
    sequence.chars().rev().map(|b| complement(b, rna)).collect()
}

/// Set the sequence of every staple to the reverse complement of the scaffold bases it is paired
/// with.
pub fn fill_staple_sequences(staples: &mut Staples, scaffold: &str) {
    let rna = is_rna(scaffold);
    for staple in staples.iter_mut() {
        staple.sequence = scaffold
            .get(staple.start..staple.end)
            .map(|s| reverse_complement(s, rna))
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scaffold_is_stable() {
        let scaffold = default_scaffold();
        assert_eq!(scaffold.len(), DEFAULT_SCAFFOLD_LENGTH);
        assert_eq!(scaffold, default_scaffold());
        assert!(normalize_sequence(scaffold).is_ok());
    }

    #[test]
    fn long_circuits_get_a_random_scaffold() {
        let length = DEFAULT_SCAFFOLD_LENGTH + 751;
        let scaffold = prepare_scaffold_sequence(None, length, Some(0)).unwrap();
        assert_eq!(scaffold.len(), length);
        assert!(scaffold.starts_with(default_scaffold()));
        // The default scaffold is not repeated
        assert_ne!(&scaffold[DEFAULT_SCAFFOLD_LENGTH..], &default_scaffold()[..751]);
        assert_eq!(
            scaffold,
            prepare_scaffold_sequence(None, length, None).unwrap()
        );
    }

    #[test]
    fn short_circuits_use_the_default_scaffold() {
        let scaffold = prepare_scaffold_sequence(None, 300, None).unwrap();
        assert_eq!(scaffold, &default_scaffold()[..300]);
        let full = prepare_scaffold_sequence(None, DEFAULT_SCAFFOLD_LENGTH, None).unwrap();
        assert_eq!(full, default_scaffold());
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_sequence("ac gt\nu").unwrap(), "ACGTU");
        assert_eq!(
            normalize_sequence("ACGXT"),
            Err(ScaffoldSequenceError::InvalidBase {
                position: 3,
                base: 'X'
            })
        );
        assert_eq!(normalize_sequence(" \n"), Err(ScaffoldSequenceError::Empty));
    }

    #[test]
    fn short_sequences_are_repeated() {
        assert_eq!(
            prepare_scaffold_sequence(Some("ACGT"), 10, None).unwrap(),
            "ACGTACGTAC"
        );
    }

    #[test]
    fn long_sequences_are_truncated() {
        assert_eq!(
            prepare_scaffold_sequence(Some("ACGTACGT"), 5, Some(3)).unwrap(),
            "ACGTA"
        );
        assert_eq!(
            prepare_scaffold_sequence(Some("ACGTACGT"), 4, Some(3)),
            Err(ScaffoldSequenceError::LengthMismatch {
                circuit_length: 4,
                sequence_length: 8,
                tolerance: 3
            })
        );
    }

    #[test]
    fn complements() {
        assert_eq!(reverse_complement("AACGT", false), "ACGTT");
        assert_eq!(reverse_complement("AACGU", true), "ACGUU");
    }
}

//! Synthetic FASTA sequences for producing benchmark inputs.
//!
//! Sequences are uniform random strings over `ACGT`, named `Sequence_1`,
//! `Sequence_2`, ... The generator is seeded from a BLAKE3 hash of a seed
//! string, so the same seed always yields the same records.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BASES: [u8; 4] = *b"ATCG";

/// One named FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: String,
}

/// Generate `count` random sequences of `length` bases.
pub fn generate_sequences(count: usize, length: usize, seed: &str) -> Vec<FastaRecord> {
    let seed_bytes = blake3::hash(seed.as_bytes());
    let mut rng = StdRng::from_seed(*seed_bytes.as_bytes());

    (1..=count)
        .map(|i| {
            let sequence: String = (0..length)
                .map(|_| BASES[rng.gen_range(0..BASES.len())] as char)
                .collect();
            FastaRecord {
                name: format!("Sequence_{i}"),
                sequence,
            }
        })
        .collect()
}

/// Write records as `>name` header lines each followed by one sequence line.
pub fn write_fasta<W: Write>(records: &[FastaRecord], mut out: W) -> io::Result<()> {
    for r in records {
        writeln!(out, ">{}", r.name)?;
        writeln!(out, "{}", r.sequence)?;
    }
    out.flush()
}

/// Write records to a FASTA file, replacing it if present.
pub fn save_fasta(records: &[FastaRecord], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_fasta(records, io::BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {} sequences to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_shape() {
        let records = generate_sequences(5, 50, "seed");
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].name, "Sequence_1");
        assert_eq!(records[4].name, "Sequence_5");
        for r in &records {
            assert_eq!(r.sequence.len(), 50);
            assert!(r.sequence.bytes().all(|b| BASES.contains(&b)));
        }
    }

    #[test]
    fn same_seed_same_sequences() {
        assert_eq!(generate_sequences(3, 40, "a"), generate_sequences(3, 40, "a"));
        assert_ne!(generate_sequences(3, 40, "a"), generate_sequences(3, 40, "b"));
    }

    #[test]
    fn zero_length_and_zero_count() {
        assert!(generate_sequences(0, 10, "x").is_empty());
        let empty = generate_sequences(2, 0, "x");
        assert!(empty.iter().all(|r| r.sequence.is_empty()));
    }

    #[test]
    fn fasta_layout() {
        let records = vec![
            FastaRecord {
                name: "Sequence_1".into(),
                sequence: "ACGT".into(),
            },
            FastaRecord {
                name: "Sequence_2".into(),
                sequence: "TTAA".into(),
            },
        ];
        let mut buf = Vec::new();
        write_fasta(&records, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ">Sequence_1\nACGT\n>Sequence_2\nTTAA\n"
        );
    }

    #[test]
    fn save_fasta_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sequences.fasta");
        save_fasta(&generate_sequences(2, 8, "s"), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with(">Sequence_1\n"));
    }
}

//! Binary manifest of move-table fingerprints.
//!
//! The legal-move index refines its lists in place and relies on the static
//! tables keeping their layout. The manifest records, per (board type, piece
//! set), a fingerprint of the compacted index so a later build can tell
//! whether the layout changed.
//!
//! Format:
//! - Header (32 bytes):
//!   - Magic: "PTM1" (4 bytes)
//!   - Version: u32 LE (4 bytes)
//!   - Entry count: u64 LE (8 bytes)
//!   - Checksum: u64 LE xxhash of data section (8 bytes)
//!   - Reserved: 8 bytes (zeros)
//! - Data section (entry_count × 18 bytes):
//!   - Board type index: u8
//!   - Piece set index: u8
//!   - Move count including null: u32 LE
//!   - Compacted index length: u32 LE
//!   - Fingerprint: u64 LE
//!
//! Entries are sorted by (board type, piece set).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use polytile_core::{BoardConst, BoardType, PieceSet};
use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

const MAGIC: &[u8; 4] = b"PTM1";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 32;
const ENTRY_SIZE: usize = 18;

/// xxh64 over the used part of the move array and the whole range table.
pub fn fingerprint(bc: &BoardConst) -> u64 {
    let precomp = bc.precomp_moves();
    let len = precomp.len();
    let mut data = Vec::with_capacity(len * 2 + precomp.ranges().len() * 8);
    for mv in &precomp.moves()[..len] {
        data.extend_from_slice(&mv.0.to_le_bytes());
    }
    for r in precomp.ranges() {
        data.extend_from_slice(&r.begin.to_le_bytes());
        data.extend_from_slice(&r.size.to_le_bytes());
    }
    xxh64(&data, 0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub board_type: BoardType,
    pub piece_set: PieceSet,
    pub nu_moves: u32,
    pub precomp_len: u32,
    pub fingerprint: u64,
}

impl ManifestEntry {
    pub fn from_table(bc: &BoardConst) -> Self {
        Self {
            board_type: bc.board_type(),
            piece_set: bc.piece_set(),
            nu_moves: bc.nu_moves() as u32,
            precomp_len: bc.precomp_moves().len() as u32,
            fingerprint: fingerprint(bc),
        }
    }

    fn key(&self) -> (usize, usize) {
        (self.board_type.index(), self.piece_set.index())
    }
}

/// Difference between a stored manifest and the current tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Drift {
    /// Same key, different counts or fingerprint.
    Changed { stored: ManifestEntry, current: ManifestEntry },
    /// Present now, not in the stored manifest.
    Added(ManifestEntry),
    /// In the stored manifest, not among the current tables.
    Missing(ManifestEntry),
}

pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Save entries to a manifest file. Returns the number written.
    pub fn save(path: &Path, entries: &[ManifestEntry]) -> io::Result<usize> {
        let mut entries = entries.to_vec();
        entries.sort_by_key(ManifestEntry::key);
        let count = entries.len();

        let mut data = Vec::with_capacity(count * ENTRY_SIZE);
        for e in &entries {
            data.push(e.board_type.index() as u8);
            data.push(e.piece_set.index() as u8);
            data.extend_from_slice(&e.nu_moves.to_le_bytes());
            data.extend_from_slice(&e.precomp_len.to_le_bytes());
            data.extend_from_slice(&e.fingerprint.to_le_bytes());
        }
        let checksum = xxh64(&data, 0);

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&(count as u64).to_le_bytes())?;
        writer.write_all(&checksum.to_le_bytes())?;
        writer.write_all(&[0u8; 8])?; // Reserved
        writer.write_all(&data)?;
        writer.flush()?;

        Ok(count)
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;
        if &header[0..4] != MAGIC {
            return Err(invalid("Invalid manifest magic".to_string()));
        }
        let version = u32::from_le_bytes(le_bytes(&header[4..8]));
        if version != VERSION {
            return Err(invalid(format!("Unsupported manifest version: {}", version)));
        }
        let count = u64::from_le_bytes(le_bytes(&header[8..16]));
        let stored_checksum = u64::from_le_bytes(le_bytes(&header[16..24]));

        // The count is untrusted until checked against the bytes on disk.
        let data_len = count
            .checked_mul(ENTRY_SIZE as u64)
            .filter(|&n| n <= file_len.saturating_sub(HEADER_SIZE as u64))
            .ok_or_else(|| invalid(format!("Manifest entry count {} exceeds file size", count)))?;
        let mut data = vec![0u8; data_len as usize];
        reader.read_exact(&mut data)?;
        if xxh64(&data, 0) != stored_checksum {
            return Err(invalid("Manifest checksum mismatch".to_string()));
        }

        let entries = data
            .chunks_exact(ENTRY_SIZE)
            .map(|chunk| {
                let board_type = *BoardType::ALL
                    .get(chunk[0] as usize)
                    .ok_or_else(|| invalid(format!("Invalid board type {}", chunk[0])))?;
                let piece_set = *PieceSet::ALL
                    .get(chunk[1] as usize)
                    .ok_or_else(|| invalid(format!("Invalid piece set {}", chunk[1])))?;
                Ok(ManifestEntry {
                    board_type,
                    piece_set,
                    nu_moves: u32::from_le_bytes(le_bytes(&chunk[2..6])),
                    precomp_len: u32::from_le_bytes(le_bytes(&chunk[6..10])),
                    fingerprint: u64::from_le_bytes(le_bytes(&chunk[10..18])),
                })
            })
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Manifest { entries })
    }

    /// Compare the stored entries with the current ones.
    pub fn compare(&self, current: &[ManifestEntry]) -> Vec<Drift> {
        let mut drift = Vec::new();
        for cur in current {
            match self.entries.iter().find(|e| e.key() == cur.key()) {
                Some(stored) if stored != cur => drift.push(Drift::Changed {
                    stored: *stored,
                    current: *cur,
                }),
                Some(_) => {}
                None => drift.push(Drift::Added(*cur)),
            }
        }
        for stored in &self.entries {
            if !current.iter().any(|e| e.key() == stored.key()) {
                drift.push(Drift::Missing(*stored));
            }
        }
        drift
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Copy a slice of known length into an array for `from_le_bytes`.
fn le_bytes<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(board_type: BoardType, piece_set: PieceSet, fingerprint: u64) -> ManifestEntry {
        ManifestEntry {
            board_type,
            piece_set,
            nu_moves: 100,
            precomp_len: 2000,
            fingerprint,
        }
    }

    #[test]
    fn test_manifest_roundtrip() {
        let path = std::env::temp_dir().join("test_polytile_manifest.bin");
        let entries = vec![
            entry(BoardType::Trigon, PieceSet::Trigon, 7),
            entry(BoardType::Duo, PieceSet::Junior, 42),
        ];

        let saved = Manifest::save(&path, &entries).unwrap();
        assert_eq!(saved, 2);

        let loaded = Manifest::load(&path).unwrap();
        // Sorted by key on save.
        assert_eq!(loaded.entries[0], entries[1]);
        assert_eq!(loaded.entries[1], entries[0]);
        assert!(loaded.compare(&entries).is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_corrupt_manifest_rejected() {
        let path = std::env::temp_dir().join("test_polytile_manifest_corrupt.bin");
        Manifest::save(&path, &[entry(BoardType::Classic, PieceSet::Classic, 1)]).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(&path, &bytes).unwrap();

        let err = Manifest::load(&path).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        // Entry counts that overflow or run past the end of the file.
        for count in [u64::MAX / 4, u64::MAX, 1000] {
            let mut bytes = Vec::new();
            bytes.extend_from_slice(MAGIC);
            bytes.extend_from_slice(&VERSION.to_le_bytes());
            bytes.extend_from_slice(&count.to_le_bytes());
            bytes.extend_from_slice(&0u64.to_le_bytes());
            bytes.extend_from_slice(&[0u8; 8]);
            bytes.extend_from_slice(&[0u8; ENTRY_SIZE]);
            std::fs::write(&path, &bytes).unwrap();

            let err = Manifest::load(&path).err().unwrap();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData, "count {}", count);
            assert!(err.to_string().contains("exceeds file size"));
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_compare_reports_drift() {
        let stored = Manifest {
            entries: vec![
                entry(BoardType::Duo, PieceSet::Classic, 1),
                entry(BoardType::Nexos, PieceSet::Nexos, 2),
            ],
        };
        let current = vec![
            entry(BoardType::Duo, PieceSet::Classic, 3),
            entry(BoardType::Duo, PieceSet::Junior, 4),
        ];
        let drift = stored.compare(&current);
        assert_eq!(drift.len(), 3);
        assert!(matches!(drift[0], Drift::Changed { .. }));
        assert_eq!(drift[1], Drift::Added(current[1]));
        assert_eq!(drift[2], Drift::Missing(stored.entries[1]));
    }

    #[test]
    fn test_fingerprint_stable() {
        let bc = BoardConst::new(BoardType::Duo, PieceSet::Junior);
        let again = BoardConst::new(BoardType::Duo, PieceSet::Junior);
        assert_eq!(fingerprint(&bc), fingerprint(&again));
        let other = BoardConst::new(BoardType::Duo, PieceSet::Classic);
        assert_ne!(fingerprint(&bc), fingerprint(&other));
    }
}

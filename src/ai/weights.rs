use once_cell::sync::Lazy;

use crate::board::Board;
use crate::error::WeightsError;
use crate::types::{COLUMNS, Cell, Color, NUM_CELLS, ROWS};

const MAGIC: &[u8; 4] = b"OWGT";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;
const PAYLOAD_SIZE: usize = NUM_CELLS * 4;

/// Built-in positional weights indexed `[col][row]`. Corners dominate,
/// cells diagonal to a corner are worth nothing.
const BUILTIN: [[i32; ROWS]; COLUMNS] = [
    [100, 5, 14, 13, 14, 5, 100],
    [5, 0, 11, 11, 11, 0, 5],
    [14, 11, 12, 12, 12, 11, 14],
    [13, 11, 12, 13, 12, 11, 13],
    [13, 11, 12, 13, 12, 11, 13],
    [13, 11, 12, 13, 12, 11, 13],
    [14, 11, 12, 12, 12, 11, 14],
    [5, 0, 11, 11, 11, 0, 5],
    [100, 5, 14, 13, 14, 5, 100],
];

/// Process-wide default table used by the search.
pub static DEFAULT_WEIGHTS: Lazy<WeightTable> = Lazy::new(|| WeightTable::from_matrix(BUILTIN));

/// Static leaf evaluator: sum of the weights of the cells owned by a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    weights: [[i32; ROWS]; COLUMNS],
}

impl WeightTable {
    pub fn from_matrix(weights: [[i32; ROWS]; COLUMNS]) -> Self {
        Self { weights }
    }

    pub fn weight(&self, col: usize, row: usize) -> i32 {
        self.weights[col][row]
    }

    /// Evaluate from `color`'s perspective. Opposing and empty cells count zero.
    pub fn evaluate(&self, board: &Board, color: Color) -> i32 {
        let mine = Cell::from(color);
        board
            .cells()
            .iter()
            .zip(self.weights.iter())
            .flat_map(|(cells, weights)| cells.iter().zip(weights.iter()))
            .filter(|&(&cell, _)| cell == mine)
            .map(|(_, &weight)| weight)
            .sum()
    }

    /// Deserialize a table from the `OWGT` binary format:
    /// magic, version, cell count, CRC32 of the payload, reserved word,
    /// then 63 little-endian `i32` weights in column-major order.
    pub fn from_bytes(data: &[u8]) -> Result<Self, WeightsError> {
        if data.len() < HEADER_SIZE {
            return Err(WeightsError::TooShort {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        if &data[0..4] != MAGIC {
            return Err(WeightsError::InvalidMagic);
        }

        let version = read_u32_le(data, 4);
        if version != VERSION {
            return Err(WeightsError::UnsupportedVersion {
                expected: VERSION,
                actual: version,
            });
        }

        let num_cells = read_u32_le(data, 8);
        if num_cells as usize != NUM_CELLS {
            return Err(WeightsError::CellCountMismatch(num_cells));
        }

        let expected_crc = read_u32_le(data, 12);
        let payload = &data[HEADER_SIZE..];
        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(WeightsError::CrcMismatch {
                expected: expected_crc,
                actual: actual_crc,
            });
        }

        if payload.len() != PAYLOAD_SIZE {
            return Err(WeightsError::PayloadLength(payload.len()));
        }

        let mut weights = [[0i32; ROWS]; COLUMNS];
        for (idx, chunk) in payload.chunks_exact(4).enumerate() {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            weights[idx / ROWS][idx % ROWS] = i32::from_le_bytes(bytes);
        }

        Ok(Self { weights })
    }

    /// Serialize into the format read by [`WeightTable::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload: Vec<u8> = self
            .weights
            .iter()
            .flatten()
            .flat_map(|w| w.to_le_bytes())
            .collect();

        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&(NUM_CELLS as u32).to_le_bytes());
        out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        *DEFAULT_WEIGHTS
    }
}

// Callers check `data.len() >= HEADER_SIZE` first.
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite_crc(bytes: &mut [u8]) {
        let crc = crc32fast::hash(&bytes[HEADER_SIZE..]);
        bytes[12..16].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn default_table_is_symmetric_with_heavy_corners() {
        let table = WeightTable::default();

        for col in 0..COLUMNS {
            for row in 0..ROWS {
                let w = table.weight(col, row);
                assert_eq!(w, table.weight(COLUMNS - 1 - col, row));
                assert_eq!(w, table.weight(col, ROWS - 1 - row));
            }
        }
        assert_eq!(table.weight(0, 0), 100);
        assert_eq!(table.weight(8, 6), 100);
        assert_eq!(table.weight(1, 1), 0);
    }

    #[test]
    fn evaluate_counts_only_the_given_color() {
        let board = Board::new();
        let table = WeightTable::default();

        // White (3,3)=13 + (4,4)=12, black (4,3)=13 + (3,4)=12.
        assert_eq!(table.evaluate(&board, Color::White), 25);
        assert_eq!(table.evaluate(&board, Color::Black), 25);

        let mut board = board;
        board.place(crate::types::Position { col: 5, row: 3 }, Color::White);
        assert_eq!(table.evaluate(&board, Color::White), 51);
        assert_eq!(table.evaluate(&board, Color::Black), 12);
    }

    #[test]
    fn from_bytes_reads_back_serialized_table() {
        let mut matrix = BUILTIN;
        matrix[2][5] = -40;
        let table = WeightTable::from_matrix(matrix);

        let parsed = WeightTable::from_bytes(&table.to_bytes()).expect("must parse");

        assert_eq!(parsed, table);
        assert_eq!(parsed.weight(2, 5), -40);
    }

    #[test]
    fn from_bytes_rejects_invalid_magic() {
        let mut bytes = WeightTable::default().to_bytes();
        bytes[0] = b'X';

        assert_eq!(WeightTable::from_bytes(&bytes), Err(WeightsError::InvalidMagic));
    }

    #[test]
    fn from_bytes_rejects_unsupported_version() {
        let mut bytes = WeightTable::default().to_bytes();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());

        let err = WeightTable::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn from_bytes_rejects_crc_mismatch() {
        let mut bytes = WeightTable::default().to_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let err = WeightTable::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("CRC32"));
    }

    #[test]
    fn from_bytes_rejects_truncated_payload_and_short_header() {
        let mut bytes = WeightTable::default().to_bytes();
        bytes.pop();
        rewrite_crc(&mut bytes);

        assert_eq!(
            WeightTable::from_bytes(&bytes),
            Err(WeightsError::PayloadLength(PAYLOAD_SIZE - 1))
        );
        assert!(matches!(
            WeightTable::from_bytes(&bytes[..10]),
            Err(WeightsError::TooShort { actual: 10, .. })
        ));
    }

    #[test]
    fn from_bytes_rejects_wrong_cell_count() {
        let mut bytes = WeightTable::default().to_bytes();
        bytes[8..12].copy_from_slice(&64u32.to_le_bytes());

        assert_eq!(
            WeightTable::from_bytes(&bytes),
            Err(WeightsError::CellCountMismatch(64))
        );
    }
}

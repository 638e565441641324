//! Synthetic Linke turbidity tables.

use std::io::Write;
use std::path::{Path, PathBuf};

use climatology::LinkeTable;
use tl_common::MONTHS_PER_YEAR;

/// Raw table bytes for a `rows x cols` table, laid out `[row][col][month]`.
///
/// `value(row, col, month)` gives the stored byte (turbidity x 20).
pub fn linke_table_bytes<F>(rows: usize, cols: usize, value: F) -> Vec<u8>
where
    F: Fn(usize, usize, usize) -> u8,
{
    let mut data = Vec::with_capacity(rows * cols * MONTHS_PER_YEAR);
    for row in 0..rows {
        for col in 0..cols {
            for month in 0..MONTHS_PER_YEAR {
                data.push(value(row, col, month));
            }
        }
    }
    data
}

/// Byte stored by [`gradient_linke_table`] at a table cell.
///
/// Turbidity climbs from 1.0 by 0.05 per row and per month, wrapping with
/// the column so every byte stays below 255.
pub fn gradient_byte(row: usize, col: usize, month: usize) -> u8 {
    (20 + (row + col) % 100 + month * 5) as u8
}

/// A table filled by [`gradient_byte`].
pub fn gradient_linke_table(rows: usize, cols: usize) -> LinkeTable {
    LinkeTable::from_bytes(rows, cols, linke_table_bytes(rows, cols, gradient_byte))
        .expect("generated table has a consistent shape")
}

/// Write raw table bytes to `dir/name` and return the path.
pub fn write_linke_table(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create table file");
    file.write_all(data).expect("Failed to write table file");
    path
}

//! Atomic TLB2 file output.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tl_common::{TlError, TlResult};
use tracing::info;

use crate::format::{encode, encoded_len, narrow};
use crate::types::QuantizedGrid;

/// Write a grid to `path`, replacing any existing file only on success.
///
/// The grid is encoded into a temporary file in the destination directory
/// and renamed into place once fully written and synced. Header widths are
/// checked before any directory or file is created. If writing fails the
/// temporary file is removed and `path` is untouched.
/// Returns the number of bytes written.
pub fn write_atomic<P: AsRef<Path>>(path: P, grid: &QuantizedGrid) -> TlResult<u64> {
    let path = path.as_ref();
    narrow(grid.metadata())?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".tlgrid-")
        .suffix(".tmp")
        .tempfile_in(parent)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        encode(grid, &mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| TlError::Io(e.error))?;

    let size = encoded_len(grid.metadata()) as u64;
    let meta = grid.metadata();
    info!(
        path = %path.display(),
        bytes = size,
        nlat = meta.nlat,
        nlon = meta.nlon,
        lat0 = meta.lat0,
        lon0 = meta.lon0,
        dlat = meta.dlat,
        dlon = meta.dlon,
        "Wrote turbidity grid"
    );

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::from_bytes;
    use crate::types::GridMetadata;

    fn grid(scale: u32) -> QuantizedGrid {
        let meta = GridMetadata {
            nlat: 2,
            nlon: 2,
            lat0: 0.5,
            lon0: 0.5,
            dlat: 1.0,
            dlon: 1.0,
            scale,
        };
        QuantizedGrid::new(meta, (0..48).collect()).unwrap()
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested/dir/tl.bin");

        let size = write_atomic(&path, &grid(20)).unwrap();
        assert_eq!(size, 28 + 48);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, size);
        assert_eq!(from_bytes(&bytes).unwrap(), grid(20));
    }

    #[test]
    fn test_failed_encode_leaves_nothing() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("tl.bin");

        let err = write_atomic(&path, &grid(300)).unwrap_err();
        assert!(matches!(err, TlError::EncodingOverflow { .. }));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_overflow_creates_no_directories() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("dist/monthly/tl.bin");

        let err = write_atomic(&path, &grid(300)).unwrap_err();
        assert!(matches!(err, TlError::EncodingOverflow { field: "scale", .. }));
        assert!(!temp_dir.path().join("dist").exists());
    }

    #[test]
    fn test_failed_encode_keeps_previous_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("tl.bin");

        write_atomic(&path, &grid(20)).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(write_atomic(&path, &grid(300)).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}

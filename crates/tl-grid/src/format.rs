//! TLB2 binary format.
//!
//! All multi-byte fields are little-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  magic "TLB2"
//!      4     2  version (u16) = 2
//!      6     2  nlat (u16)
//!      8     2  nlon (u16)
//!     10     1  scale (u8)
//!     11     1  reserved (u8) = 0
//!     12     4  lat0 (f32)
//!     16     4  lon0 (f32)
//!     20     4  dlat (f32)
//!     24     4  dlon (f32)
//!     28     -  payload, 12 * nlat * nlon bytes, month-major
//! ```

use std::io::{ErrorKind, Read, Write};

use tl_common::{TlError, TlResult};

use crate::types::{GridMetadata, QuantizedGrid};

/// Magic bytes at offset 0.
pub const MAGIC: &[u8; 4] = b"TLB2";

/// Format version written at offset 4.
pub const VERSION: u16 = 2;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 28;

/// Header fields narrowed to their on-disk widths.
pub(crate) struct Header {
    nlat: u16,
    nlon: u16,
    scale: u8,
}

/// Check header fields against their on-disk widths.
pub(crate) fn narrow(meta: &GridMetadata) -> TlResult<Header> {
    let nlat = u16::try_from(meta.nlat).map_err(|_| TlError::EncodingOverflow {
        field: "nlat",
        value: meta.nlat as u64,
        limit: u16::MAX as u64,
    })?;
    let nlon = u16::try_from(meta.nlon).map_err(|_| TlError::EncodingOverflow {
        field: "nlon",
        value: meta.nlon as u64,
        limit: u16::MAX as u64,
    })?;
    let scale = u8::try_from(meta.scale).map_err(|_| TlError::EncodingOverflow {
        field: "scale",
        value: meta.scale as u64,
        limit: u8::MAX as u64,
    })?;
    Ok(Header { nlat, nlon, scale })
}

/// Total encoded size of a grid in bytes.
pub fn encoded_len(meta: &GridMetadata) -> usize {
    HEADER_LEN + meta.volume_len()
}

/// Serialize a grid to a writer.
///
/// Field widths are checked before anything is written, so an overflow
/// leaves the writer untouched.
pub fn encode<W: Write>(grid: &QuantizedGrid, mut writer: W) -> TlResult<()> {
    let meta = grid.metadata();
    let header = narrow(meta)?;

    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&header.nlat.to_le_bytes())?;
    writer.write_all(&header.nlon.to_le_bytes())?;
    writer.write_all(&[header.scale, 0])?; // scale, reserved
    writer.write_all(&meta.lat0.to_le_bytes())?;
    writer.write_all(&meta.lon0.to_le_bytes())?;
    writer.write_all(&meta.dlat.to_le_bytes())?;
    writer.write_all(&meta.dlon.to_le_bytes())?;
    writer.write_all(grid.volume())?;

    Ok(())
}

/// Serialize a grid to an in-memory buffer.
pub fn to_bytes(grid: &QuantizedGrid) -> TlResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(encoded_len(grid.metadata()));
    encode(grid, &mut bytes)?;
    Ok(bytes)
}

fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> TlResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => TlError::invalid_format(format!("truncated {}", what)),
        _ => TlError::Io(e),
    })
}

/// Deserialize a grid from a reader.
///
/// The reader must end exactly at the end of the payload.
pub fn decode<R: Read>(mut reader: R) -> TlResult<QuantizedGrid> {
    let mut header = [0u8; HEADER_LEN];
    read_exact_or(&mut reader, &mut header, "header")?;

    if &header[0..4] != MAGIC {
        return Err(TlError::invalid_format(format!(
            "bad magic {:?}, expected {:?}",
            &header[0..4],
            MAGIC
        )));
    }

    let u16_at = |offset: usize| u16::from_le_bytes([header[offset], header[offset + 1]]);
    let f32_at = |offset: usize| {
        f32::from_le_bytes([
            header[offset],
            header[offset + 1],
            header[offset + 2],
            header[offset + 3],
        ])
    };

    let version = u16_at(4);
    if version != VERSION {
        return Err(TlError::invalid_format(format!(
            "unsupported version {}",
            version
        )));
    }
    if header[11] != 0 {
        return Err(TlError::invalid_format(format!(
            "reserved byte is {}, expected 0",
            header[11]
        )));
    }

    let metadata = GridMetadata {
        nlat: u16_at(6) as usize,
        nlon: u16_at(8) as usize,
        scale: header[10] as u32,
        lat0: f32_at(12),
        lon0: f32_at(16),
        dlat: f32_at(20),
        dlon: f32_at(24),
    };

    let mut volume = vec![0u8; metadata.volume_len()];
    read_exact_or(&mut reader, &mut volume, "payload")?;

    let mut extra = [0u8; 1];
    match reader.read(&mut extra) {
        Ok(0) => {}
        Ok(_) => return Err(TlError::invalid_format("trailing bytes after payload")),
        Err(e) => return Err(TlError::Io(e)),
    }

    QuantizedGrid::new(metadata, volume)
}

/// Deserialize a grid from a byte slice.
pub fn from_bytes(bytes: &[u8]) -> TlResult<QuantizedGrid> {
    decode(bytes)
}

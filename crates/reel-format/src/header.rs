//! Extension header detection and emission.
//!
//! Three mutually exclusive header variants exist:
//!
//! - **Legacy:** no extension; the engine's base header starts at the
//!   first byte and the end of the tic data is found by scanning.
//! - **Legacy extension:** a defunct, frozen format written by a single
//!   historical engine version. Once its signature matches, every other
//!   field must match exactly or decoding fails.
//! - **Versioned:** signature, version byte and a metadata block holding
//!   the end-marker offset and tic count, enabling O(1) extent lookup.
//!   A version newer than [`FORMAT_VERSION`] is treated as absent so old
//!   readers fall back to scanning instead of failing. Version 0 is still
//!   skipped as a whole and implies extended commands, but its metadata
//!   is not trusted and the extent is scanned.
//!
//! Both extension variants sit behind a leading [`FORMAT_ESCAPE`] byte.

use crate::codec::{field, get_u32_be, put_u32_be};
use crate::error::FormatError;
use crate::{FORMAT_ESCAPE, FORMAT_VERSION};

/// Signature of the versioned header: marker, ASCII tag, marker.
pub const SIGNATURE: [u8; 6] = [0x1d, b'D', b'S', b'D', b'A', 0xE6];

/// Size of the versioned metadata block (two big-endian u32s).
pub const METADATA_LEN: usize = 8;

/// Size of the versioned header after the escape byte.
pub const VERSIONED_HEADER_LEN: usize = SIGNATURE.len() + 1 + METADATA_LEN;

/// Offset of the metadata block from the escape byte.
pub const METADATA_OFFSET: usize = 1 + SIGNATURE.len() + 1;

/// Signature prefix of the defunct extension header.
pub const EXTENSION_SIGNATURE: [u8; 5] = *b"PR+UM";

/// Name of the only extension the defunct format ever carried.
pub const EXTENSION_NAME: [u8; 8] = *b"UMAPINFO";

/// Size of the defunct extension header after the escape byte.
///
/// Signature field (6, NUL-terminated) + version (1) + extension count
/// (2) + name length (1) + name (8) + map lump (8).
pub const EXTENSION_HEADER_LEN: usize = 26;

/// Metadata carried by a versioned header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VersionedMeta {
    /// Format version byte, at most [`FORMAT_VERSION`]. Version 0
    /// carries no usable metadata.
    pub version: u8,
    /// Absolute offset of the end marker within the demo.
    pub end_marker_offset: u32,
    /// Number of tic records written.
    pub tic_count: u32,
}

/// The extension header variant of a demo.
///
/// Determined once when a demo is opened or a recording starts and
/// never changes for that demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoHeader {
    /// No extension header.
    Legacy,
    /// The defunct extension header.
    LegacyExtension {
        /// Stored map lump name. Kept for layout compatibility only.
        map_lump: [u8; 8],
    },
    /// The current self-describing header.
    Versioned(VersionedMeta),
}

impl DemoHeader {
    /// Versioned metadata, if this is a versioned header.
    pub fn versioned(&self) -> Option<&VersionedMeta> {
        match self {
            Self::Versioned(meta) => Some(meta),
            _ => None,
        }
    }

    /// Versioned metadata usable for O(1) extent lookup.
    ///
    /// `None` for every non-versioned header and for version 0.
    pub fn extent(&self) -> Option<&VersionedMeta> {
        self.versioned().filter(|meta| meta.version != 0)
    }

    /// Whether playback must decode tics with the extended command set.
    pub fn implies_extended_commands(&self) -> bool {
        matches!(self, Self::Versioned(_))
    }
}

/// Result of [`detect_header`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectedHeader {
    /// The detected variant.
    pub header: DemoHeader,
    /// Offset of the first byte after the extension header, where the
    /// engine's base header begins.
    pub body_offset: usize,
}

/// Detect the extension header of a demo starting at `offset`.
///
/// Tries the versioned header first, then the defunct extension, and
/// otherwise reports [`DemoHeader::Legacy`]. Only a recognised but
/// malformed defunct extension is an error.
pub fn detect_header(bytes: &[u8], offset: usize) -> Result<DetectedHeader, FormatError> {
    if bytes.get(offset) != Some(&FORMAT_ESCAPE) {
        return Ok(DetectedHeader {
            header: DemoHeader::Legacy,
            body_offset: offset,
        });
    }
    let after_escape = offset + 1;

    if let Some((meta, body_offset)) = probe_versioned(bytes, after_escape) {
        log::debug!(
            "versioned demo header v{}: end marker at {}, {} tics",
            meta.version,
            meta.end_marker_offset,
            meta.tic_count
        );
        return Ok(DetectedHeader {
            header: DemoHeader::Versioned(meta),
            body_offset,
        });
    }

    if let Some((map_lump, body_offset)) = probe_extension(bytes, after_escape)? {
        log::debug!("defunct extension demo header");
        return Ok(DetectedHeader {
            header: DemoHeader::LegacyExtension { map_lump },
            body_offset,
        });
    }

    Ok(DetectedHeader {
        header: DemoHeader::Legacy,
        body_offset: after_escape,
    })
}

/// Try to read a versioned header at `offset` (just past the escape byte).
///
/// Returns the metadata and the offset after the header, or `None` if
/// the bytes are not a versioned header this codec understands. Never
/// fails: a short buffer, a foreign signature or a version newer than
/// [`FORMAT_VERSION`] all mean "not this format". Version 0 is accepted;
/// see [`DemoHeader::extent`].
pub fn probe_versioned(bytes: &[u8], offset: usize) -> Option<(VersionedMeta, usize)> {
    let signature = bytes.get(offset..offset + SIGNATURE.len())?;
    if signature != SIGNATURE {
        return None;
    }

    let version = *bytes.get(offset + SIGNATURE.len())?;
    if version > FORMAT_VERSION {
        log::warn!(
            "demo header version {version} is not supported (highest {FORMAT_VERSION}), \
             falling back to legacy scanning"
        );
        return None;
    }

    let metadata = offset + SIGNATURE.len() + 1;
    let end_marker_offset = get_u32_be(bytes, metadata).ok()?;
    let tic_count = get_u32_be(bytes, metadata + 4).ok()?;

    Some((
        VersionedMeta {
            version,
            end_marker_offset,
            tic_count,
        },
        offset + VERSIONED_HEADER_LEN,
    ))
}

/// Try to read the defunct extension header at `offset` (just past the
/// escape byte).
///
/// Returns `Ok(None)` if the signature does not match. Once it does,
/// every field must hold the only values the format ever had; any
/// deviation, including truncation, is an error.
pub fn probe_extension(
    bytes: &[u8],
    offset: usize,
) -> Result<Option<([u8; 8], usize)>, FormatError> {
    match bytes.get(offset..offset + EXTENSION_SIGNATURE.len()) {
        Some(signature) if signature == EXTENSION_SIGNATURE => {}
        _ => return Ok(None),
    }
    // The signature field is NUL-terminated; the terminator is not checked.
    let mut p = offset + EXTENSION_SIGNATURE.len() + 1;

    let version = field(bytes, p, 1)?[0];
    if version != 1 {
        return Err(unknown(format!("extension format version {version}")));
    }
    p += 1;

    let count = field(bytes, p, 2)?;
    if count != [1, 0] {
        return Err(unknown(format!(
            "extension count bytes {:#04x} {:#04x}",
            count[0], count[1]
        )));
    }
    p += 2;

    let name_len = field(bytes, p, 1)?[0];
    if name_len as usize != EXTENSION_NAME.len() {
        return Err(unknown(format!("extension name length {name_len}")));
    }
    p += 1;

    if field(bytes, p, EXTENSION_NAME.len())? != EXTENSION_NAME {
        return Err(unknown("extension name".to_string()));
    }
    p += EXTENSION_NAME.len();

    let mut map_lump = [0u8; 8];
    map_lump.copy_from_slice(field(bytes, p, 8)?);
    p += 8;

    Ok(Some((map_lump, p)))
}

fn unknown(detail: String) -> FormatError {
    FormatError::UnknownFormat { detail }
}

/// Append the escape byte and a versioned header with zeroed metadata.
///
/// Returns the offset of the metadata block within `out`, to be patched
/// with [`encode_metadata`] once recording finishes.
pub fn write_versioned_header(out: &mut Vec<u8>) -> usize {
    let start = out.len();
    out.push(FORMAT_ESCAPE);
    out.extend_from_slice(&SIGNATURE);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&[0; METADATA_LEN]);
    start + METADATA_OFFSET
}

/// Encode the metadata block patched into a versioned header.
pub fn encode_metadata(end_marker_offset: u32, tic_count: u32) -> [u8; METADATA_LEN] {
    let mut out = Vec::with_capacity(METADATA_LEN);
    put_u32_be(&mut out, end_marker_offset);
    put_u32_be(&mut out, tic_count);
    let mut block = [0u8; METADATA_LEN];
    block.copy_from_slice(&out);
    block
}

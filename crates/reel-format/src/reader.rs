//! Demo playback reader.
//!
//! [`DemoReader`] walks a complete in-memory demo: it detects the
//! extension header, hands the engine's base header to the host, then
//! decodes tic records up to the end marker.

use reel_core::{ModeFlags, TicCmd};

use crate::error::FormatError;
use crate::header::{detect_header, DemoHeader};
use crate::marker::{demo_marker_position, demo_tic_count};
use crate::tic::TicCodec;

/// What the host learned from the engine's base header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseHeaderInfo {
    /// Offset of the first tic record.
    pub tics_offset: usize,
    /// Mode flags negotiated by the base header.
    pub flags: ModeFlags,
    /// Players contributing one record per game tic.
    pub player_count: usize,
}

/// Parses the engine's own demo header.
///
/// Implemented by the host; the demo subsystem only needs the offset of
/// the tic data and the flags that fix the record width.
pub trait BaseHeaderReader {
    /// Parse the base header starting at `offset`.
    fn read_base_header(
        &mut self,
        bytes: &[u8],
        offset: usize,
    ) -> Result<BaseHeaderInfo, FormatError>;
}

impl<F> BaseHeaderReader for F
where
    F: FnMut(&[u8], usize) -> Result<BaseHeaderInfo, FormatError>,
{
    fn read_base_header(
        &mut self,
        bytes: &[u8],
        offset: usize,
    ) -> Result<BaseHeaderInfo, FormatError> {
        self(bytes, offset)
    }
}

/// Reads tic records from a complete demo.
///
/// # Examples
///
/// ```
/// use reel_core::{ModeFlags, TicCmd};
/// use reel_format::{BaseHeaderInfo, DemoReader, FormatError, TicCodec, DEMO_MARKER};
///
/// let codec = TicCodec::new(ModeFlags::default());
/// let mut demo = vec![109u8]; // one-byte base header
/// demo.extend_from_slice(&codec.encode(&TicCmd { forward_move: 25, ..TicCmd::default() }));
/// demo.push(DEMO_MARKER);
///
/// let mut base = |_: &[u8], offset: usize| -> Result<BaseHeaderInfo, FormatError> {
///     Ok(BaseHeaderInfo { tics_offset: offset + 1, flags: ModeFlags::default(), player_count: 1 })
/// };
/// let mut reader = DemoReader::open(&demo, &mut base).unwrap();
/// assert_eq!(reader.tic_count(), 1);
/// assert_eq!(reader.next_tic().unwrap().unwrap().forward_move, 25);
/// assert!(reader.next_tic().unwrap().is_none());
/// ```
pub struct DemoReader<'a> {
    bytes: &'a [u8],
    header: DemoHeader,
    codec: TicCodec,
    player_count: usize,
    tics_offset: usize,
    end_marker: usize,
    position: usize,
    tics_read: usize,
}

impl<'a> DemoReader<'a> {
    /// Open a demo, locating its header, tic data and end marker.
    ///
    /// A versioned header turns on the extended command set regardless
    /// of what the base header negotiated. Its recorded end marker must
    /// lie after the tic data starts, or at its start for a demo with no
    /// tics.
    pub fn open(
        bytes: &'a [u8],
        base: &mut dyn BaseHeaderReader,
    ) -> Result<Self, FormatError> {
        let detected = detect_header(bytes, 0)?;
        let info = base.read_base_header(bytes, detected.body_offset)?;

        let mut flags = info.flags;
        if detected.header.implies_extended_commands() {
            flags.extended_commands = true;
        }
        let codec = TicCodec::new(flags);
        let end_marker =
            demo_marker_position(bytes, &detected.header, info.tics_offset, codec.width())?;
        if let Some(meta) = detected.header.extent() {
            let empty = meta.tic_count == 0;
            if end_marker < info.tics_offset || (end_marker == info.tics_offset && !empty) {
                return Err(FormatError::MarkerMismatch {
                    offset: end_marker,
                    found: bytes.get(end_marker).copied(),
                });
            }
        }

        Ok(Self {
            bytes,
            header: detected.header,
            codec,
            player_count: info.player_count.max(1),
            tics_offset: info.tics_offset,
            end_marker,
            position: info.tics_offset,
            tics_read: 0,
        })
    }

    /// The detected extension header.
    pub fn header(&self) -> &DemoHeader {
        &self.header
    }

    /// The codec used for every record of this demo.
    pub fn codec(&self) -> TicCodec {
        self.codec
    }

    /// Offset of the end marker.
    pub fn end_marker(&self) -> usize {
        self.end_marker
    }

    /// Number of game tics, from the header or by counting records.
    pub fn tic_count(&self) -> usize {
        demo_tic_count(
            self.bytes,
            &self.header,
            self.tics_offset,
            self.codec.width(),
            self.player_count,
        )
    }

    /// Bytes after the end marker (the engine footer).
    pub fn footer(&self) -> &'a [u8] {
        &self.bytes[self.end_marker + 1..]
    }

    /// Decode the next record, or `None` at the end marker.
    ///
    /// A record cut short by the end marker is an error, never padded.
    pub fn next_tic(&mut self) -> Result<Option<TicCmd>, FormatError> {
        if self.position >= self.end_marker {
            return Ok(None);
        }
        let remaining = &self.bytes[self.position..self.end_marker];
        let cmd = self.codec.decode(remaining)?;
        self.position += self.codec.width();
        self.tics_read += 1;
        Ok(Some(cmd))
    }

    /// Number of records decoded so far.
    pub fn tics_read(&self) -> usize {
        self.tics_read
    }

    /// Convert into a record iterator.
    pub fn tics(self) -> TicIter<'a> {
        TicIter {
            reader: self,
            done: false,
        }
    }
}

/// Iterator adapter over demo tic records.
pub struct TicIter<'a> {
    reader: DemoReader<'a>,
    done: bool,
}

impl Iterator for TicIter<'_> {
    type Item = Result<TicCmd, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_tic() {
            Ok(Some(cmd)) => Some(Ok(cmd)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{encode_metadata, write_versioned_header, METADATA_LEN};
    use crate::DEMO_MARKER;
    use reel_test_utils::SeededInput;

    const BASE_HEADER: [u8; 3] = [221, 4, 1];

    fn base_reader(flags: ModeFlags) -> impl FnMut(&[u8], usize) -> Result<BaseHeaderInfo, FormatError> {
        move |bytes: &[u8], offset: usize| {
            if bytes.get(offset..offset + BASE_HEADER.len()) != Some(&BASE_HEADER[..]) {
                return Err(FormatError::BaseHeader {
                    detail: "unexpected engine header".into(),
                });
            }
            Ok(BaseHeaderInfo {
                tics_offset: offset + BASE_HEADER.len(),
                flags,
                player_count: 1,
            })
        }
    }

    fn build_demo(versioned: bool, flags: ModeFlags, cmds: &[TicCmd]) -> Vec<u8> {
        let mut out = Vec::new();
        let meta_at = versioned.then(|| write_versioned_header(&mut out));
        out.extend_from_slice(&BASE_HEADER);
        let codec = TicCodec::new(flags);
        for cmd in cmds {
            out.extend_from_slice(&codec.encode(cmd));
        }
        let end = out.len();
        out.push(DEMO_MARKER);
        out.extend_from_slice(b"footer");
        if let Some(at) = meta_at {
            out[at..at + METADATA_LEN]
                .copy_from_slice(&encode_metadata(end as u32, cmds.len() as u32));
        }
        out
    }

    fn commands(codec: TicCodec, n: usize) -> Vec<TicCmd> {
        SeededInput::new(7)
            .take(n)
            .map(|cmd| codec.quantize(&cmd))
            .collect()
    }

    #[test]
    fn legacy_demo_plays_back_every_tic() {
        let flags = ModeFlags::default();
        let cmds = commands(TicCodec::new(flags), 12);
        let demo = build_demo(false, flags, &cmds);

        let mut base = base_reader(flags);
        let reader = DemoReader::open(&demo, &mut base).unwrap();
        assert_eq!(reader.header(), &DemoHeader::Legacy);
        assert_eq!(reader.tic_count(), 12);
        assert_eq!(reader.footer(), b"footer");

        let played: Vec<_> = reader.tics().collect::<Result<_, _>>().unwrap();
        assert_eq!(played, cmds);
    }

    #[test]
    fn versioned_demo_forces_extended_commands() {
        let recorded_flags = ModeFlags {
            extended_commands: true,
            ..ModeFlags::default()
        };
        let cmds = commands(TicCodec::new(recorded_flags), 10);
        let demo = build_demo(true, recorded_flags, &cmds);

        // The base header does not mention the extended command set.
        let mut base = base_reader(ModeFlags::default());
        let reader = DemoReader::open(&demo, &mut base).unwrap();
        assert_eq!(reader.codec().width(), 5);
        assert_eq!(reader.tic_count(), 10);
        assert_eq!(reader.end_marker(), 16 + 3 + 50);

        let played: Vec<_> = reader.tics().collect::<Result<_, _>>().unwrap();
        assert_eq!(played, cmds);
    }

    #[test]
    fn record_cut_short_by_marker_is_an_error() {
        let flags = ModeFlags::default();
        let mut demo = BASE_HEADER.to_vec();
        demo.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        demo.push(DEMO_MARKER);
        let end = demo.len() - 1;

        // Only a versioned header can place the marker off a record boundary.
        let mut full = Vec::new();
        let meta_at = write_versioned_header(&mut full);
        full.extend_from_slice(&demo);
        let end = end + full.len() - demo.len();
        full[meta_at..meta_at + METADATA_LEN].copy_from_slice(&encode_metadata(end as u32, 1));

        let mut base = base_reader(flags);
        let mut reader = DemoReader::open(&full, &mut base).unwrap();
        assert!(reader.next_tic().unwrap().is_some());
        assert_eq!(
            reader.next_tic(),
            Err(FormatError::TruncatedTic {
                needed: 5,
                available: 1
            })
        );
    }

    #[test]
    fn versioned_marker_before_tic_data_fails_open() {
        let flags = ModeFlags::default();
        let cmds = commands(TicCodec::new(flags), 3);
        let mut demo = build_demo(true, flags, &cmds);
        // A tic count of 0x8000_0000 puts a marker-valued byte at offset 12,
        // inside the header itself.
        demo[8..16].copy_from_slice(&encode_metadata(12, 0x8000_0000));

        let mut base = base_reader(flags);
        assert_eq!(
            DemoReader::open(&demo, &mut base).err(),
            Some(FormatError::MarkerMismatch {
                offset: 12,
                found: Some(DEMO_MARKER)
            })
        );
    }

    #[test]
    fn versioned_marker_at_tic_data_start_needs_zero_tics() {
        let flags = ModeFlags::default();
        let mut demo = build_demo(true, flags, &[]);
        let mut base = base_reader(flags);
        let reader = DemoReader::open(&demo, &mut base).unwrap();
        assert_eq!(reader.end_marker(), 16 + 3);
        assert_eq!(reader.tic_count(), 0);

        demo[8..16].copy_from_slice(&encode_metadata(16 + 3, 4));
        assert_eq!(
            DemoReader::open(&demo, &mut base).err(),
            Some(FormatError::MarkerMismatch {
                offset: 19,
                found: Some(DEMO_MARKER)
            })
        );
    }

    #[test]
    fn missing_marker_fails_open() {
        let mut demo = BASE_HEADER.to_vec();
        demo.extend_from_slice(&[0; 8]);
        let mut base = base_reader(ModeFlags::default());
        assert!(matches!(
            DemoReader::open(&demo, &mut base),
            Err(FormatError::MissingEndMarker)
        ));
    }

    #[test]
    fn base_header_errors_propagate() {
        let demo = [1u8, 2, 3, DEMO_MARKER];
        let mut base = base_reader(ModeFlags::default());
        assert!(matches!(
            DemoReader::open(&demo, &mut base),
            Err(FormatError::BaseHeader { .. })
        ));
    }

    #[test]
    fn iterator_stops_after_error() {
        let flags = ModeFlags::default();
        let cmds = commands(TicCodec::new(flags), 2);
        let mut demo = build_demo(true, flags, &cmds);
        // Records are 5 bytes wide under the versioned header; put the
        // end marker two bytes into the second one.
        let end = 16 + 3 + 5 + 2;
        demo[end] = DEMO_MARKER;
        demo[8..16].copy_from_slice(&encode_metadata(end as u32, 2));

        let mut base = base_reader(flags);
        let mut iter = DemoReader::open(&demo, &mut base).unwrap().tics();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }
}

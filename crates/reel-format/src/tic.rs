//! Fixed-width tic record encoding.
//!
//! Record layout, in order:
//!
//! | Field | Bytes | Present when |
//! |---|---|---|
//! | forward move | 1 | always |
//! | side move | 1 | always |
//! | turn delta | 2 (LE) or 1 (high byte) | long tics / otherwise |
//! | buttons | 1 | always |
//! | look/fly, artifact | 2 | alternate game |
//! | extended actions | 1 | extended command set |

use reel_core::{ModeFlags, TicBytes, TicCmd};

use crate::error::FormatError;

/// Encoder/decoder for one session's tic records.
///
/// The width is derived from the mode flags once, at construction, and
/// never re-derived per tic.
///
/// # Examples
///
/// ```
/// use reel_core::{ModeFlags, TicCmd};
/// use reel_format::TicCodec;
///
/// let codec = TicCodec::new(ModeFlags { extended_commands: true, ..ModeFlags::default() });
/// let cmd = TicCmd { forward_move: 50, angle_turn: 0x0200, ex_actions: 4, ..TicCmd::default() };
///
/// let bytes = codec.encode(&cmd);
/// assert_eq!(bytes.len(), 5);
/// assert_eq!(codec.decode(&bytes).unwrap(), cmd);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicCodec {
    flags: ModeFlags,
    width: usize,
}

impl TicCodec {
    /// Build a codec for the given mode flags.
    pub fn new(flags: ModeFlags) -> Self {
        Self {
            flags,
            width: flags.tic_width(),
        }
    }

    /// Mode flags the codec was built with.
    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    /// Bytes per record.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode one command into exactly [`width`](Self::width) bytes.
    ///
    /// Without long tics only the rounded high byte of the turn delta is
    /// stored; fields outside the active flags are dropped.
    pub fn encode(&self, cmd: &TicCmd) -> TicBytes {
        let mut out = TicBytes::new();
        out.push(cmd.forward_move as u8);
        out.push(cmd.side_move as u8);
        if self.flags.long_tics {
            out.extend_from_slice(&cmd.angle_turn.to_le_bytes());
        } else {
            out.push(((i32::from(cmd.angle_turn) + 128) >> 8) as u8);
        }
        out.push(cmd.buttons);
        if self.flags.alt_game {
            out.push(cmd.look_fly);
            out.push(cmd.artifact);
        }
        if self.flags.extended_commands {
            out.push(cmd.ex_actions);
        }
        debug_assert_eq!(out.len(), self.width);
        out
    }

    /// Decode one command from the front of `bytes`.
    ///
    /// Reads exactly [`width`](Self::width) bytes and fails if fewer are
    /// available; trailing bytes are ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<TicCmd, FormatError> {
        let record = bytes.get(..self.width).ok_or(FormatError::TruncatedTic {
            needed: self.width,
            available: bytes.len(),
        })?;

        let mut p = record.iter().copied();
        let mut next = || p.next().unwrap_or_default();

        let mut cmd = TicCmd {
            forward_move: next() as i8,
            side_move: next() as i8,
            ..TicCmd::default()
        };
        cmd.angle_turn = if self.flags.long_tics {
            let lo = next();
            let hi = next();
            i16::from_le_bytes([lo, hi])
        } else {
            i16::from_le_bytes([0, next()])
        };
        cmd.buttons = next();
        if self.flags.alt_game {
            cmd.look_fly = next();
            cmd.artifact = next();
        }
        if self.flags.extended_commands {
            cmd.ex_actions = next();
        }
        Ok(cmd)
    }

    /// The command as it reads back after an encode/decode round trip.
    pub fn quantize(&self, cmd: &TicCmd) -> TicCmd {
        let mut q = *cmd;
        if !self.flags.long_tics {
            q.angle_turn = i16::from_le_bytes([0, ((i32::from(cmd.angle_turn) + 128) >> 8) as u8]);
        }
        if !self.flags.alt_game {
            q.look_fly = 0;
            q.artifact = 0;
        }
        if !self.flags.extended_commands {
            q.ex_actions = 0;
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_flags() -> impl Strategy<Value = ModeFlags> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(long_tics, alt_game, extended_commands)| ModeFlags {
                long_tics,
                alt_game,
                extended_commands,
            },
        )
    }

    fn arb_cmd() -> impl Strategy<Value = TicCmd> {
        (
            any::<i8>(),
            any::<i8>(),
            any::<i16>(),
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
        )
            .prop_map(
                |(forward_move, side_move, angle_turn, buttons, look_fly, artifact, ex_actions)| {
                    TicCmd {
                        forward_move,
                        side_move,
                        angle_turn,
                        buttons,
                        look_fly,
                        artifact,
                        ex_actions,
                    }
                },
            )
    }

    #[test]
    fn short_tic_layout() {
        let codec = TicCodec::new(ModeFlags::default());
        let cmd = TicCmd {
            forward_move: -2,
            side_move: 3,
            angle_turn: 0x0500,
            buttons: 0x81,
            ..TicCmd::default()
        };
        assert_eq!(codec.encode(&cmd).as_slice(), &[0xFE, 3, 5, 0x81]);
    }

    #[test]
    fn long_tic_turn_is_little_endian() {
        let codec = TicCodec::new(ModeFlags {
            long_tics: true,
            ..ModeFlags::default()
        });
        let cmd = TicCmd {
            angle_turn: -2,
            ..TicCmd::default()
        };
        let bytes = codec.encode(&cmd);
        assert_eq!(bytes.as_slice(), &[0, 0, 0xFE, 0xFF, 0]);
        assert_eq!(codec.decode(&bytes).unwrap().angle_turn, -2);
    }

    #[test]
    fn short_tic_turn_rounds_to_nearest_high_byte() {
        let codec = TicCodec::new(ModeFlags::default());
        let cmd = TicCmd {
            angle_turn: 0x0280,
            ..TicCmd::default()
        };
        assert_eq!(codec.decode(&codec.encode(&cmd)).unwrap().angle_turn, 0x0300);
        let cmd = TicCmd {
            angle_turn: -0x0100,
            ..TicCmd::default()
        };
        assert_eq!(codec.decode(&codec.encode(&cmd)).unwrap().angle_turn, -0x0100);
    }

    #[test]
    fn alt_game_and_extended_bytes_follow_buttons() {
        let codec = TicCodec::new(ModeFlags {
            long_tics: false,
            alt_game: true,
            extended_commands: true,
        });
        let cmd = TicCmd {
            buttons: 1,
            look_fly: 2,
            artifact: 3,
            ex_actions: 4,
            ..TicCmd::default()
        };
        assert_eq!(codec.encode(&cmd).as_slice(), &[0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn short_input_is_truncated_tic() {
        let codec = TicCodec::new(ModeFlags {
            extended_commands: true,
            ..ModeFlags::default()
        });
        assert_eq!(
            codec.decode(&[1, 2, 3, 4]),
            Err(FormatError::TruncatedTic {
                needed: 5,
                available: 4
            })
        );
    }

    #[test]
    fn decode_ignores_bytes_past_width() {
        let codec = TicCodec::new(ModeFlags::default());
        let cmd = codec.decode(&[1, 2, 3, 4, 0x80, 0x80]).unwrap();
        assert_eq!(cmd.buttons, 4);
        assert_eq!(cmd.ex_actions, 0);
    }

    proptest! {
        #[test]
        fn encoded_width_matches_flags(flags in arb_flags(), cmd in arb_cmd()) {
            let codec = TicCodec::new(flags);
            prop_assert_eq!(codec.encode(&cmd).len(), flags.tic_width());
        }

        #[test]
        fn roundtrip_is_bit_exact_for_representable_commands(
            flags in arb_flags(),
            cmd in arb_cmd(),
        ) {
            let codec = TicCodec::new(flags);
            let representable = codec.quantize(&cmd);
            let decoded = codec.decode(&codec.encode(&representable)).unwrap();
            prop_assert_eq!(decoded, representable);
        }

        #[test]
        fn roundtrip_equals_quantize(flags in arb_flags(), cmd in arb_cmd()) {
            let codec = TicCodec::new(flags);
            prop_assert_eq!(codec.decode(&codec.encode(&cmd)).unwrap(), codec.quantize(&cmd));
        }
    }
}

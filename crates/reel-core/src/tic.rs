//! Per-tic input commands and the mode flags that size their encoding.

use smallvec::SmallVec;

/// Width in bytes of a tic record with every mode flag off.
pub const BASE_TIC_WIDTH: usize = 4;

/// Inline storage for one encoded tic record.
///
/// The widest record (all flags on) is 8 bytes, so encoding never
/// touches the heap.
pub type TicBytes = SmallVec<[u8; 8]>;

/// One player's input for one tic.
///
/// The recorder treats these fields as opaque payload: it frames and
/// stores them but assigns no meaning to movement or button bits.
/// Fields that the active [`ModeFlags`] do not encode are dropped on
/// write and read back as zero.
///
/// # Examples
///
/// ```
/// use reel_core::TicCmd;
///
/// let cmd = TicCmd {
///     forward_move: 25,
///     side_move: -10,
///     angle_turn: 0x0300,
///     buttons: 0x01,
///     ..TicCmd::default()
/// };
///
/// assert_eq!(cmd.look_fly, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TicCmd {
    /// Forward/backward movement.
    pub forward_move: i8,
    /// Strafe movement.
    pub side_move: i8,
    /// Turn delta. Only the high byte survives unless long tics are on.
    pub angle_turn: i16,
    /// Button bitfield.
    pub buttons: u8,
    /// Look/fly byte of the alternate game command set.
    pub look_fly: u8,
    /// Inventory artifact byte of the alternate game command set.
    pub artifact: u8,
    /// Extended action bits, present only with the extended command set.
    pub ex_actions: u8,
}

/// The three independent switches that fix a recording's tic width.
///
/// Negotiated once when a recording or playback starts and constant for
/// the whole stream.
///
/// # Examples
///
/// ```
/// use reel_core::ModeFlags;
///
/// let flags = ModeFlags {
///     long_tics: false,
///     alt_game: false,
///     extended_commands: true,
/// };
/// assert_eq!(flags.tic_width(), 5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModeFlags {
    /// Extended-precision turning: the turn delta is stored in 2 bytes.
    pub long_tics: bool,
    /// Alternate-game command set: adds look/fly and artifact bytes.
    pub alt_game: bool,
    /// Extended command set: adds one byte of extended actions.
    pub extended_commands: bool,
}

impl ModeFlags {
    /// Bytes per encoded tic record under these flags.
    pub fn tic_width(&self) -> usize {
        let mut width = BASE_TIC_WIDTH;
        if self.long_tics {
            width += 1;
        }
        if self.alt_game {
            width += 2;
        }
        if self.extended_commands {
            width += 1;
        }
        width
    }
}

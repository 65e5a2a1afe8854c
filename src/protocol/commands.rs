//! # ESC/POS Control Commands
//!
//! Initialization, paper feed and cutter commands from the standard ESC/POS
//! subset understood by network receipt printers (Epson TM series, Sunmi,
//! Xprinter and most generic 58/80 mm printers).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Two bytes: `ESC @`
//! - With parameters: `ESC d n`, `GS V m n`
//! - With a data block: `GS v 0 m xL xH yL yH d...` (see [`super::graphics`])
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix, used for graphics and the cutter
pub const GS: u8 = 0x1D;

/// Split a u16 into little-endian `[low, high]` bytes.
///
/// ```
/// use grocy_label::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(500), [0xF4, 0x01]);
/// ```
#[inline]
pub fn u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to their power-on defaults.
/// Sent at the start of every job so a previous, possibly aborted, job
/// cannot leave the printer in an unexpected state.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use grocy_label::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the buffer and advances the paper by `lines` lines of the current
/// line spacing. Used after a label so it clears the tear bar.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
///
/// ```
/// use grocy_label::protocol::commands;
///
/// assert_eq!(commands::feed_lines(4), vec![0x1B, 0x64, 4]);
/// ```
#[inline]
pub fn feed_lines(lines: u8) -> Vec<u8> {
    vec![ESC, b'd', lines]
}

// ============================================================================
// CUTTER
// ============================================================================

/// # Feed and Full Cut (GS V 66 n)
///
/// Feeds `n` additional dots beyond the cutting position, then performs a
/// full cut. Letting the printer compute the head-to-cutter distance avoids
/// wasting paper at the top of the next label.
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | GS V B n    |
/// | Hex     | 1D 56 42 n  |
///
/// Printers without a cutter ignore this command.
///
/// ```
/// use grocy_label::protocol::commands;
///
/// assert_eq!(commands::cut_after_feed(0), vec![0x1D, 0x56, 0x42, 0]);
/// ```
#[inline]
pub fn cut_after_feed(dots: u8) -> Vec<u8> {
    vec![GS, b'V', 66, dots]
}

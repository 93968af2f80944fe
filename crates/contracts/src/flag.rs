//! Out-of-band audio flags
//!
//! Flags share the audio UDP channel and are told apart from PCM only by length.

use serde::{Deserialize, Serialize};

/// Control code multiplexed onto an audio channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum AudioFlag {
    /// Call ended: play out whatever is buffered
    Drain = 0x0000,
    /// Discard queued audio immediately
    Drop = 0x0001,
}

impl AudioFlag {
    /// Numeric wire code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// 16 bit little endian wire encoding
    pub fn to_le_bytes(self) -> [u8; 2] {
        self.code().to_le_bytes()
    }
}

impl TryFrom<u16> for AudioFlag {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0x0000 => Ok(Self::Drain),
            0x0001 => Ok(Self::Drop),
            other => Err(other),
        }
    }
}

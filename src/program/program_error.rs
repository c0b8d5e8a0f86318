//! Custom error codes returned by the MU$IK program.
//!
//! The program reports failures as `ProgramError::Custom(code)`; the ledger
//! renders these as `custom program error: 0x{code}` in transaction errors.

use std::fmt;

/// Marker the ledger uses when rendering a custom program error.
const CUSTOM_ERROR_MARKER: &str = "custom program error: 0x";

/// Custom error codes of the MU$IK program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MusicProgramError {
    /// Mint on an asset that is already minted
    AlreadyMinted = 1,
    /// Mint signed by someone other than the creator
    MintNotCreator = 2,
    /// Copyright registration before the asset was minted
    CopyrightBeforeMint = 3,
    /// Copyright registration signed by someone other than the creator
    CopyrightNotCreator = 4,
    /// Copyright already registered
    CopyrightAlreadyRegistered = 5,
    /// Transfer before the asset was minted
    TransferBeforeMint = 6,
    /// Transfer signed by someone other than the current owner
    TransferNotOwner = 7,
}

impl MusicProgramError {
    /// Look up a custom error code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::AlreadyMinted),
            2 => Some(Self::MintNotCreator),
            3 => Some(Self::CopyrightBeforeMint),
            4 => Some(Self::CopyrightNotCreator),
            5 => Some(Self::CopyrightAlreadyRegistered),
            6 => Some(Self::TransferBeforeMint),
            7 => Some(Self::TransferNotOwner),
            _ => None,
        }
    }

    /// Extract the custom error code from a ledger-rendered error string.
    pub fn from_reason(reason: &str) -> Option<Self> {
        let start = reason.find(CUSTOM_ERROR_MARKER)? + CUSTOM_ERROR_MARKER.len();
        let digits: String = reason[start..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect();
        let code = u32::from_str_radix(&digits, 16).ok()?;
        Self::from_code(code)
    }

    /// Raw code as sent by the program.
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for MusicProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AlreadyMinted => "asset already minted",
            Self::MintNotCreator => "only the creator can mint this asset",
            Self::CopyrightBeforeMint => "asset must be minted before registering copyright",
            Self::CopyrightNotCreator => "only the creator can register copyright",
            Self::CopyrightAlreadyRegistered => "copyright already registered",
            Self::TransferBeforeMint => "asset must be minted before it can be transferred",
            Self::TransferNotOwner => "only the current owner can transfer this asset",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in 1..=7 {
            let err = MusicProgramError::from_code(code).unwrap();
            assert_eq!(err.code(), code);
        }
        assert_eq!(MusicProgramError::from_code(0), None);
        assert_eq!(MusicProgramError::from_code(8), None);
    }

    #[test]
    fn test_from_reason() {
        let reason = "Error processing Instruction 0: custom program error: 0x1";
        assert_eq!(
            MusicProgramError::from_reason(reason),
            Some(MusicProgramError::AlreadyMinted)
        );

        let reason = "InstructionError(0, custom program error: 0x7) [logs elided]";
        assert_eq!(
            MusicProgramError::from_reason(reason),
            Some(MusicProgramError::TransferNotOwner)
        );
    }

    #[test]
    fn test_from_reason_unknown() {
        assert_eq!(MusicProgramError::from_reason("Blockhash not found"), None);
        assert_eq!(
            MusicProgramError::from_reason("custom program error: 0x2a"),
            None
        );
        assert_eq!(MusicProgramError::from_reason("custom program error: 0x"), None);
    }
}

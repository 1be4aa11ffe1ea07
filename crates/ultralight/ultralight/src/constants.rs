//! Constants for the ACR1552U transparent exchange and the MF0ICU2 command set

/// Reader-side APDUs for the transparent exchange envelope
pub mod reader {
    /// Class byte of every reader pseudo-APDU
    pub const CLA: u8 = 0xFF;
    /// Transparent exchange instruction
    pub const INS_TRANSPARENT: u8 = 0xC2;
    /// P2 selecting the transparent session management function
    pub const P2_MANAGE_SESSION: u8 = 0x00;
    /// P2 selecting the transceive function
    pub const P2_EXCHANGE: u8 = 0x01;
    /// P2 selecting the switch protocol function
    pub const P2_SWITCH_PROTOCOL: u8 = 0x02;
    /// Data object tag wrapping a relayed card command
    pub const TAG_TRANSCEIVE: u8 = 0x95;

    /// Start a transparent session
    pub const START_SESSION: [u8; 7] = [CLA, INS_TRANSPARENT, 0x00, P2_MANAGE_SESSION, 0x02, 0x81, 0x00];
    /// Switch the session to ISO 14443-4A, layer 3 active
    pub const SWITCH_PROTOCOL_14443A: [u8; 9] = [
        CLA,
        INS_TRANSPARENT,
        0x00,
        P2_SWITCH_PROTOCOL,
        0x04,
        0x8F,
        0x02,
        0x00,
        0x03,
    ];
    /// End the transparent session
    pub const END_SESSION: [u8; 7] = [CLA, INS_TRANSPARENT, 0x00, P2_MANAGE_SESSION, 0x02, 0x82, 0x00];

    /// Bytes of reader preamble in front of the card's answer to a transceive
    pub const DEFAULT_RESPONSE_HEADER_LEN: usize = 14;
}

/// Card command codes
pub mod ins {
    /// AUTHENTICATE part 1
    pub const AUTHENTICATE: u8 = 0x1A;
    /// Key number argument of AUTHENTICATE
    pub const AUTHENTICATE_KEY_NO: u8 = 0x00;
    /// AUTHENTICATE part 2, also the card's "more frames" marker
    pub const ADDITIONAL_FRAME: u8 = 0xAF;
    /// READ four blocks starting at an address
    pub const READ: u8 = 0x30;
    /// WRITE one block
    pub const WRITE: u8 = 0xA2;
}

/// Memory layout of the MF0ICU2
pub mod memory {
    /// Bytes per block
    pub const BLOCK_SIZE: usize = 4;
    /// Highest addressable block
    pub const LAST_BLOCK: u8 = 0x2F;
    /// One past the last readable block; the key lives in 0x2C..=0x2F
    pub const READABLE_END: u8 = 0x2C;
    /// Block whose first byte sets the first protected block
    pub const AUTH0_BLOCK: u8 = 0x02;
    /// Conventional first protected block
    pub const DEFAULT_PROTECTED_FROM: u8 = 0x10;
}

/// ATR presented by an Ultralight-C in an ACR1552U
pub const ULTRALIGHT_C_ATR: [u8; 20] = [
    0x3B, 0x8F, 0x80, 0x01, 0x80, 0x4F, 0x0C, 0xA0, 0x00, 0x00, 0x03, 0x06, 0x03, 0x00, 0x3A,
    0x00, 0x00, 0x00, 0x00, 0x51,
];

/// Publicly documented factory key, KEY1 || KEY2
pub const FACTORY_KEY: [u8; 16] = [
    0x49, 0x45, 0x4D, 0x4B, 0x41, 0x45, 0x52, 0x42, 0x21, 0x4E, 0x41, 0x43, 0x55, 0x4F, 0x59, 0x46,
];

/// First half of the factory key as hex
pub const FACTORY_KEY1: &str = "49454D4B41455242";
/// Second half of the factory key as hex
pub const FACTORY_KEY2: &str = "214E4143554F5946";

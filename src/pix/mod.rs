pub mod amount;
pub mod crc;
pub mod error;
pub mod integration;
pub mod payload;
pub mod text;
pub mod tlv;

pub use amount::Amount;
pub use self::crc::{crc16_ccitt, crc16_ccitt_bytes, crc_hex};
pub use error::{PixError, Result};
pub use integration::{integration_for_bank, PixIntegration, Sicoob, Sicredi};
pub use payload::{
    decode_pix_payload, encode_pix_payload, verify_checksum, DecodedPayload, PixPayloadOptions,
};
pub use text::normalize_pix_text;

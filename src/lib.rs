//! PIX "BR Code" payloads for invoices.
//!
//! The core is [`pix::encode_pix_payload`], which serialises payee, key,
//! amount, city and transaction id into the EMV Merchant Presented Mode
//! string used by Brazilian PIX QR codes, terminated by a CRC16/CCITT-FALSE
//! checksum. Around it sit the bank integrations, the `pixConfig` record and
//! the invoice mapping used by the `pix-brcode` binary.

pub mod config;
pub mod invoice;
pub mod pix;

pub use config::{ConfigError, PixConfig, PixKeyKind};
pub use invoice::{pix_for_fatura, Fatura};
pub use pix::{
    crc16_ccitt, decode_pix_payload, encode_pix_payload, verify_checksum, Amount, DecodedPayload,
    PixError, PixIntegration, PixPayloadOptions,
};

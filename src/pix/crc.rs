//! CRC16/CCITT-FALSE as used by the BR Code `63` field.
//!
//! Polynomial 0x1021, MSB first, no reflection and no final XOR. Payloads
//! start the register at 0xFFFF.

const POLY: u16 = 0x1021;

pub fn crc16_ccitt(initial: u16, data: &str) -> u16 {
    crc16_ccitt_bytes(initial, data.as_bytes())
}

pub fn crc16_ccitt_bytes(initial: u16, data: &[u8]) -> u16 {
    let mut crc = initial;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Four uppercase hex digits, zero padded.
pub fn crc_hex(crc: u16) -> String {
    hex::encode_upper(crc.to_be_bytes())
}

//! Static BR Code payload: build and read back.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::crc::{crc16_ccitt, crc_hex};
use super::error::{PixError, Result};
use super::tlv::{parse_fields, TlvField, TlvWriter};

pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";
pub const CRC_INITIAL: u16 = 0xFFFF;

const PAYLOAD_FORMAT: &str = "000201";
const MERCHANT_CATEGORY_CODE: &str = "52040000";
const CURRENCY_BRL: &str = "5303986";
const COUNTRY_BR: &str = "5802BR";
const CRC_PREFIX: &str = "6304";

const TAG_PAYLOAD_FORMAT: &str = "00";
const TAG_MERCHANT_ACCOUNT: &str = "26";
const TAG_GUI: &str = "00";
const TAG_PIX_KEY: &str = "01";
const TAG_CATEGORY: &str = "52";
const TAG_CURRENCY: &str = "53";
const TAG_AMOUNT: &str = "54";
const TAG_COUNTRY: &str = "58";
const TAG_NAME: &str = "59";
const TAG_CITY: &str = "60";
const TAG_ADDITIONAL_DATA: &str = "62";
const TAG_REFERENCE_LABEL: &str = "05";
const TAG_CRC: &str = "63";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixPayloadOptions {
    pub nome: String,
    pub chavepix: String,
    pub valor: String,
    pub cidade: String,
    #[serde(rename = "txtId")]
    pub txt_id: String,
}

/// Encodes the options as a complete, checksummed BR Code string.
///
/// Fails without producing output when the amount does not parse, when a
/// caller-supplied field is not ASCII, or when any field (including the 26
/// and 62 templates) would need more than two length digits.
pub fn encode_pix_payload(options: &PixPayloadOptions) -> Result<String> {
    for (tag, value) in [
        (TAG_PIX_KEY, &options.chavepix),
        (TAG_NAME, &options.nome),
        (TAG_CITY, &options.cidade),
        (TAG_REFERENCE_LABEL, &options.txt_id),
    ] {
        if !value.is_ascii() {
            return Err(PixError::NonAsciiField { tag });
        }
    }
    let amount = Amount::parse(&options.valor)?;

    let mut w = TlvWriter::new();
    w.push_raw(PAYLOAD_FORMAT);
    w.push_nested(TAG_MERCHANT_ACCOUNT, |account| {
        account.push(TAG_GUI, PIX_GUI)?;
        account.push(TAG_PIX_KEY, &options.chavepix)?;
        Ok(())
    })?;
    w.push_raw(MERCHANT_CATEGORY_CODE).push_raw(CURRENCY_BRL);
    w.push(TAG_AMOUNT, amount.as_str())?;
    w.push_raw(COUNTRY_BR);
    w.push(TAG_NAME, &options.nome)?;
    w.push(TAG_CITY, &options.cidade)?;
    w.push_nested(TAG_ADDITIONAL_DATA, |additional| {
        additional.push(TAG_REFERENCE_LABEL, &options.txt_id)?;
        Ok(())
    })?;
    w.push_raw(CRC_PREFIX);

    let mut payload = w.finish();
    let crc = crc_hex(crc16_ccitt(CRC_INITIAL, &payload));
    payload.push_str(&crc);

    tracing::debug!(target: "pix", len = payload.len(), crc = %crc, "built BR Code payload");
    Ok(payload)
}

/// Checks the trailing `6304XXXX` field against a CRC recomputed over
/// everything before the four hex digits. Returns the CRC on success.
pub fn verify_checksum(payload: &str) -> Result<u16> {
    if !payload.is_ascii() || payload.len() < 8 {
        return Err(PixError::MalformedPayload("payload too short or not ASCII".to_string()));
    }
    let (body, crc_digits) = payload.split_at(payload.len() - 4);
    if !body.ends_with(CRC_PREFIX) {
        return Err(PixError::MalformedPayload("missing 6304 CRC field".to_string()));
    }

    let bytes = hex::decode(crc_digits)
        .map_err(|e| PixError::MalformedPayload(format!("invalid CRC digits {crc_digits:?}: {e}")))?;
    let found = u16::from_be_bytes([bytes[0], bytes[1]]);
    let expected = crc16_ccitt(CRC_INITIAL, body);
    if expected != found {
        return Err(PixError::ChecksumMismatch { expected, found });
    }
    Ok(found)
}

/// Fields read back from a BR Code. Amount and reference label are optional
/// in the format, so payloads from other issuers may lack them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    pub nome: String,
    pub chavepix: String,
    pub valor: Option<String>,
    pub cidade: String,
    pub txt_id: Option<String>,
    pub merchant_category_code: String,
    pub crc: String,
}

impl DecodedPayload {
    /// The options this payload was built from, when both amount and
    /// reference label are present.
    pub fn options(&self) -> Option<PixPayloadOptions> {
        Some(PixPayloadOptions {
            nome: self.nome.clone(),
            chavepix: self.chavepix.clone(),
            valor: self.valor.clone()?,
            cidade: self.cidade.clone(),
            txt_id: self.txt_id.clone()?,
        })
    }
}

fn malformed(msg: impl Into<String>) -> PixError {
    PixError::MalformedPayload(msg.into())
}

fn nested_value<'a>(template: &TlvField<'a>, tag: &str) -> Result<Option<&'a str>> {
    Ok(parse_fields(template.value)?
        .into_iter()
        .find(|f| f.tag == tag)
        .map(|f| f.value))
}

/// Verifies the checksum and reads the payee, key, amount, city and reference
/// label back out of a static PIX payload. Tags this crate does not emit
/// (point of initiation, postal code, ...) are skipped.
pub fn decode_pix_payload(payload: &str) -> Result<DecodedPayload> {
    let crc = verify_checksum(payload)?;
    let fields = parse_fields(payload)?;

    match fields.first() {
        Some(f) if f.tag == TAG_PAYLOAD_FORMAT && f.value == "01" => {}
        _ => return Err(malformed("payload must start with format indicator 000201")),
    }
    match fields.last() {
        Some(f) if f.tag == TAG_CRC && f.value.len() == 4 => {}
        _ => return Err(malformed("CRC field is not the last field")),
    }

    let mut nome = None;
    let mut chavepix = None;
    let mut valor = None;
    let mut cidade = None;
    let mut txt_id = None;
    let mut category = None;

    for field in &fields {
        match field.tag {
            TAG_MERCHANT_ACCOUNT => {
                let gui = nested_value(field, TAG_GUI)?;
                if !gui.is_some_and(|g| g.eq_ignore_ascii_case(PIX_GUI)) {
                    return Err(malformed(format!("merchant account GUI is {gui:?}, not {PIX_GUI}")));
                }
                chavepix = nested_value(field, TAG_PIX_KEY)?;
            }
            TAG_CATEGORY => category = Some(field.value),
            TAG_CURRENCY if field.value != "986" => {
                return Err(malformed(format!("currency {} is not BRL", field.value)));
            }
            TAG_AMOUNT => valor = Some(field.value),
            TAG_COUNTRY if field.value != "BR" => {
                return Err(malformed(format!("country {} is not BR", field.value)));
            }
            TAG_NAME => nome = Some(field.value),
            TAG_CITY => cidade = Some(field.value),
            TAG_ADDITIONAL_DATA => txt_id = nested_value(field, TAG_REFERENCE_LABEL)?,
            _ => {}
        }
    }

    let decoded = DecodedPayload {
        nome: nome.ok_or_else(|| malformed("missing merchant name (59)"))?.to_string(),
        chavepix: chavepix.ok_or_else(|| malformed("missing PIX key (26/01)"))?.to_string(),
        valor: valor.map(str::to_string),
        cidade: cidade.ok_or_else(|| malformed("missing merchant city (60)"))?.to_string(),
        txt_id: txt_id.map(str::to_string),
        merchant_category_code: category.unwrap_or_default().to_string(),
        crc: crc_hex(crc),
    };
    tracing::debug!(target: "pix", crc = %decoded.crc, "decoded BR Code payload");
    Ok(decoded)
}

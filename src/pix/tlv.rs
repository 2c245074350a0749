//! EMV Tag-Length-Value fields in their textual form: a two-digit tag, a
//! two-digit decimal length and the value itself.

use super::error::{PixError, Result};

pub const MAX_FIELD_LEN: usize = 99;

/// Renders the character count of `value` as two zero-padded digits.
pub fn length_prefix(tag: &'static str, value: &str) -> Result<String> {
    let len = value.chars().count();
    if len > MAX_FIELD_LEN {
        return Err(PixError::FieldTooLong { tag, len });
    }
    Ok(format!("{len:02}"))
}

#[derive(Debug, Default)]
pub struct TlvWriter {
    out: String,
}

impl TlvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a literal, already encoded field such as `"5802BR"`.
    pub fn push_raw(&mut self, encoded: &str) -> &mut Self {
        self.out.push_str(encoded);
        self
    }

    pub fn push(&mut self, tag: &'static str, value: &str) -> Result<&mut Self> {
        let len = length_prefix(tag, value)?;
        self.out.push_str(tag);
        self.out.push_str(&len);
        self.out.push_str(value);
        Ok(self)
    }

    /// Builds a template field: the closure writes the inner fields, which are
    /// then wrapped with `tag` and their combined length.
    pub fn push_nested<F>(&mut self, tag: &'static str, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut TlvWriter) -> Result<()>,
    {
        let mut inner = TlvWriter::new();
        build(&mut inner)?;
        self.push(tag, inner.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvField<'a> {
    pub tag: &'a str,
    pub value: &'a str,
}

/// Splits a TLV sequence into its fields. Lengths count characters, so the
/// input is expected to be ASCII.
pub fn parse_fields(input: &str) -> Result<Vec<TlvField<'_>>> {
    if !input.is_ascii() {
        return Err(PixError::MalformedPayload("payload is not ASCII".to_string()));
    }

    let mut fields = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if rest.len() < 4 {
            return Err(PixError::MalformedPayload(format!("truncated field header {rest:?}")));
        }
        let (tag, tail) = rest.split_at(2);
        let (len_str, tail) = tail.split_at(2);
        if !tag.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::MalformedPayload(format!("invalid tag {tag:?}")));
        }
        if !len_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::MalformedPayload(format!("invalid length {len_str:?} for tag {tag}")));
        }
        let len = usize::from(len_str.as_bytes()[0] - b'0') * 10 + usize::from(len_str.as_bytes()[1] - b'0');
        if tail.len() < len {
            return Err(PixError::MalformedPayload(format!(
                "field {tag} declares {len} characters, {} left",
                tail.len()
            )));
        }
        let (value, tail) = tail.split_at(len);
        fields.push(TlvField { tag, value });
        rest = tail;
    }
    Ok(fields)
}

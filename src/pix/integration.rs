use super::error::Result;
use super::payload::{encode_pix_payload, PixPayloadOptions};

/// A bank's way of producing the PIX payload for an invoice.
pub trait PixIntegration: Send + Sync {
    /// Three-digit COMPE code, e.g. `"748"`.
    fn bank_code(&self) -> &'static str;

    fn bank_name(&self) -> &'static str;

    fn generate_pix_payload(&self, options: &PixPayloadOptions) -> Result<String> {
        encode_pix_payload(options)
    }
}

/// Banco Cooperativo Sicredi. Standard BR Code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sicredi;

impl PixIntegration for Sicredi {
    fn bank_code(&self) -> &'static str {
        "748"
    }

    fn bank_name(&self) -> &'static str {
        "Sicredi"
    }
}

/// Banco Cooperativo Sicoob. Standard BR Code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sicoob;

impl PixIntegration for Sicoob {
    fn bank_code(&self) -> &'static str {
        "756"
    }

    fn bank_name(&self) -> &'static str {
        "Sicoob"
    }
}

static INTEGRATIONS: [&dyn PixIntegration; 2] = [&Sicredi, &Sicoob];

pub fn integration_for_bank(code: &str) -> Option<&'static dyn PixIntegration> {
    let code = code.trim();
    INTEGRATIONS.iter().copied().find(|i| i.bank_code() == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_banks_resolve() {
        assert_eq!(integration_for_bank("748").map(|i| i.bank_name()), Some("Sicredi"));
        assert_eq!(integration_for_bank(" 756 ").map(|i| i.bank_name()), Some("Sicoob"));
    }

    #[test]
    fn other_banks_have_no_integration() {
        for code in ["001", "104", "237", "341", "260", ""] {
            assert!(integration_for_bank(code).is_none(), "bank {code}");
        }
    }

    #[test]
    fn integrations_use_the_standard_encoder() {
        let opts = PixPayloadOptions {
            nome: "RENOVVA MAIS".to_string(),
            chavepix: "12345678000195".to_string(),
            valor: "150.75".to_string(),
            cidade: "SAO PAULO".to_string(),
            txt_id: "FAT-2024-001".to_string(),
        };
        let expected = encode_pix_payload(&opts).unwrap();
        assert_eq!(Sicredi.generate_pix_payload(&opts).unwrap(), expected);
        assert_eq!(Sicoob.generate_pix_payload(&opts).unwrap(), expected);
        assert!(expected.ends_with("6892"));
    }
}

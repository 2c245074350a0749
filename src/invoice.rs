use serde::{Deserialize, Serialize};

use crate::config::PixConfig;
use crate::pix::{integration_for_bank, normalize_pix_text, Amount, PixError, PixPayloadOptions, Result};

/// The parts of an invoice record the payload needs. Other fields in the
/// JSON are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fatura {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl Fatura {
    /// Reference label for the `62/05` field: the invoice reference, or its
    /// id when there is none.
    pub fn txt_id(&self) -> &str {
        self.reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(self.id.as_str())
    }
}

impl PixConfig {
    pub fn options_for(&self, fatura: &Fatura) -> Result<PixPayloadOptions> {
        let valor = Amount::from_f64(fatura.amount.unwrap_or(0.0))?;
        let (nome, cidade) = if self.normalize_text {
            (normalize_pix_text(&self.nome), normalize_pix_text(&self.cidade))
        } else {
            (self.nome.clone(), self.cidade.clone())
        };

        Ok(PixPayloadOptions {
            nome,
            chavepix: self.chave.clone(),
            valor: valor.to_string(),
            cidade,
            txt_id: fatura.txt_id().to_string(),
        })
    }
}

/// Builds the payload for an invoice through the configured bank.
pub fn pix_for_fatura(config: &PixConfig, fatura: &Fatura) -> Result<String> {
    let integration =
        integration_for_bank(&config.banco).ok_or_else(|| PixError::UnsupportedBank(config.banco.clone()))?;
    let options = config.options_for(fatura)?;
    let payload = integration.generate_pix_payload(&options)?;

    tracing::info!(
        target: "pix",
        fatura = %fatura.id,
        bank = integration.bank_name(),
        "generated PIX payload"
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::decode_pix_payload;

    fn config(banco: &str) -> PixConfig {
        PixConfig::from_json(&format!(
            r#"{{"banco":"{banco}","tipoChave":"CPF/CNPJ","chave":"12345678000195"}}"#
        ))
        .unwrap()
    }

    fn fatura(reference: Option<&str>, amount: Option<f64>) -> Fatura {
        Fatura {
            id: "f9b1c2".to_string(),
            reference: reference.map(str::to_string),
            amount,
        }
    }

    #[test]
    fn txt_id_prefers_reference() {
        assert_eq!(fatura(Some("FAT-2024-001"), None).txt_id(), "FAT-2024-001");
        assert_eq!(fatura(Some("  "), None).txt_id(), "f9b1c2");
        assert_eq!(fatura(None, None).txt_id(), "f9b1c2");
    }

    #[test]
    fn builds_payload_for_invoice() {
        let payload = pix_for_fatura(&config("748"), &fatura(Some("FAT-2024-001"), Some(150.75))).unwrap();
        assert_eq!(
            payload,
            "00020126360014BR.GOV.BCB.PIX0114123456780001955204000053039865406150.755802BR\
             5912RENOVVA MAIS6009SAO PAULO62160512FAT-2024-00163046892"
        );
    }

    #[test]
    fn missing_amount_is_zero() {
        let payload = pix_for_fatura(&config("756"), &fatura(None, None)).unwrap();
        let decoded = decode_pix_payload(&payload).unwrap();
        assert_eq!(decoded.valor.as_deref(), Some("0.00"));
        assert_eq!(decoded.txt_id.as_deref(), Some("f9b1c2"));
    }

    #[test]
    fn unsupported_bank_is_an_error() {
        let err = pix_for_fatura(&config("001"), &fatura(None, Some(1.0))).unwrap_err();
        assert_eq!(err, PixError::UnsupportedBank("001".to_string()));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = pix_for_fatura(&config("748"), &fatura(None, Some(-5.0))).unwrap_err();
        assert!(matches!(err, PixError::InvalidAmount(_)));
    }

    #[test]
    fn normalizes_payee_text_when_asked() {
        let mut cfg = config("748");
        cfg.nome = "Energia Solar Ltda".to_string();
        cfg.cidade = "São José".to_string();
        assert!(matches!(
            pix_for_fatura(&cfg, &fatura(None, Some(1.0))),
            Err(PixError::NonAsciiField { tag: "60" })
        ));

        cfg.normalize_text = true;
        let opts = cfg.options_for(&fatura(None, Some(1.0))).unwrap();
        assert_eq!(opts.nome, "ENERGIA SOLAR LTDA");
        assert_eq!(opts.cidade, "SAO JOSE");
    }
}

//! The `pixConfig` record: which bank receives the payment, the PIX key and
//! the payee name and city printed in the payload.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pix::integration_for_bank;

pub const CONFIG_PATH_ENV: &str = "PIX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pix.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pix config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pix config has no PIX key (chave)")]
    MissingKey,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PixKeyKind {
    #[serde(rename = "CPF/CNPJ")]
    CpfCnpj,
    Email,
    Telefone,
    Aleatoria,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixConfig {
    pub banco: String,
    #[serde(default)]
    pub tipo_chave: Option<PixKeyKind>,
    pub chave: String,
    #[serde(default = "default_nome")]
    pub nome: String,
    #[serde(default = "default_cidade")]
    pub cidade: String,
    /// Fold accents and uppercase name and city before encoding.
    #[serde(default)]
    pub normalize_text: bool,
}

fn default_nome() -> String {
    "RENOVVA MAIS".to_string()
}

fn default_cidade() -> String {
    "SAO PAULO".to_string()
}

/// Explicit path first, then `PIX_CONFIG`, then `./pix.json`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

impl PixConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut cfg: PixConfig = serde_json::from_str(json)?;
        cfg.banco = cfg.banco.trim().to_string();
        cfg.chave = cfg.chave.trim().to_string();
        if cfg.chave.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&json)?;

        tracing::debug!(target: "pix::config", path = %path.display(), banco = %cfg.banco, "loaded pix config");
        for w in cfg.warnings() {
            tracing::warn!(target: "pix::config", "{w}");
        }
        Ok(cfg)
    }

    /// Problems that do not stop a payload from being built but that the
    /// operator should know about.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if integration_for_bank(&self.banco).is_none() {
            out.push(format!("bank {} has no PIX integration", self.banco));
        }
        match self.tipo_chave {
            Some(PixKeyKind::CpfCnpj) => {}
            Some(kind) => out.push(format!(
                "key type {kind:?} integrates only partially with the bank; prefer CPF/CNPJ"
            )),
            None => out.push("key type (tipoChave) not set".to_string()),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_application_record() {
        let cfg = PixConfig::from_json(r#"{"banco":"748","tipoChave":"CPF/CNPJ","chave":" 12345678000195 "}"#)
            .unwrap();
        assert_eq!(cfg.banco, "748");
        assert_eq!(cfg.tipo_chave, Some(PixKeyKind::CpfCnpj));
        assert_eq!(cfg.chave, "12345678000195");
        assert_eq!(cfg.nome, "RENOVVA MAIS");
        assert_eq!(cfg.cidade, "SAO PAULO");
        assert!(!cfg.normalize_text);
        assert!(cfg.warnings().is_empty());
    }

    #[test]
    fn key_kinds_use_screen_labels() {
        for (label, kind) in [
            ("EMAIL", PixKeyKind::Email),
            ("TELEFONE", PixKeyKind::Telefone),
            ("ALEATORIA", PixKeyKind::Aleatoria),
        ] {
            let json = format!(r#"{{"banco":"756","tipoChave":"{label}","chave":"x"}}"#);
            assert_eq!(PixConfig::from_json(&json).unwrap().tipo_chave, Some(kind));
        }
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = PixConfig::from_json(r#"{"banco":"748","chave":"   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey));
        let err = PixConfig::from_json(r#"{"banco":"748"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn warns_about_unsupported_bank_and_key_kind() {
        let cfg = PixConfig::from_json(r#"{"banco":"341","tipoChave":"EMAIL","chave":"a@b.c"}"#).unwrap();
        let warnings = cfg.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("341"));
        assert!(warnings[1].contains("Email"));
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_config_path(Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(p, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PixConfig::load(Path::new("/nonexistent/pix.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/pix.json"));
    }
}

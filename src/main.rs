use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pix_brcode::config::{resolve_config_path, PixConfig};
use pix_brcode::pix::{crc16_ccitt, crc_hex, decode_pix_payload, encode_pix_payload, normalize_pix_text};
use pix_brcode::{pix_for_fatura, Fatura, PixPayloadOptions};

const LOG_ENV: &str = "PIX_LOG";

#[derive(Parser, Debug)]
#[command(name = "pix-brcode", version, about = "PIX BR Code payloads for invoices")]
struct Cli {
  /// Log debug events to stderr
  #[arg(short, long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Build a payload from explicit fields
  Encode {
    #[arg(long)]
    nome: String,

    #[arg(long)]
    chave: String,

    /// Amount, `.` or `,` as decimal separator
    #[arg(long)]
    valor: String,

    #[arg(long)]
    cidade: String,

    #[arg(long, default_value = "")]
    txid: String,

    /// Fold accents and uppercase name and city first
    #[arg(long)]
    normalize: bool,
  },

  /// Build the payload for an invoice JSON record using the pix config
  Invoice {
    #[arg(long)]
    fatura: PathBuf,

    /// Defaults to $PIX_CONFIG, then ./pix.json
    #[arg(long)]
    config: Option<PathBuf>,
  },

  /// Verify the checksum of a payload and print its fields as JSON
  Inspect { payload: String },

  /// CRC16/CCITT of a string, as four hex digits
  Crc {
    data: String,

    #[arg(long, default_value = "FFFF")]
    initial: String,
  },
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_logging(cli.debug);

  match cli.command {
    Command::Encode {
      nome,
      chave,
      valor,
      cidade,
      txid,
      normalize,
    } => {
      let (nome, cidade) = if normalize {
        (normalize_pix_text(&nome), normalize_pix_text(&cidade))
      } else {
        (nome, cidade)
      };
      let options = PixPayloadOptions {
        nome,
        chavepix: chave.trim().to_string(),
        valor,
        cidade,
        txt_id: txid,
      };
      println!("{}", encode_pix_payload(&options)?);
    }

    Command::Invoice { fatura, config } => {
      let config_path = resolve_config_path(config);
      let config = PixConfig::load(&config_path)?;

      let json = fs::read_to_string(&fatura)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", fatura.display()))?;
      let fatura: Fatura =
        serde_json::from_str(&json).map_err(|e| anyhow::anyhow!("invalid fatura json: {e}"))?;

      println!("{}", pix_for_fatura(&config, &fatura)?);
    }

    Command::Inspect { payload } => {
      let decoded = decode_pix_payload(payload.trim())?;
      println!("{}", serde_json::to_string_pretty(&decoded)?);
    }

    Command::Crc { data, initial } => {
      let initial = parse_initial(&initial)?;
      println!("{}", crc_hex(crc16_ccitt(initial, &data)));
    }
  }

  Ok(())
}

fn init_logging(debug: bool) {
  let filter = if debug {
    EnvFilter::new("pix=debug")
  } else {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("pix=warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn parse_initial(raw: &str) -> anyhow::Result<u16> {
  let digits = raw.trim().trim_start_matches("0x").trim_start_matches("0X");
  if digits.len() != 4 {
    anyhow::bail!("initial value must be four hex digits, got {raw:?}");
  }
  let bytes = hex::decode(digits).map_err(|e| anyhow::anyhow!("invalid initial value {raw:?}: {e}"))?;
  Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

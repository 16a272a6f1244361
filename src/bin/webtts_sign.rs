//! webtts-sign: print a signed `/tts.ogg` URL.
//!
//! Usage:
//!   webtts-sign --signature-key <KEY> --text "hello" [--lang en-US] [--voice ...]
//!               [--provider google] [--valid-for-secs 86400] [--base-url http://localhost:3000]

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use clap::Parser;

use webtts::signing::{QueryParams, SignatureVerifier, VALID_TO_PARAM};

#[derive(Parser, Debug)]
#[command(name = "webtts-sign", version, about = "Create signed webtts URLs")]
struct Args {
    /// Key shared with the webtts server
    #[arg(long, env = "SIGNATURE_KEY", hide_env_values = true)]
    signature_key: String,

    /// Text to synthesize
    #[arg(long)]
    text: String,

    /// Language code
    #[arg(long)]
    lang: Option<String>,

    /// Voice name
    #[arg(long)]
    voice: Option<String>,

    /// Provider name (google, gcp, azure)
    #[arg(long)]
    provider: Option<String>,

    /// Seconds from now until the URL expires
    #[arg(long, default_value_t = 86_400)]
    valid_for_secs: i64,

    /// Server base URL the path is appended to
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let valid_to = expiry_after(Utc::now(), args.valid_for_secs)?;
    let verifier = SignatureVerifier::new(&args.signature_key).context("Invalid signature key")?;

    let mut params = QueryParams::new();
    params.insert("text", args.text);
    params.insert(VALID_TO_PARAM, valid_to.to_rfc3339_opts(SecondsFormat::Secs, true));
    for (name, value) in [
        ("lang", args.lang),
        ("voice", args.voice),
        ("provider", args.provider),
    ] {
        if let Some(value) = value {
            params.insert(name, value);
        }
    }

    println!(
        "{}/tts.ogg?{}",
        args.base_url.trim_end_matches('/'),
        verifier.signed_query(&params)
    );
    Ok(())
}

fn expiry_after(now: DateTime<Utc>, valid_for_secs: i64) -> Result<DateTime<Utc>> {
    if valid_for_secs <= 0 {
        anyhow::bail!("--valid-for-secs must be positive");
    }
    Duration::try_seconds(valid_for_secs)
        .and_then(|validity| now.checked_add_signed(validity))
        .with_context(|| format!("--valid-for-secs {} is out of range", valid_for_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after_adds_validity() {
        let now: DateTime<Utc> = "2026-10-18T09:30:00Z".parse().unwrap();
        let valid_to = expiry_after(now, 86_400).unwrap();
        assert_eq!(valid_to.to_rfc3339_opts(SecondsFormat::Secs, true), "2026-10-19T09:30:00Z");
    }

    #[test]
    fn test_expiry_after_rejects_non_positive() {
        assert!(expiry_after(Utc::now(), 0).is_err());
        assert!(expiry_after(Utc::now(), -5).is_err());
    }

    #[test]
    fn test_expiry_after_rejects_overflow() {
        assert!(expiry_after(Utc::now(), i64::MAX).is_err());
        assert!(expiry_after(Utc::now(), 10_000_000_000_000).is_err());
    }
}

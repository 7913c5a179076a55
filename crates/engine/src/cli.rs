//! Command-line front end: `encrypt <label>` and `decrypt`, JSON on stdin and
//! stdout.

use common::error::EnvelopeError;
use common::protocol::SecureEnvelope;
use serde_json::Value;
use thiserror::Error;

use crate::context::EngineContext;
use crate::envelope::{EnvelopeDecryptor, EnvelopeEncryptor};

/// Usage text printed on a bad invocation.
pub const USAGE: &str = "usage: engine encrypt <label> < payload.json\n       engine decrypt < envelope.json";

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Seal the payload read from stdin under `label`.
    Encrypt { label: String },
    /// Open the envelope read from stdin.
    Decrypt,
}

/// Errors produced by the command layer.
#[derive(Debug, Error)]
pub enum CliError {
    /// The arguments did not name a known command.
    #[error("invalid arguments")]
    Usage,

    /// The payload given to `encrypt` is not JSON.
    #[error("payload is not valid JSON")]
    InvalidPayload,

    /// The engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EnvelopeError),
}

impl Command {
    /// Parse arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] for anything other than `encrypt <label>`
    /// or `decrypt`.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        match args.as_slice() {
            [cmd, label] if cmd == "encrypt" => Ok(Command::Encrypt {
                label: label.clone(),
            }),
            [cmd] if cmd == "decrypt" => Ok(Command::Decrypt),
            _ => Err(CliError::Usage),
        }
    }
}

/// Run `cmd` against `input` and return the JSON text to print.
///
/// An `input` that does not parse as an envelope is reported as
/// [`EnvelopeError::CiphertextCorrupt`].
///
/// # Errors
///
/// Returns [`CliError::InvalidPayload`] for non-JSON `encrypt` input and
/// [`CliError::Engine`] for any engine failure.
pub fn run(cmd: &Command, ctx: &EngineContext, input: &str) -> Result<String, CliError> {
    match cmd {
        Command::Encrypt { label } => {
            let payload: Value =
                serde_json::from_str(input).map_err(|_| CliError::InvalidPayload)?;
            let envelope = EnvelopeEncryptor::new(ctx.clone()).encrypt(label, &payload)?;
            serde_json::to_string(&envelope).map_err(|_| EnvelopeError::Unknown.into())
        }
        Command::Decrypt => {
            let envelope: SecureEnvelope =
                serde_json::from_str(input).map_err(|_| EnvelopeError::CiphertextCorrupt)?;
            let payload: Value = EnvelopeDecryptor::new(ctx.clone()).decrypt(&envelope)?;
            serde_json::to_string(&payload).map_err(|_| EnvelopeError::Unknown.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MasterKey;
    use serde_json::json;

    fn ctx() -> EngineContext {
        EngineContext::new(MasterKey::from_bytes(&[7u8; 32]).unwrap())
    }

    #[test]
    fn parse_encrypt() {
        assert_eq!(
            Command::parse(["encrypt", "vendor-x"]).unwrap(),
            Command::Encrypt {
                label: "vendor-x".into()
            }
        );
    }

    #[test]
    fn parse_decrypt() {
        assert_eq!(Command::parse(["decrypt"]).unwrap(), Command::Decrypt);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!(matches!(Command::parse(["encrypt"]), Err(CliError::Usage)));
        assert!(matches!(Command::parse(["decrypt", "x"]), Err(CliError::Usage)));
        assert!(matches!(Command::parse(["rotate"]), Err(CliError::Usage)));
        assert!(matches!(
            Command::parse(Vec::<String>::new()),
            Err(CliError::Usage)
        ));
    }

    #[test]
    fn encrypt_then_decrypt() {
        let ctx = ctx();
        let sealed = run(
            &Command::Encrypt {
                label: "vendor-x".into(),
            },
            &ctx,
            r#"{"amount":1000,"currency":"USD"}"#,
        )
        .unwrap();
        let opened = run(&Command::Decrypt, &ctx, &sealed).unwrap();
        let v: Value = serde_json::from_str(&opened).unwrap();
        assert_eq!(v, json!({"amount": 1000, "currency": "USD"}));
    }

    #[test]
    fn encrypt_rejects_non_json() {
        let r = run(
            &Command::Encrypt { label: "l".into() },
            &ctx(),
            "not json",
        );
        assert!(matches!(r, Err(CliError::InvalidPayload)));
    }

    #[test]
    fn decrypt_rejects_non_envelope() {
        let r = run(&Command::Decrypt, &ctx(), r#"{"hello":"world"}"#);
        assert!(matches!(
            r,
            Err(CliError::Engine(EnvelopeError::CiphertextCorrupt))
        ));
    }
}

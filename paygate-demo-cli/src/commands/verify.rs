//! Verify command - check the signature of a received XML body

use std::path::Path;

use anyhow::{Context, Result};
use paygate_lib::codec::{WireCodec, XmlCodec};
use paygate_lib::verifier::ResponseVerifier;
use paygate_lib::PaygateError;

use super::Settings;
use crate::ui;

pub fn run(settings: &Settings, file: &Path) -> Result<()> {
    let config = super::load_config(settings)?;
    let body = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let params = XmlCodec::new()
        .decode(&body)
        .with_context(|| format!("{} is not a gateway message", file.display()))?;

    let verifier = ResponseVerifier::new(config.sign_type, &config.credentials.key);
    match verifier.verify_notification(params) {
        Ok(params) => {
            if settings.json {
                ui::json(&serde_json::to_value(&params)?);
            } else {
                ui::success(&format!("Signature valid ({})", config.sign_type));
                ui::fields(&params);
            }
            Ok(())
        }
        Err(PaygateError::SignatureMismatch { fields }) => {
            ui::error(&format!("Signature mismatch ({})", config.sign_type));
            ui::fields(&fields);
            anyhow::bail!("{} failed signature verification", file.display())
        }
        Err(e) => Err(e.into()),
    }
}

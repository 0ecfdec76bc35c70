//! Sign command - assemble a request without sending it

use anyhow::{Context, Result};
use paygate_lib::assembler::{self, OperationFamily};
use paygate_lib::codec::{WireCodec, XmlCodec};

use super::Settings;
use crate::ui;

pub fn run(settings: &Settings, args: &[String], family: OperationFamily) -> Result<()> {
    let config = super::load_config(settings)?;
    let params = super::parse_params(args)?;

    let signed = assembler::fill_request(params, &config, family)
        .context("Failed to assemble request")?;
    let body = XmlCodec::new().encode(&signed)?;
    let xml = String::from_utf8(body).context("Encoded request is not UTF-8")?;

    if settings.json {
        ui::json(&serde_json::to_value(&signed)?);
        return Ok(());
    }

    ui::title("Signed Request", config.sandbox);
    ui::key_value("Family", &format!("{:?}", family));
    ui::key_value("Algorithm", family.sign_type(config.sign_type).as_str());
    ui::fields(&signed);
    println!("\n{}", xml);

    Ok(())
}

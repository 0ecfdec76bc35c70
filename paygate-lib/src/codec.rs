//! Wire codec between [`Params`] and the gateway's markup format.
//!
//! The gateway speaks flat XML: a single root element whose children are
//! the fields, values usually wrapped in CDATA.
//!
//! ```text
//! <xml>
//!   <appid><![CDATA[A1]]></appid>
//!   <total_fee>100</total_fee>
//! </xml>
//! ```

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::params::Params;
use crate::{PaygateError, Result};

/// Conversion between a parameter map and encoded request/response bodies.
pub trait WireCodec: Send + Sync {
    /// Encode an outbound request body.
    fn encode(&self, params: &Params) -> Result<Vec<u8>>;

    /// Decode an inbound response body.
    fn decode(&self, body: &[u8]) -> Result<Params>;

    /// MIME type of encoded bodies.
    fn content_type(&self) -> &'static str;
}

/// Flat XML codec used by the gateway.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlCodec;

const ROOT: &str = "xml";

impl XmlCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

fn check_field_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Err(PaygateError::Codec(format!(
            "field name {:?} cannot be encoded as an element",
            name
        )));
    }
    Ok(())
}

impl WireCodec for XmlCodec {
    fn encode(&self, params: &Params) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Start(BytesStart::new(ROOT)))
            .map_err(PaygateError::codec)?;

        for (key, value) in params.iter() {
            check_field_name(key)?;
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(PaygateError::codec)?;
            // CDATA cannot contain its own terminator.
            let content = if value.contains("]]>") {
                Event::Text(BytesText::new(value))
            } else {
                Event::CData(BytesCData::new(value))
            };
            writer.write_event(content).map_err(PaygateError::codec)?;
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(PaygateError::codec)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(PaygateError::codec)?;
        Ok(writer.into_inner())
    }

    fn decode(&self, body: &[u8]) -> Result<Params> {
        let mut reader = Reader::from_reader(body);
        let mut buf = Vec::new();
        let mut params = Params::new();
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut field: Option<String> = None;
        let mut value = String::new();

        loop {
            match reader.read_event_into(&mut buf).map_err(PaygateError::codec)? {
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        1 => saw_root = true,
                        2 => {
                            let name = std::str::from_utf8(e.name().as_ref())
                                .map_err(PaygateError::codec)?
                                .to_string();
                            field = Some(name);
                            value.clear();
                        }
                        _ => {
                            return Err(PaygateError::Codec(
                                "nested elements are not supported".to_string(),
                            ))
                        }
                    }
                }
                Event::Empty(e) => match depth {
                    0 => saw_root = true,
                    1 => {
                        let name = std::str::from_utf8(e.name().as_ref())
                            .map_err(PaygateError::codec)?
                            .to_string();
                        params.insert(name, "");
                    }
                    _ => {
                        return Err(PaygateError::Codec(
                            "nested elements are not supported".to_string(),
                        ))
                    }
                },
                Event::Text(t) if depth == 2 => {
                    let text = t.unescape().map_err(PaygateError::codec)?;
                    if !text.trim().is_empty() {
                        value.push_str(&text);
                    }
                }
                Event::CData(c) if depth == 2 => {
                    let raw = c.into_inner();
                    value.push_str(std::str::from_utf8(&raw).map_err(PaygateError::codec)?);
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(name) = field.take() {
                            params.insert(name, std::mem::take(&mut value));
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof if depth > 0 => {
                    return Err(PaygateError::Codec("unexpected end of document".to_string()))
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(PaygateError::Codec("response has no root element".to_string()));
        }
        Ok(params)
    }

    fn content_type(&self) -> &'static str {
        "text/xml; charset=utf-8"
    }
}

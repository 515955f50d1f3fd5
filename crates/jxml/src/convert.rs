//! Format conversion entry points

use tracing::{debug, instrument};

use crate::config::Config;
use crate::decode::decode;
use crate::encode::encode;
use crate::error::{Error, ErrorKind, Result};
use crate::json;
use crate::xml::{self, Parser as XmlParser};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

/// Convert between JSON and XML with default options
pub fn convert(input: Option<&str>, from: Format, to: Format) -> Result<String> {
    convert_with_config(input, from, to, &Config::default())
}

/// Convert between JSON and XML.
///
/// `None` input fails with [`ErrorKind::NullInput`]. Converting a format to
/// itself returns the input unchanged once the options are validated.
pub fn convert_with_config(
    input: Option<&str>,
    from: Format,
    to: Format,
    config: &Config,
) -> Result<String> {
    let input = input.ok_or_else(|| Error::from_kind(ErrorKind::NullInput))?;

    match (from, to) {
        (Format::Json, Format::Xml) => json_to_xml(input, config),
        (Format::Xml, Format::Json) => xml_to_json(input, config),
        (Format::Json, Format::Json) | (Format::Xml, Format::Xml) => {
            config.markers()?;
            config.check_size(input)?;
            Ok(input.to_string())
        }
    }
}

/// JSON text -> standalone XML document text
#[instrument(level = "debug", skip_all, fields(len = input.len(), keep_namespace = config.keep_namespace))]
pub fn json_to_xml(input: &str, config: &Config) -> Result<String> {
    config.markers()?;
    config.check_size(input)?;

    let value = json::from_str_with_max_depth(input, config.max_depth)?;
    let doc = encode(&value, config)?;
    let output = xml::to_string(&doc)?;

    debug!(root = %doc.root.name, output_len = output.len(), "converted json to xml");
    Ok(output)
}

/// XML text -> compact JSON text
#[instrument(level = "debug", skip_all, fields(len = input.len(), keep_namespace = config.keep_namespace))]
pub fn xml_to_json(input: &str, config: &Config) -> Result<String> {
    config.markers()?;
    config.check_size(input)?;

    let doc = XmlParser::with_max_depth(input, config.max_depth).parse()?;
    let value = decode(&doc, config)?;
    let output = json::to_string(&value)?;

    debug!(root = %doc.root.name, output_len = output.len(), "converted xml to json");
    Ok(output)
}

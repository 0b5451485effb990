use crate::error::ParseError;
use crate::types::SpecDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
    Auto,
}

pub fn parse_spec_str(input: &str, format: SpecFormat) -> Result<SpecDocument, ParseError> {
    let value = match format {
        SpecFormat::Json => serde_json::from_str::<serde_json::Value>(input)?,
        SpecFormat::Yaml => yaml_to_json(input)?,
        SpecFormat::Auto => {
            // JSON always starts with `{` after trimming; everything else is tried as YAML.
            if input.trim_start().starts_with('{') {
                serde_json::from_str::<serde_json::Value>(input)?
            } else {
                yaml_to_json(input)?
            }
        }
    };
    parse_spec_value(value)
}

pub fn parse_spec_value(value: serde_json::Value) -> Result<SpecDocument, ParseError> {
    for field in ["host", "schemes", "paths"] {
        if value.get(field).is_none() {
            return Err(ParseError::MissingField(field));
        }
    }
    Ok(serde_json::from_value::<SpecDocument>(value)?)
}

fn yaml_to_json(input: &str) -> Result<serde_json::Value, ParseError> {
    let y = serde_yaml::from_str::<serde_yaml::Value>(input)?;
    Ok(serde_json::to_value(y)?)
}

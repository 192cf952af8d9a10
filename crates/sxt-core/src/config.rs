//! Run configuration documents.
//!
//! A configuration is any XML document containing `Param` elements with
//! `name` and `value` attributes. Nesting and surrounding elements are
//! ignored:
//!
//! ```xml
//! <StandardXMLTransformerParams>
//!   <Param name="importOrExport" value="EXPORT"/>
//!   <Param name="standardName" value="ODM"/>
//! </StandardXMLTransformerParams>
//! ```

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::ConfigError;

const PARAM_ELEMENT: &[u8] = b"Param";

/// Read `(name, value)` pairs from a configuration file, in document order.
pub fn load_config_params(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_params(&source, path)
}

/// Parse `(name, value)` pairs from configuration XML.
///
/// A `Param` without a `name` attribute is skipped; a missing `value` reads
/// as the empty string. `path` is only used for error messages.
pub fn parse_config_params(
    source: &str,
    path: &Path,
) -> Result<Vec<(String, String)>, ConfigError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut params = Vec::new();
    let mut saw_root = false;
    loop {
        match reader.read_event().map_err(|e| ConfigError::xml(path, e))? {
            Event::Start(element) | Event::Empty(element) => {
                saw_root = true;
                if element.local_name().as_ref() == PARAM_ELEMENT {
                    if let Some(param) = read_param(&element, path)? {
                        params.push(param);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(ConfigError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }
    Ok(params)
}

fn read_param(
    element: &BytesStart<'_>,
    path: &Path,
) -> Result<Option<(String, String)>, ConfigError> {
    let mut name = None;
    let mut value = None;
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| ConfigError::xml(path, e))?;
        let slot = match attribute.key.local_name().as_ref() {
            b"name" => &mut name,
            b"value" => &mut value,
            _ => continue,
        };
        let raw = String::from_utf8_lossy(&attribute.value);
        let text = unescape(&raw).map_err(|e| ConfigError::xml(path, e))?;
        *slot = Some(text.into_owned());
    }
    Ok(name.map(|name| (name, value.unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Vec<(String, String)>, ConfigError> {
        parse_config_params(xml, Path::new("params.xml"))
    }

    #[test]
    fn reads_params_in_document_order() {
        let params = parse(
            r#"<Config>
                 <Param name="importOrExport" value="IMPORT"/>
                 <Group><Param name="standardName" value="ODM"></Param></Group>
               </Config>"#,
        )
        .unwrap();
        assert_eq!(
            params,
            vec![
                ("importOrExport".to_string(), "IMPORT".to_string()),
                ("standardName".to_string(), "ODM".to_string()),
            ]
        );
    }

    #[test]
    fn unescapes_attribute_values() {
        let params = parse(r#"<C><Param name="headerCommentText" value="R&amp;D &lt;draft&gt;"/></C>"#)
            .unwrap();
        assert_eq!(params[0].1, "R&D <draft>");
    }

    #[test]
    fn missing_value_is_empty_and_missing_name_is_skipped() {
        let params = parse(r#"<C><Param name="logFilePath"/><Param value="orphan"/></C>"#).unwrap();
        assert_eq!(params, vec![("logFilePath".to_string(), String::new())]);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            parse("<C><Param name='a' value='b'></C>"),
            Err(ConfigError::Xml { .. })
        ));
        assert!(matches!(parse(""), Err(ConfigError::EmptyDocument { .. })));
    }

    #[test]
    fn parse_errors_keep_the_reader_error() {
        let err = parse("<C><Param name='a' value='b'></C>").unwrap_err();
        assert!(err.to_string().contains("params.xml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

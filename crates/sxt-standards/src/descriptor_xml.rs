//! Descriptor file parsing.
//!
//! A descriptor file lists one `Transform` element per supported standard:
//!
//! ```xml
//! <AvailableTransforms>
//!   <Transform>
//!     <StandardName>ODM</StandardName>
//!     <StandardVersion>1.3.1</StandardVersion>
//!     <ImportXSL>odm/1.3.1/import/odm_to_cube.xsl</ImportXSL>
//!     <ExportXSL>odm/1.3.1/export/cube_to_odm.xsl</ExportXSL>
//!     <Schema>odm/1.3.1/ODM1-3-1.xsd</Schema>
//!     <DefaultStylesheet>odm1-3-1.xsl</DefaultStylesheet>
//!   </Transform>
//! </AvailableTransforms>
//! ```
//!
//! Field values are trimmed; when a field element repeats inside one
//! `Transform`, the first occurrence wins.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use sxt_model::TransformDescriptor;

use crate::error::StandardsError;

const TRANSFORM_ELEMENT: &[u8] = b"Transform";

#[derive(Debug, Clone, Copy)]
enum Field {
    StandardName,
    StandardVersion,
    ImportArtifact,
    ExportArtifact,
    Schema,
    DefaultStylesheet,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"StandardName" => Some(Field::StandardName),
            b"StandardVersion" => Some(Field::StandardVersion),
            b"ImportXSL" => Some(Field::ImportArtifact),
            b"ExportXSL" => Some(Field::ExportArtifact),
            b"Schema" => Some(Field::Schema),
            b"DefaultStylesheet" => Some(Field::DefaultStylesheet),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PartialDescriptor {
    standard_name: Option<String>,
    standard_version: Option<String>,
    import_artifact: Option<String>,
    export_artifact: Option<String>,
    schema: Option<String>,
    default_stylesheet: Option<String>,
}

impl PartialDescriptor {
    fn set_once(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::StandardName => &mut self.standard_name,
            Field::StandardVersion => &mut self.standard_version,
            Field::ImportArtifact => &mut self.import_artifact,
            Field::ExportArtifact => &mut self.export_artifact,
            Field::Schema => &mut self.schema,
            Field::DefaultStylesheet => &mut self.default_stylesheet,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn finish(self) -> TransformDescriptor {
        TransformDescriptor {
            standard_name: self.standard_name.unwrap_or_default(),
            standard_version: self.standard_version.unwrap_or_default(),
            import_artifact: self.import_artifact,
            export_artifact: self.export_artifact,
            schema: self.schema,
            default_stylesheet: self.default_stylesheet,
        }
    }
}

/// Parse descriptor XML into entries, in document order.
///
/// `path` is only used for error messages.
pub fn parse_descriptor_document(
    source: &str,
    path: &Path,
) -> Result<Vec<TransformDescriptor>, StandardsError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut descriptors = Vec::new();
    let mut current: Option<PartialDescriptor> = None;
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader
            .read_event()
            .map_err(|e| StandardsError::xml(path, e))?
        {
            Event::Start(element) => {
                saw_root = true;
                let tag = element.local_name().as_ref().to_vec();
                if tag == TRANSFORM_ELEMENT {
                    depth += 1;
                    current = Some(PartialDescriptor::default());
                    continue;
                }
                match (current.as_mut(), Field::from_tag(&tag)) {
                    (Some(partial), Some(field)) => {
                        let raw = reader
                            .read_text(element.name())
                            .map_err(|e| StandardsError::xml(path, e))?;
                        let value = unescape(&raw).map_err(|e| StandardsError::xml(path, e))?;
                        partial.set_once(field, value.trim().to_string());
                    }
                    _ => depth += 1,
                }
            }
            Event::Empty(element) => {
                saw_root = true;
                let tag = element.local_name().as_ref().to_vec();
                if tag == TRANSFORM_ELEMENT {
                    descriptors.push(PartialDescriptor::default().finish());
                } else if let (Some(partial), Some(field)) = (current.as_mut(), Field::from_tag(&tag))
                {
                    partial.set_once(field, String::new());
                }
            }
            Event::End(element) => {
                depth = depth.saturating_sub(1);
                if element.local_name().as_ref() == TRANSFORM_ELEMENT {
                    if let Some(partial) = current.take() {
                        descriptors.push(partial.finish());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(StandardsError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }
    if depth != 0 {
        return Err(StandardsError::Unterminated {
            path: path.to_path_buf(),
        });
    }
    Ok(descriptors)
}

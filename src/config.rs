//! Tool configuration module
//!
//! The host hands the tool its configuration as an XML fragment produced by
//! the tool's settings page:
//!
//! ```xml
//! <Configuration>
//!   <fileOutputPath>/data/out.csv</fileOutputPath>
//! </Configuration>
//! ```
//!
//! Only the first `fileOutputPath` child of the root element is read; any
//! other element, and any later `fileOutputPath`, is ignored. The text is
//! kept exactly as written, surrounding whitespace included. An empty
//! `fileOutputPath` element leaves the path unset, which the sink later
//! reports as a missing filename.

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::OutputToolError;

const PATH_ELEMENT: &[u8] = b"fileOutputPath";

/// Parsed tool configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolConfig {
    file_output_path: Option<String>,
}

impl ToolConfig {
    /// Creates a configuration for the given output path.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_output_path: Some(path.into()),
        }
    }

    /// Parses the configuration XML.
    ///
    /// Fails if the XML is malformed (mismatched or unclosed elements) or the
    /// root element has no `fileOutputPath` child.
    pub fn from_xml(xml: &str) -> Result<Self, OutputToolError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut depth = 0usize;
        let mut file_output_path: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if depth == 1 && e.name().as_ref() == PATH_ELEMENT {
                        // Consumes up to the matching end tag; depth is unchanged.
                        let raw = reader.read_text(e.name())?;
                        if file_output_path.is_none() {
                            file_output_path = Some(
                                unescape(&raw)
                                    .map_err(quick_xml::Error::from)?
                                    .into_owned(),
                            );
                        }
                    } else {
                        depth += 1;
                    }
                }
                Event::Empty(e) => {
                    if depth == 1
                        && e.name().as_ref() == PATH_ELEMENT
                        && file_output_path.is_none()
                    {
                        file_output_path = Some(String::new());
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(OutputToolError::InvalidConfig(
                "unclosed element".to_string(),
            ));
        }
        if file_output_path.is_none() {
            return Err(OutputToolError::InvalidConfig(
                "missing fileOutputPath element".to_string(),
            ));
        }
        Ok(Self { file_output_path })
    }

    /// The configured output path, or `None` if it was left blank.
    pub fn file_output_path(&self) -> Option<&str> {
        self.file_output_path
            .as_deref()
            .filter(|path| !path.is_empty())
    }

    /// Renders the configuration in the shape accepted by [`ToolConfig::from_xml`].
    pub fn to_xml(&self) -> String {
        let path = self.file_output_path().unwrap_or_default();
        format!(
            "<Configuration><fileOutputPath>{}</fileOutputPath></Configuration>",
            escape(path)
        )
    }
}

//! Streaming text and relationship extraction from OOXML parts.

use deckfork_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A single entry from an OPC relationships part.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// Parse a `.rels` part into its relationship entries.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut relationships = Vec::new();

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => {
                            id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Type" => {
                            rel_type = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Target" => {
                            target = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }

                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Extract all text runs from a slide or notes part, in document order.
///
/// Text lives in `a:t` elements; each `a:p` paragraph becomes one output
/// line. Empty paragraphs produce no line.
pub fn extract_text(xml: &str) -> Result<String> {
    // No trim_text here: whitespace inside a run is significant when
    // adjacent runs are concatenated.
    let mut reader = Reader::from_str(xml);

    let mut in_run = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if local_name(e.name().as_ref()) == b"t" {
                    in_run = true;
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_run {
                    let run = e
                        .unescape()
                        .map_err(|e| Error::Xml(format!("Error unescaping text run: {}", e)))?;
                    text.push_str(&run);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_run = false,
                b"p" => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing part text: {}", e)));
            }
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}

/// Resolve a relationship target against the directory of its source part.
///
/// Targets are usually relative ("slides/slide1.xml",
/// "../notesSlides/notesSlide1.xml"); a leading slash means
/// package-absolute.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

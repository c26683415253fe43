//! The PPTX package: slide list, text access, and saving.
//!
//! The whole archive is read into memory at open. The slide list is the
//! parsed `p:sldIdLst` of `ppt/presentation.xml`; removals mutate only
//! that in-memory list. Saving writes a complete new package in one shot:
//! every entry is copied through byte-for-byte except the presentation
//! part, which is rewritten with the removed `p:sldId` elements dropped.
//! Removed slides' parts stay in the package, merely unreferenced from
//! the slide list.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use deckfork_core::{Error, Result, SlideDocument, SlideIdentity, SlidePosition};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::extract;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// One entry of the slide list, in document order.
#[derive(Debug, Clone)]
struct SlideEntry {
    identity: SlideIdentity,
    part_path: String,
}

/// An opened PPTX package with its live slide list.
pub struct PptxPackage {
    /// All archive entries, in original order.
    entries: Vec<(String, Vec<u8>)>,

    /// The live slide list. Mutated only through `remove_slide`.
    slides: Vec<SlideEntry>,
}

impl PptxPackage {
    /// Open a package from any seekable reader.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| Error::Zip(format!("Failed to read archive entry: {}", e)))?;
            if !file.is_file() {
                continue;
            }
            let name = file.name().to_string();
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)
                .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;
            entries.push((name, bytes));
        }

        let mut package = Self {
            entries,
            slides: Vec::new(),
        };
        package.slides = package.parse_slide_list()?;

        Ok(package)
    }

    /// Open a package file on disk.
    pub fn open_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        Self::open(BufReader::new(File::open(path)?))
    }

    /// Write the package out in full, presentation part rewritten.
    pub fn save<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let presentation = self.rewrite_presentation()?;

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();

        for (name, bytes) in &self.entries {
            zip.start_file(name.clone(), options)
                .map_err(|e| Error::Zip(format!("Failed to start '{}': {}", name, e)))?;
            let content = if name == PRESENTATION_PART {
                &presentation
            } else {
                bytes
            };
            zip.write_all(content)
                .map_err(|e| Error::Zip(format!("Failed to write '{}': {}", name, e)))?;
        }

        zip.finish()
            .map_err(|e| Error::Zip(format!("Failed to finish archive: {}", e)))?;

        Ok(())
    }

    /// Save the package to a file on disk.
    pub fn save_path(&self, path: &Path) -> Result<()> {
        self.save(BufWriter::new(File::create(path)?))
    }

    /// Parse `p:sldIdLst` and resolve each entry's slide part path.
    fn parse_slide_list(&self) -> Result<Vec<SlideEntry>> {
        let rels = extract::parse_relationships(self.entry_str(PRESENTATION_RELS)?)?;
        let xml = self.entry_str(PRESENTATION_PART)?;

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut slides = Vec::new();
        let mut in_list = false;
        let mut found_list = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if extract::local_name(e.name().as_ref()) == b"sldIdLst" => {
                    in_list = true;
                    found_list = true;
                }
                Ok(Event::Empty(ref e)) if extract::local_name(e.name().as_ref()) == b"sldIdLst" => {
                    // A self-closing list: present but with zero slides.
                    found_list = true;
                }
                Ok(Event::End(ref e)) if extract::local_name(e.name().as_ref()) == b"sldIdLst" => {
                    in_list = false;
                }
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if in_list && extract::local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let (identity, rel_id) = parse_slide_id(e)?;
                    let rel = rels
                        .iter()
                        .find(|r| r.id == rel_id)
                        .ok_or_else(|| {
                            Error::Xml(format!("Slide relationship '{}' not found", rel_id))
                        })?;
                    slides.push(SlideEntry {
                        identity,
                        part_path: extract::resolve_target("ppt", &rel.target),
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing presentation: {}", e)));
                }
                _ => {}
            }
        }

        if !found_list {
            return Err(Error::EmptySlideList);
        }

        Ok(slides)
    }

    /// Re-serialize the presentation part, dropping every `p:sldId` whose
    /// identity is no longer in the live slide list. All other events are
    /// copied through untouched.
    fn rewrite_presentation(&self) -> Result<Vec<u8>> {
        let live: HashSet<u32> = self.slides.iter().map(|s| s.identity.0).collect();
        let xml = self.entry_str(PRESENTATION_PART)?;

        // No trim_text: the part is copied through verbatim apart from
        // the dropped elements.
        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        // Depth within a dropped <p:sldId> subtree; 0 means copying.
        let mut skipping = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Empty(e)) if skipping == 0 && extract::local_name(e.name().as_ref()) == b"sldId" => {
                    let (identity, _) = parse_slide_id(&e)?;
                    if live.contains(&identity.0) {
                        writer
                            .write_event(Event::Empty(e))
                            .map_err(|e| Error::Xml(format!("Error writing presentation: {}", e)))?;
                    }
                }
                Ok(Event::Start(e)) if skipping == 0 && extract::local_name(e.name().as_ref()) == b"sldId" => {
                    let (identity, _) = parse_slide_id(&e)?;
                    if live.contains(&identity.0) {
                        writer
                            .write_event(Event::Start(e))
                            .map_err(|e| Error::Xml(format!("Error writing presentation: {}", e)))?;
                    } else {
                        skipping = 1;
                    }
                }
                Ok(Event::Start(_)) if skipping > 0 => skipping += 1,
                Ok(Event::End(_)) if skipping > 0 => skipping -= 1,
                Ok(_) if skipping > 0 => {}
                Ok(event) => {
                    writer
                        .write_event(event)
                        .map_err(|e| Error::Xml(format!("Error writing presentation: {}", e)))?;
                }
                Err(e) => {
                    return Err(Error::Xml(format!("Error rewriting presentation: {}", e)));
                }
            }
        }

        Ok(writer.into_inner().into_inner())
    }

    /// Raw bytes of an archive entry.
    fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// An archive entry as UTF-8 text; missing entries are an error.
    fn entry_str(&self, name: &str) -> Result<&str> {
        let bytes = self
            .entry(name)
            .ok_or_else(|| Error::Zip(format!("File not found in archive '{}'", name)))?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::Xml(format!("'{}' is not valid UTF-8: {}", name, e)))
    }

    fn slide(&self, position: SlidePosition) -> Result<&SlideEntry> {
        self.slides
            .get(position.index())
            .ok_or(Error::SlideOutOfRange(position))
    }
}

impl SlideDocument for PptxPackage {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn identity_at(&self, position: SlidePosition) -> Result<SlideIdentity> {
        Ok(self.slide(position)?.identity)
    }

    fn visible_text(&self, position: SlidePosition) -> Result<String> {
        let part_path = self.slide(position)?.part_path.clone();
        extract::extract_text(self.entry_str(&part_path)?)
    }

    fn notes_text(&self, position: SlidePosition) -> Result<String> {
        let part_path = self.slide(position)?.part_path.clone();

        // Slide rels live next to the slide part; a slide without a rels
        // part or a notesSlide relationship simply has no notes.
        let Some(rels_xml) = self.entry(&rels_path_for(&part_path)) else {
            log::debug!("No rels part for '{}', treating notes as empty", part_path);
            return Ok(String::new());
        };
        let rels_xml = std::str::from_utf8(rels_xml)
            .map_err(|e| Error::Xml(format!("Slide rels are not valid UTF-8: {}", e)))?;

        let rels = extract::parse_relationships(rels_xml)?;
        let Some(rel) = rels.iter().find(|r| r.rel_type.ends_with("/notesSlide")) else {
            return Ok(String::new());
        };

        let notes_path = extract::resolve_target(parent_dir(&part_path), &rel.target);
        match self.entry(&notes_path) {
            Some(_) => extract::extract_text(self.entry_str(&notes_path)?),
            None => Ok(String::new()),
        }
    }

    fn remove_slide(&mut self, identity: SlideIdentity) -> bool {
        match self.slides.iter().position(|s| s.identity == identity) {
            Some(index) => {
                self.slides.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Pull the numeric identity and the `r:id` off a `p:sldId` element.
fn parse_slide_id(e: &quick_xml::events::BytesStart<'_>) -> Result<(SlideIdentity, String)> {
    let mut identity = None;
    let mut rel_id = String::new();

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"id" => {
                let value = String::from_utf8_lossy(&attr.value).to_string();
                identity = Some(value.parse::<u32>().map_err(|_| {
                    Error::Xml(format!("Slide id '{}' is not numeric", value))
                })?);
            }
            b"r:id" => {
                rel_id = String::from_utf8_lossy(&attr.value).to_string();
            }
            _ => {}
        }
    }

    let identity = identity.ok_or_else(|| Error::Xml("sldId element has no id".to_string()))?;
    Ok((SlideIdentity(identity), rel_id))
}

/// The `.rels` part path for a given part ("ppt/slides/slide1.xml" ->
/// "ppt/slides/_rels/slide1.xml.rels").
fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Directory portion of a part path.
fn parent_dir(part_path: &str) -> &str {
    part_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

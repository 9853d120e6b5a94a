//! Raw text from Office Open XML word-processing documents.

use std::io::{Cursor, Read};

use roxmltree::{Document, Node};

use super::ExtractError;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const MAIN_PART: &str = "word/document.xml";

/// Returns the text of every paragraph in the main document part.
/// Paragraphs are separated by a blank line; formatting is discarded.
pub fn extract_raw_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Unreadable(format!("DOCX is not a valid archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(MAIN_PART)
        .map_err(|e| ExtractError::Unreadable(format!("DOCX has no {MAIN_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    let doc = Document::parse(&xml)
        .map_err(|e| ExtractError::Unreadable(format!("DOCX XML is malformed: {e}")))?;

    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|n| n.has_tag_name((WORD_NS, "p")))
        .map(paragraph_text)
        .collect();

    Ok(paragraphs.join("\n\n"))
}

fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();
    for node in paragraph.descendants() {
        if node.tag_name().namespace() != Some(WORD_NS) {
            continue;
        }
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

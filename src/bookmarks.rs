//! Chapter outline injection built on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("Failed to process PDF bytes: {0}")]
    Parse(#[from] lopdf::Error),
    /// The trailer has no catalog reference.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object was not a dictionary.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A chapter points at a page the document does not have.
    #[error("Chapter {chapter_index} refers to missing page {page_number}")]
    MissingPage {
        chapter_index: usize,
        page_number: usize,
    },
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

/// A bookmark entry: the visible title and the 1-based page it jumps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterMark {
    pub title: String,
    pub page: usize,
}

/// Adds a flat `/Outlines` tree with one `/Dest [page /Fit]` entry per chapter.
///
/// Returns the input unchanged when `marks` is empty.
pub fn apply_chapter_bookmarks(
    pdf_bytes: &[u8],
    marks: &[ChapterMark],
) -> Result<Vec<u8>, BookmarkError> {
    if marks.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let mut entries = collect_outline_entries(&mut document, marks, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &mut entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    marks: &[ChapterMark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, BookmarkError> {
    marks
        .iter()
        .enumerate()
        .map(|(index, mark)| {
            let page_ref = u32::try_from(mark.page)
                .ok()
                .and_then(|number| pages.get(&number).copied())
                .ok_or(BookmarkError::MissingPage {
                    chapter_index: index,
                    page_number: mark.page,
                })?;

            Ok(OutlineEntry {
                object_id: document.new_object_id(),
                page_ref,
                title: mark.title.clone(),
            })
        })
        .collect()
}

fn link_outline_entries(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &mut [OutlineEntry],
) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set(
            "Title",
            Object::string_literal(entries[index].title.as_str()),
        );
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BuiltinCanvas, Canvas};

    fn two_page_pdf() -> Vec<u8> {
        let mut canvas = Box::new(BuiltinCanvas::new("bookmarks").expect("open canvas"));
        canvas.text("Primeira", 20.0, 20.0).expect("draw");
        canvas.add_page().expect("add page");
        canvas.text("Segunda", 20.0, 20.0).expect("draw");
        canvas.finish().expect("finish")
    }

    #[test]
    fn no_marks_returns_the_input_unchanged() {
        let bytes = two_page_pdf();
        let output = apply_chapter_bookmarks(&bytes, &[]).expect("no-op");
        assert_eq!(output, bytes);
    }

    #[test]
    fn marks_past_the_last_page_are_rejected() {
        let marks = [
            ChapterMark {
                title: "Capitulo 1: Manha".to_owned(),
                page: 1,
            },
            ChapterMark {
                title: "Capitulo 2: Noite".to_owned(),
                page: 5,
            },
        ];
        let err = apply_chapter_bookmarks(&two_page_pdf(), &marks).expect_err("page 5 is missing");
        assert!(matches!(
            err,
            BookmarkError::MissingPage {
                chapter_index: 1,
                page_number: 5
            }
        ));
    }

    #[test]
    fn outline_lists_marks_in_order() {
        let marks = [
            ChapterMark {
                title: "Capitulo 1: Manha".to_owned(),
                page: 1,
            },
            ChapterMark {
                title: "Capitulo 2: Noite".to_owned(),
                page: 2,
            },
        ];
        let output = apply_chapter_bookmarks(&two_page_pdf(), &marks).expect("bookmarks");
        let document = Document::load_mem(&output).expect("parse");
        let catalog_id = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .expect("catalog");
        let catalog = document.get_dictionary(catalog_id).expect("catalog dict");
        let outlines_id = catalog
            .get(b"Outlines")
            .and_then(Object::as_reference)
            .expect("outlines");
        let outlines = document.get_dictionary(outlines_id).expect("outlines dict");
        assert_eq!(outlines.get(b"Count").and_then(Object::as_i64).expect("count"), 2);

        let first_id = outlines
            .get(b"First")
            .and_then(Object::as_reference)
            .expect("first entry");
        let first = document.get_dictionary(first_id).expect("first dict");
        let title = first.get(b"Title").and_then(Object::as_str).expect("title");
        assert_eq!(title, b"Capitulo 1: Manha");
    }
}

// ==========================================
// Price list generator - document merge
// ==========================================
// Responsibility: concatenate the final TOC document and the content
// document into the delivered artifact, then materialize the link
// rectangles recorded during composition as annotations: page links
// for TOC rows, external links for product names. Chapter headings
// additionally become an outline tree.
// ==========================================

use crate::report::composer::{ComposedContent, TocEntryKind};
use crate::report::error::{ReportError, ReportResult};
use crate::report::page::{LinkRect, LinkTarget, PAGE_HEIGHT_MM};
use crate::report::toc::TocDocument;
use lopdf::{dictionary, Bookmark, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::debug;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

pub struct DocumentMerger;

impl DocumentMerger {
    /// Page count of a serialized document.
    pub fn count_pages(bytes: &[u8]) -> ReportResult<usize> {
        let doc = Document::load_mem(bytes)?;
        Ok(doc.get_pages().len())
    }

    /// Merges TOC pages (when present) followed by content pages into
    /// one document and returns its bytes.
    pub fn merge(toc: Option<&TocDocument>, content: &ComposedContent) -> ReportResult<Vec<u8>> {
        let mut parts: Vec<Document> = Vec::new();
        if let Some(toc) = toc {
            parts.push(Document::load_mem(&toc.bytes)?);
        }
        parts.push(Document::load_mem(&content.bytes)?);

        let mut merged = Document::with_version("1.5");
        let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
        let mut ordered_pages: Vec<(ObjectId, Object)> = Vec::new();
        let mut max_id = 1;

        for mut part in parts {
            part.renumber_objects_with(max_id);
            max_id = part.max_id + 1;
            for (_, object_id) in part.get_pages() {
                let object = part.get_object(object_id)?.to_owned();
                ordered_pages.push((object_id, object));
            }
            all_objects.extend(part.objects.clone());
        }

        // One catalog and one page-tree root survive the merge.
        let mut catalog: Option<(ObjectId, Dictionary)> = None;
        let mut pages_root: Option<(ObjectId, Dictionary)> = None;
        for (object_id, object) in &all_objects {
            match dict_type(object) {
                Some(b"Catalog") => {
                    if catalog.is_none() {
                        if let Ok(dict) = object.as_dict() {
                            catalog = Some((*object_id, dict.clone()));
                        }
                    }
                }
                Some(b"Pages") => {
                    if pages_root.is_none() {
                        if let Ok(dict) = object.as_dict() {
                            pages_root = Some((*object_id, dict.clone()));
                        }
                    }
                }
                Some(b"Page" | b"Outlines" | b"Outline") => {}
                _ => {
                    merged.objects.insert(*object_id, object.clone());
                }
            }
        }
        let (catalog_id, mut catalog_dict) = catalog.ok_or(ReportError::EmptyDocument)?;
        let (pages_id, mut pages_dict) = pages_root.ok_or(ReportError::EmptyDocument)?;

        for (object_id, object) in &ordered_pages {
            if let Ok(dict) = object.as_dict() {
                let mut dict = dict.clone();
                dict.set("Parent", pages_id);
                merged.objects.insert(*object_id, Object::Dictionary(dict));
            }
        }
        let page_ids: Vec<ObjectId> = ordered_pages.iter().map(|(id, _)| *id).collect();
        let toc_pages = toc.map(|t| t.pages).unwrap_or(0);

        Self::annotate(&mut merged, &page_ids, toc, content, toc_pages);
        Self::outline_chapters(&mut merged, &page_ids, content, toc_pages);

        let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", kids.len() as i64);
        pages_dict.set("Kids", kids);
        pages_dict.remove(b"Parent");
        merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

        catalog_dict.set("Pages", pages_id);
        catalog_dict.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(catalog_dict));
        merged.trailer.set("Root", catalog_id);

        merged.max_id = merged.objects.len() as u32;
        merged.renumber_objects();
        merged.adjust_zero_pages();

        if let Some(outline_id) = merged.build_outline() {
            if let Ok(root_id) = merged.trailer.get(b"Root").and_then(Object::as_reference) {
                if let Ok(Object::Dictionary(dict)) = merged.get_object_mut(root_id) {
                    dict.set("Outlines", outline_id);
                }
            }
        }

        merged.compress();
        let mut bytes = Vec::new();
        merged.save_to(&mut bytes)?;
        debug!(pages = page_ids.len(), toc_pages, "documents merged");
        Ok(bytes)
    }

    /// Turns recorded link rectangles into Link annotations. TOC links
    /// use the already-offset final page numbers; content links sit
    /// `toc_pages` later than their content-relative page.
    fn annotate(
        merged: &mut Document,
        page_ids: &[ObjectId],
        toc: Option<&TocDocument>,
        content: &ComposedContent,
        toc_pages: usize,
    ) {
        let mut per_page: BTreeMap<usize, Vec<Object>> = BTreeMap::new();

        if let Some(toc) = toc {
            for link in &toc.links {
                let LinkTarget::Page(final_page) = &link.target else {
                    continue;
                };
                let Some(target_id) = page_ids.get(final_page - 1) else {
                    continue;
                };
                let action = dictionary! {
                    "S" => "GoTo",
                    "D" => vec![
                        Object::Reference(*target_id),
                        Object::Name(b"XYZ".to_vec()),
                        Object::Null,
                        Object::Null,
                        Object::Null,
                    ],
                };
                let annot_id = merged.add_object(link_annotation(link, action));
                per_page.entry(link.page - 1).or_default().push(annot_id.into());
            }
        }

        for link in &content.links {
            let LinkTarget::Url(url) = &link.target else {
                continue;
            };
            let action = dictionary! {
                "S" => "URI",
                "URI" => Object::string_literal(url.as_str()),
            };
            let annot_id = merged.add_object(link_annotation(link, action));
            let page_idx = toc_pages + link.page - 1;
            per_page.entry(page_idx).or_default().push(annot_id.into());
        }

        for (page_idx, annots) in per_page {
            let Some(page_id) = page_ids.get(page_idx) else {
                continue;
            };
            if let Ok(Object::Dictionary(dict)) = merged.get_object_mut(*page_id) {
                dict.set("Annots", annots);
            }
        }
    }

    /// Group and brand headings as a two-level outline tree.
    fn outline_chapters(
        merged: &mut Document,
        page_ids: &[ObjectId],
        content: &ComposedContent,
        toc_pages: usize,
    ) {
        let mut group_outline: Option<u32> = None;
        for entry in &content.entries {
            let Some(page_id) = page_ids.get(entry.page + toc_pages - 1) else {
                continue;
            };
            let bookmark = Bookmark::new(entry.title.clone(), [0.0, 0.0, 0.0], 0, *page_id);
            match entry.kind {
                TocEntryKind::Group => {
                    group_outline = Some(merged.add_bookmark(bookmark, None));
                }
                TocEntryKind::Brand => {
                    merged.add_bookmark(bookmark, group_outline);
                }
            }
        }
    }
}

fn link_annotation(link: &LinkRect, action: Dictionary) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect_points(link),
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => action,
    }
}

/// Top-down page millimeters to the PDF point rectangle.
fn rect_points(link: &LinkRect) -> Vec<Object> {
    vec![
        real(link.x * POINTS_PER_MM),
        real((PAGE_HEIGHT_MM - link.y - link.height) * POINTS_PER_MM),
        real((link.x + link.width) * POINTS_PER_MM),
        real((PAGE_HEIGHT_MM - link.y) * POINTS_PER_MM),
    ]
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

fn dict_type(object: &Object) -> Option<&[u8]> {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|value| value.as_name().ok())
}

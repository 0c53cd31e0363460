//! Test fixtures: programmatically built multi-page PDFs.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF at `path` with one page per entry of `pages`, each page
/// carrying the given text lines. Every line is emitted as its own text
/// object so the text layer reads back line by line.
pub fn build_pdf(path: &Path, pages: &[Vec<String>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = Vec::new();
        let mut y = 760;
        for line in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 11.into()]));
            operations.push(Operation::new("Td", vec![36.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.as_str())],
            ));
            operations.push(Operation::new("ET", vec![]));
            y -= 14;
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Page content for a synthetic futures report: a title line plus one
/// fixed-width table per page with `rows_per_page` data rows. Row cells
/// are tagged with page and row index so ordering is checkable end to end.
pub fn report_pages(page_count: usize, rows_per_page: usize) -> Vec<Vec<String>> {
    (0..page_count)
        .map(|page| {
            let mut lines = vec![
                format!("EOD Futures Report page {page}"),
                "Contract  Settle  Volume".to_string(),
            ];
            for row in 0..rows_per_page {
                lines.push(format!("FUT{page:02}R{row}  {page}.{row}0  {}", 100 + row));
            }
            lines
        })
        .collect()
}

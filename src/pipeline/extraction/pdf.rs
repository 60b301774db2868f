use std::panic::{catch_unwind, AssertUnwindSafe};

use super::ExtractionError;

/// Decode a digital PDF's embedded text layer into one text blob,
/// pages separated by a blank line.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed streams instead of returning Err.
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
    }))
    .map_err(|_| ExtractionError::UnparsableDocument("PDF decoder aborted".into()))?
    .map_err(|e| ExtractionError::UnparsableDocument(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "PDF text layer decoded");

    Ok(pages
        .iter()
        .map(|page| page.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid single-page PDF with text using lopdf.
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_text_from_digital_pdf() {
        let bytes = make_test_pdf("Quarterly Sales Report");
        let text = extract_pdf_text(&bytes).unwrap();
        assert!(
            text.contains("Quarterly") || text.contains("Sales"),
            "expected decoded text, got: {text}"
        );
    }

    #[test]
    fn garbage_bytes_are_unparsable() {
        let result = extract_pdf_text(b"not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::UnparsableDocument(_))));
    }

    #[test]
    fn empty_input_is_unparsable() {
        assert!(matches!(
            extract_pdf_text(&[]),
            Err(ExtractionError::UnparsableDocument(_))
        ));
    }
}

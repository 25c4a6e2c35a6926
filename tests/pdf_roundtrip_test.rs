//! Integration tests against synthetic PDFs built with lopdf, running
//! the default collaborator stack end to end.

use std::io::Cursor;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdftally::{estimate_bytes, extract_text, DocumentSource, Estimator, PdfSource};

/// Encode a solid RGB image as JPEG bytes.
fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// Build a one-page PDF containing a text line and, optionally, one
/// embedded JPEG image.
fn build_pdf(text: &str, image: Option<(u32, u32)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };

    if let Some((w, h)) = image {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w as i64,
                "Height" => h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg_bytes(w, h),
        ));
        resources.set(
            "XObject",
            dictionary! {
                "Im1" => image_id,
            },
        );
    }

    let resources_id = doc.add_object(resources);

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn test_source_reads_synthetic_pdf() {
    let bytes = build_pdf("Hello World!", None);
    let source = PdfSource::from_bytes(&bytes).unwrap();

    assert!(!source.is_encrypted());
    assert_eq!(source.page_count(), 1);
    assert!(source.page_text(1).unwrap().contains("Hello World!"));
    assert!(source.page_images(1).unwrap().is_empty());
}

#[test]
fn test_source_extracts_embedded_jpeg() {
    let bytes = build_pdf("with image", Some((600, 400)));
    let source = PdfSource::from_bytes(&bytes).unwrap();

    let images = source.page_images(1).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "Im1");
    // DCTDecode streams come back as the raw JPEG payload.
    assert!(images[0].data.starts_with(&[0xFF, 0xD8]));
}

#[test]
fn test_estimate_text_only_document() {
    let bytes = build_pdf("The quick brown fox jumps over the lazy dog", None);
    let report = estimate_bytes(&bytes).unwrap();

    assert!(report.text_tokens() > 0);
    assert_eq!(report.images().len(), 0);
    assert_eq!(report.total_tokens(), report.text_tokens());
}

#[test]
fn test_estimate_document_with_image() {
    let bytes = build_pdf("Hello World!", Some((600, 400)));
    let report = estimate_bytes(&bytes).unwrap();

    // 600x400 needs no clamping: 2x1 tiles.
    assert_eq!(report.images().len(), 1);
    assert_eq!(report.images()[0].tokens, 85 + 170 * 2);
    let image_sum: u64 = report.images().iter().map(|c| c.tokens).sum();
    assert_eq!(report.total_tokens(), report.text_tokens() + image_sum);
}

#[test]
fn test_estimate_file_from_disk() {
    let bytes = build_pdf("on disk", None);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.pdf");
    std::fs::write(&path, &bytes).unwrap();

    let estimator = Estimator::with_defaults().unwrap();
    let report = estimator.estimate_file(&path).unwrap();
    assert_eq!(report.total_tokens(), report.text_tokens());

    let text = extract_text(&path).unwrap();
    assert!(text.contains("on disk"));
}

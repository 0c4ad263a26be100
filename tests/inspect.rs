//! Template inspection over synthetic `.pptx` packages.
#![cfg(feature = "inspect")]

use std::io::{Cursor, Write};

use deckgen::layout::{inspect_pptx, inspect_pptx_bytes, skeleton_template, LayoutMode, LayoutTemplate};
use deckgen::{build_registry, resolve_layout, resolve_placeholder, Error, Theme};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

fn layout_xml(name: &str, placeholders: &[(&str, Option<u32>, &str)]) -> String {
    let mut shapes = String::new();
    for (i, (shape, idx, kind)) in placeholders.iter().enumerate() {
        let idx = idx.map(|v| format!(r#" idx="{}""#, v)).unwrap_or_default();
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr/><p:nvPr><p:ph type="{}"{}/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
            i + 2,
            shape,
            kind,
            idx
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {}><p:cSld name="{}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>{}</p:spTree></p:cSld></p:sldLayout>"#,
        NS, name, shapes
    )
}

fn rels(targets: &[&str]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, target) in targets.iter().enumerate() {
        out.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/x" Target="{}"/>"#,
            i + 1,
            target
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// A package whose master lists layouts 3, 1, 2 (collection order differs
/// from part numbering).
fn sample_pptx() -> Vec<u8> {
    let presentation = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst></p:presentation>"#,
        NS
    );
    let master = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId3"/><p:sldLayoutId id="2147483650" r:id="rId1"/><p:sldLayoutId id="2147483651" r:id="rId2"/></p:sldLayoutIdLst></p:sldMaster>"#,
        NS
    );

    let parts: Vec<(&str, String)> = vec![
        ("ppt/presentation.xml", presentation),
        ("ppt/_rels/presentation.xml.rels", rels(&["slideMasters/slideMaster1.xml"])),
        ("ppt/slideMasters/slideMaster1.xml", master),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels(&[
                "../slideLayouts/slideLayout1.xml",
                "../slideLayouts/slideLayout2.xml",
                "../slideLayouts/slideLayout3.xml",
            ]),
        ),
        (
            "ppt/slideLayouts/slideLayout3.xml",
            layout_xml("Light - Title", &[("Title 1", None, "ctrTitle"), ("Subtitle 2", Some(1), "subTitle")]),
        ),
        (
            "ppt/slideLayouts/slideLayout1.xml",
            layout_xml("Dark - Title", &[("Title 1", None, "ctrTitle"), ("Subtitle 2", Some(11), "subTitle")]),
        ),
        ("ppt/slideLayouts/slideLayout2.xml", layout_xml("Blank", &[])),
    ];

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, content) in &parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

#[test]
fn test_layouts_in_master_order() {
    let layouts = inspect_pptx_bytes(sample_pptx()).unwrap();
    let names: Vec<&str> = layouts.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Light - Title", "Dark - Title", "Blank"]);

    assert_eq!(layouts[0].mode, LayoutMode::Light);
    assert_eq!(layouts[1].mode, LayoutMode::Dark);
    assert_eq!(layouts[2].mode, LayoutMode::Normal);
    assert_eq!(layouts[1].short_name, "Title");
    assert_eq!(layouts[1].index, 1);

    let subtitle = &layouts[1].placeholders[1];
    assert_eq!(subtitle.idx, 11);
    assert_eq!(subtitle.kind, "subTitle");
    assert_eq!(layouts[0].placeholders[0].idx, 0);
}

#[test]
fn test_inspect_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.pptx");
    std::fs::write(&path, sample_pptx()).unwrap();
    assert_eq!(inspect_pptx(&path).unwrap().len(), 3);
}

#[test]
fn test_skeleton_round_trip_to_registry() {
    let layouts = inspect_pptx_bytes(sample_pptx()).unwrap();
    let yaml = skeleton_template(&layouts).to_yaml().unwrap();
    let template = LayoutTemplate::from_yaml_str(&yaml).unwrap();
    let registry = build_registry(&template).unwrap();

    let title = resolve_layout("Title", &registry).unwrap();
    assert_eq!(title.layout_index(Theme::Light).unwrap(), 0);
    assert_eq!(title.layout_index(Theme::Dark).unwrap(), 1);
    assert_eq!(resolve_placeholder(&title, "Subtitle 2", Theme::Dark).unwrap(), 11);

    let blank = resolve_layout("blank", &registry).unwrap();
    assert_eq!(blank.layout_index(Theme::Light).unwrap(), 2);
    assert_eq!(blank.layout_index(Theme::Dark).unwrap(), 2);
}

#[test]
fn test_not_a_presentation() {
    assert!(matches!(inspect_pptx_bytes(b"plain bytes".to_vec()), Err(Error::ZipArchive(_))));

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<w:document/>").unwrap();
        zip.finish().unwrap();
    }
    assert!(matches!(inspect_pptx_bytes(buffer), Err(Error::MissingComponent(_))));
}

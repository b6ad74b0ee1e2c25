mod common;

use common::{fixture_dir, png_bytes, write_sprite_tree};

const STORYBOARD: &str = "\
panelWidth: 800
panelHeight: 600

```comic Test
left_guy_smile: Hi
right_girl_angry: No
```
";

#[test]
fn one_panel_two_images_two_texts_right_one_flipped() {
    let dir = fixture_dir("compose_basic");
    write_sprite_tree(&dir);
    let doc = dir.join("story.md");
    std::fs::write(&doc, STORYBOARD).unwrap();

    let out_dir = dir.join("panels");
    let written = panelet::run(&doc, &out_dir).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0], out_dir.join("panel-01.svg"));

    let svg = std::fs::read_to_string(&written[0]).unwrap();
    let tree = roxmltree::Document::parse(&svg).unwrap();

    let images: Vec<_> = tree
        .descendants()
        .filter(|n| n.has_tag_name(("http://www.w3.org/2000/svg", "image")))
        .collect();
    assert_eq!(images.len(), 2);

    let flipped: Vec<_> = images
        .iter()
        .filter(|n| {
            n.attribute("transform")
                .is_some_and(|t| t.contains("scale(-1 1)"))
        })
        .collect();
    assert_eq!(flipped.len(), 1, "exactly the right-side image is mirrored");
    // The unmirrored image sits at the left margin.
    let plain = images
        .iter()
        .find(|n| n.attribute("transform").is_none())
        .unwrap();
    assert_eq!(plain.attribute("x"), Some("20"));

    let texts: Vec<_> = tree
        .descendants()
        .filter(|n| n.has_tag_name(("http://www.w3.org/2000/svg", "text")))
        .collect();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].attribute("text-anchor"), Some("start"));
    assert_eq!(texts[1].attribute("text-anchor"), Some("end"));

    let contents: Vec<String> = texts
        .iter()
        .map(|t| {
            t.descendants()
                .filter_map(|n| n.text())
                .collect::<String>()
        })
        .collect();
    assert_eq!(contents, vec!["Hi".to_string(), "No".to_string()]);

    // Sprite data is embedded, not referenced.
    assert!(svg.contains("data:image/png;base64,"));
}

#[test]
fn file_count_matches_panel_count_in_document_order() {
    let dir = fixture_dir("compose_many");
    write_sprite_tree(&dir);
    let doc = dir.join("story.md");
    let mut text = String::new();
    for i in 0..3 {
        text.push_str(&format!(
            "```comic Panel {i}\nleft_guy_smile: a\nright_girl_laugh: b\n```\n\n"
        ));
    }
    std::fs::write(&doc, &text).unwrap();

    let written = panelet::run(&doc, &dir.join("panels")).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["panel-01.svg", "panel-02.svg", "panel-03.svg"]);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let dir = fixture_dir("compose_determinism");
    write_sprite_tree(&dir);
    let doc = dir.join("story.md");
    std::fs::write(&doc, STORYBOARD).unwrap();

    let first = panelet::run(&doc, &dir.join("panels_a")).unwrap();
    let second = panelet::run(&doc, &dir.join("panels_b")).unwrap();
    let a = std::fs::read(&first[0]).unwrap();
    let b = std::fs::read(&second[0]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn oversized_sprite_never_exceeds_the_sprite_area() {
    let dir = fixture_dir("compose_oversize");
    write_sprite_tree(&dir);
    // Replace the male smile with a source far taller than the canvas.
    std::fs::write(
        dir.join("output/male/male_smile.png"),
        png_bytes(500, 4000, [1, 2, 3, 255]),
    )
    .unwrap();
    let doc = dir.join("story.md");
    std::fs::write(&doc, STORYBOARD).unwrap();

    let text = std::fs::read_to_string(&doc).unwrap();
    let doc_dir = doc.parent().unwrap();
    let storyboard = panelet::storyboard::parse(&text, doc_dir).unwrap();
    let composed = panelet::compose(&storyboard).unwrap();

    // 600 - 200 reserved for dialogue leaves 400 px for sprites.
    assert!(composed[0].geometry.left.height <= 400.0 + 1e-9);
}

#[test]
fn declared_font_is_embedded_and_missing_font_aborts() {
    let dir = fixture_dir("compose_font");
    write_sprite_tree(&dir);
    std::fs::write(dir.join("hand.ttf"), b"not really a font, embedded verbatim").unwrap();

    let doc = dir.join("story.md");
    std::fs::write(
        &doc,
        format!("fontPath: hand.ttf\nfontFamily: Handwriting\n\n{STORYBOARD}"),
    )
    .unwrap();
    let written = panelet::run(&doc, &dir.join("panels")).unwrap();
    let svg = std::fs::read_to_string(&written[0]).unwrap();
    assert!(svg.contains("@font-face"));
    assert!(svg.contains("font-family:\"Handwriting\""));

    let doc2 = dir.join("story2.md");
    std::fs::write(&doc2, format!("fontPath: gone.ttf\n\n{STORYBOARD}")).unwrap();
    let err = panelet::run(&doc2, &dir.join("panels2")).unwrap_err();
    assert!(err.to_string().contains("gone.ttf"), "{err}");
    assert!(
        !dir.join("panels2").join("panel-01.svg").exists(),
        "no partial output on failure"
    );
}

#[test]
fn custom_output_extension_is_honored() {
    let dir = fixture_dir("compose_extension");
    write_sprite_tree(&dir);
    let doc = dir.join("story.md");
    std::fs::write(&doc, format!("outputExtension: comic_svg\n\n{STORYBOARD}")).unwrap();

    let written = panelet::run(&doc, &dir.join("panels")).unwrap();
    assert!(written[0].ends_with("panel-01.comic_svg"));
}

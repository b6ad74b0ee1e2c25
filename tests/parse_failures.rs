mod common;

use common::{fixture_dir, write_sprite_tree};

fn run_doc(name: &str, body: &str, with_sprites: bool) -> Result<Vec<std::path::PathBuf>, panelet::PaneletError> {
    let dir = fixture_dir(name);
    if with_sprites {
        write_sprite_tree(&dir);
    }
    let doc = dir.join("story.md");
    std::fs::write(&doc, body).unwrap();
    panelet::run(&doc, &dir.join("panels"))
}

#[test]
fn unresolvable_expression_names_panel_and_lists_male_expressions() {
    let err = run_doc(
        "fail_expression",
        "\
```comic Test
left_guy_grimace: Hmm
right_girl_laugh: Ha
```
",
        true,
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("panel 1"), "{msg}");
    assert!(msg.contains("Test"), "{msg}");
    assert!(msg.contains("grimace"), "{msg}");
    // Remediation hint: the male expressions actually on disk.
    assert!(msg.contains("angry, smile"), "{msg}");
}

#[test]
fn empty_sprite_catalogue_is_a_configuration_error() {
    let err = run_doc(
        "fail_empty_catalogue",
        "```comic\nleft_guy_smile: Hi\nright_girl_laugh: Yo\n```\n",
        false,
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("configuration error"), "{msg}");
    assert!(msg.contains("catalogue is empty"), "{msg}");
}

#[test]
fn one_sided_panel_aborts_the_whole_run() {
    let err = run_doc(
        "fail_one_sided",
        "\
```comic
left_guy_smile: Hello?
left_guy_angry: Anyone?
```

```comic
left_guy_smile: Hi
right_girl_laugh: Yo
```
",
        true,
    )
    .unwrap_err();

    assert!(err.to_string().contains("right-side"), "{err}");
}

#[test]
fn document_without_comic_fences_fails() {
    let err = run_doc(
        "fail_no_panels",
        "Just a blog post.\n\n```d2\na -> b\n```\n",
        true,
    )
    .unwrap_err();

    assert!(err.to_string().contains("document error"), "{err}");
}

#[test]
fn webp_catalogue_entry_fails_at_load_with_the_file_named() {
    let dir = fixture_dir("fail_webp_sprite");
    write_sprite_tree(&dir);
    // Catalogued by extension, but the payload is not a PNG.
    std::fs::write(dir.join("output/male/male_wink.webp"), b"RIFF....WEBP").unwrap();
    let doc = dir.join("story.md");
    std::fs::write(
        &doc,
        "```comic\nleft_guy_wink: Hey\nright_girl_laugh: No\n```\n",
    )
    .unwrap();

    let err = panelet::run(&doc, &dir.join("panels")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("male_wink.webp"), "{msg}");
    assert!(msg.contains("not a valid PNG"), "{msg}");
}

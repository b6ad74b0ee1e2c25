#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode a solid-color PNG of the given size.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Fresh per-test scratch directory under `target/`.
pub fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("fixtures").join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Populate the default sprite root (`output/` next to the document) with a
/// small male/female catalogue.
pub fn write_sprite_tree(doc_dir: &Path) {
    let male = doc_dir.join("output").join("male");
    let female = doc_dir.join("output").join("female");
    std::fs::create_dir_all(&male).unwrap();
    std::fs::create_dir_all(&female).unwrap();

    std::fs::write(male.join("male_smile.png"), png_bytes(100, 200, [10, 20, 30, 255])).unwrap();
    std::fs::write(male.join("male_angry.png"), png_bytes(100, 200, [40, 20, 30, 255])).unwrap();
    std::fs::write(
        female.join("female_laugh.png"),
        png_bytes(90, 180, [10, 60, 30, 255]),
    )
    .unwrap();
    std::fs::write(
        female.join("female_angry.png"),
        png_bytes(90, 180, [80, 60, 30, 255]),
    )
    .unwrap();
}

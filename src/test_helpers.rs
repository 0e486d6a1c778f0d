use crate::im::RGBAIm;
use crate::region::Region;
use crate::slicer::SourceImage;

fn color_of(ch: char) -> [u8; 4] {
    match ch {
        'R' => [255, 0, 0, 255],
        'G' => [0, 255, 0, 255],
        'B' => [0, 0, 255, 255],
        'W' => [255, 255, 255, 255],
        'K' => [0, 0, 0, 255],
        '.' => [0, 0, 0, 0],
        _ => panic!("invalid color char '{ch}', expected one of RGBWK."),
    }
}

fn char_of(rgba: [u8; 4]) -> char {
    match rgba {
        [255, 0, 0, 255] => 'R',
        [0, 255, 0, 255] => 'G',
        [0, 0, 255, 255] => 'B',
        [255, 255, 255, 255] => 'W',
        [0, 0, 0, 255] => 'K',
        [_, _, _, 0] => '.',
        _ => '?',
    }
}

pub fn rgba_im_from_ascii(grid: &str) -> RGBAIm {
    let rows: Vec<&str> = grid
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let h = rows.len();
    assert!(h > 0, "grid must have at least one non-empty row");
    let w = rows[0].len();
    assert!(w > 0, "grid rows must be non-empty");
    for r in &rows {
        assert_eq!(r.len(), w, "all rows must have equal length");
    }

    let mut im = RGBAIm::new(w, h);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let base = y * im.s + x * 4;
            im.arr[base..base + 4].copy_from_slice(&color_of(ch));
        }
    }
    im
}

pub fn rgba_im_to_ascii(im: &RGBAIm) -> String {
    let mut out = String::new();
    for y in 0..im.h {
        for x in 0..im.w {
            let px = im.pixel(x, y).unwrap_or([0, 0, 0, 0]);
            out.push(char_of(px));
        }
        out.push('\n');
    }
    out
}

/// A `w`-wide source image made of solid horizontal stripes, top to bottom.
pub fn striped_source(w: usize, stripes: &[(usize, char)]) -> SourceImage {
    let h: usize = stripes.iter().map(|(rows, _)| rows).sum();
    let mut im = RGBAIm::new(w, h);
    let mut y = 0;
    for &(rows, ch) in stripes {
        im.fill_rows(y, y + rows, color_of(ch));
        y += rows;
    }
    SourceImage::new(im)
}

pub fn regions_to_ascii(regions: &[Region]) -> String {
    let mut out = String::new();
    for r in regions {
        out.push_str(&format!("{}..{}\n", r.top, r.bottom));
    }
    out
}

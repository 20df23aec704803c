//! Morphology filters: Erode, Dilate.
//!
//! Both work on the binary notion of foreground (any non-black pixel) and
//! produce a pure black/white image. The neighborhood is a
//! [`StructuringElement`] placed with its anchor on the output pixel.
//!
//! ## Border policy
//!
//! Neighbors that fall outside the image count as **background**. Erosion
//! therefore clears every pixel whose element overhangs the border, while
//! dilation simply ignores the missing neighbors.

use crate::buffer::{PixelBuffer, Rgb8};
use crate::filters::core::offset_index;

/// A small binary neighborhood shape with an anchor cell.
///
/// The anchor must be one of the set cells, which makes erosion shrink and
/// dilation grow the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    anchor: (usize, usize),
    mask: &'static [bool],
}

impl StructuringElement {
    /// 3x3 cross (center plus its 4-neighbors), anchored at the center.
    pub const CROSS_3X3: StructuringElement = StructuringElement::new(
        3,
        3,
        (1, 1),
        &[
            false, true, false, //
            true, true, true, //
            false, true, false,
        ],
    );

    /// Full 3x3 square, anchored at the center.
    pub const SQUARE_3X3: StructuringElement = StructuringElement::new(3, 3, (1, 1), &[true; 9]);

    /// Build an element from a row-major mask.
    ///
    /// Panics (at compile time when used in a `const`) if the mask length
    /// does not match, or the anchor is outside or not set.
    pub const fn new(
        width: usize,
        height: usize,
        anchor: (usize, usize),
        mask: &'static [bool],
    ) -> Self {
        assert!(mask.len() == width * height, "mask length must be width * height");
        assert!(anchor.0 < width && anchor.1 < height, "anchor outside element");
        assert!(mask[anchor.1 * width + anchor.0], "anchor cell must be set");
        Self {
            width,
            height,
            anchor,
            mask,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    /// `(dx, dy)` offsets of the set cells relative to the anchor.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let (ax, ay) = (self.anchor.0 as isize, self.anchor.1 as isize);
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, on)| *on)
            .map(move |(i, _)| {
                let x = (i % self.width) as isize;
                let y = (i / self.width) as isize;
                (x - ax, y - ay)
            })
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::CROSS_3X3
    }
}

/// Erode with the default 3x3 cross.
pub fn erode(input: &PixelBuffer) -> PixelBuffer {
    erode_with(input, &StructuringElement::default())
}

/// Apply erosion.
///
/// The output is white only where every element neighbor lies inside the
/// image and is foreground.
pub fn erode_with(input: &PixelBuffer, element: &StructuringElement) -> PixelBuffer {
    apply(input, element, |input, x, y, offsets| {
        offsets.iter().all(|&(dx, dy)| {
            match (
                offset_index(x, dx, input.width()),
                offset_index(y, dy, input.height()),
            ) {
                (Some(sx), Some(sy)) => input.pixel(sx, sy).is_foreground(),
                _ => false,
            }
        })
    })
}

/// Dilate with the default 3x3 cross.
pub fn dilate(input: &PixelBuffer) -> PixelBuffer {
    dilate_with(input, &StructuringElement::default())
}

/// Apply dilation.
///
/// The output is white where at least one in-range element neighbor is
/// foreground.
pub fn dilate_with(input: &PixelBuffer, element: &StructuringElement) -> PixelBuffer {
    apply(input, element, |input, x, y, offsets| {
        offsets.iter().any(|&(dx, dy)| {
            match (
                offset_index(x, dx, input.width()),
                offset_index(y, dy, input.height()),
            ) {
                (Some(sx), Some(sy)) => input.pixel(sx, sy).is_foreground(),
                _ => false,
            }
        })
    })
}

fn apply<F>(input: &PixelBuffer, element: &StructuringElement, on: F) -> PixelBuffer
where
    F: Fn(&PixelBuffer, usize, usize, &[(isize, isize)]) -> bool,
{
    let offsets: Vec<(isize, isize)> = element.offsets().collect();
    let mut output = input.copy();
    for y in 0..input.height() {
        for x in 0..input.width() {
            let color = if on(input, x, y, &offsets) {
                Rgb8::WHITE
            } else {
                Rgb8::BLACK
            };
            output.put(x, y, color);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreground(buf: &PixelBuffer) -> Vec<(usize, usize)> {
        buf.pixels()
            .filter(|(_, _, c)| c.is_foreground())
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn scatter() -> PixelBuffer {
        PixelBuffer::from_fn(9, 7, |x, y| {
            if (x * 7 + y * 3) % 5 < 3 || ((2..6).contains(&x) && (2..5).contains(&y)) {
                Rgb8::new(200, 10, 10)
            } else {
                Rgb8::BLACK
            }
        })
        .unwrap()
    }

    #[test]
    fn test_cross_offsets() {
        let mut offsets: Vec<_> = StructuringElement::CROSS_3X3.offsets().collect();
        offsets.sort();
        assert_eq!(offsets, vec![(-1, 0), (0, -1), (0, 0), (0, 1), (1, 0)]);
        assert_eq!(StructuringElement::SQUARE_3X3.offsets().count(), 9);
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut img = PixelBuffer::new(5, 5).unwrap();
        img.set(2, 2, Rgb8::WHITE).unwrap();

        let result = dilate(&img);

        let mut fg = foreground(&result);
        fg.sort();
        assert_eq!(fg, vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]);
    }

    #[test]
    fn test_dilate_square_fills_block() {
        let mut img = PixelBuffer::new(5, 5).unwrap();
        img.set(2, 2, Rgb8::WHITE).unwrap();

        let result = dilate_with(&img, &StructuringElement::SQUARE_3X3);

        assert_eq!(foreground(&result).len(), 9);
        assert_eq!(result.get(1, 1).unwrap(), Rgb8::WHITE);
    }

    #[test]
    fn test_erode_removes_isolated_pixel() {
        let mut img = PixelBuffer::new(5, 5).unwrap();
        img.set(2, 2, Rgb8::WHITE).unwrap();

        assert!(foreground(&erode(&img)).is_empty());
    }

    #[test]
    fn test_erode_all_foreground_clears_border_only() {
        let img = PixelBuffer::filled(6, 5, Rgb8::WHITE).unwrap();

        let result = erode(&img);

        for (x, y, c) in result.pixels() {
            let border = x == 0 || y == 0 || x == 5 || y == 4;
            assert_eq!(c == Rgb8::BLACK, border, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_erode_square_clears_corners_of_block() {
        let img = PixelBuffer::from_fn(7, 7, |x, y| {
            if (1..6).contains(&x) && (1..6).contains(&y) {
                Rgb8::WHITE
            } else {
                Rgb8::BLACK
            }
        })
        .unwrap();

        let result = erode_with(&img, &StructuringElement::SQUARE_3X3);

        let mut fg = foreground(&result);
        fg.sort();
        let expected: Vec<_> = (2..5).flat_map(|x| (2..5).map(move |y| (x, y))).collect();
        assert_eq!(fg, expected);
    }

    #[test]
    fn test_dilate_all_background_stays_background() {
        let img = PixelBuffer::new(8, 8).unwrap();
        assert_eq!(dilate(&img), img);
    }

    #[test]
    fn test_monotonicity() {
        let img = scatter();
        let fg: Vec<_> = foreground(&img);
        for element in [StructuringElement::CROSS_3X3, StructuringElement::SQUARE_3X3] {
            let eroded = foreground(&erode_with(&img, &element));
            let dilated = foreground(&dilate_with(&img, &element));
            assert!(eroded.iter().all(|p| fg.contains(p)));
            assert!(fg.iter().all(|p| dilated.contains(p)));
        }
    }

    #[test]
    fn test_input_not_modified() {
        let img = scatter();
        let before = img.copy();
        let _ = erode(&img);
        let _ = dilate(&img);
        assert_eq!(img, before);
    }

    #[test]
    fn test_off_center_anchor() {
        // Horizontal pair anchored on its left cell: looks one pixel right.
        const PAIR: StructuringElement = StructuringElement::new(2, 1, (0, 0), &[true, true]);
        let mut img = PixelBuffer::new(4, 1).unwrap();
        img.set(2, 0, Rgb8::WHITE).unwrap();

        let result = dilate_with(&img, &PAIR);

        assert_eq!(foreground(&result), vec![(1, 0), (2, 0)]);
    }
}

//! Connected-component counting using flood fill.
//!
//! Foreground is any non-black pixel. Components are grown breadth-first
//! over a transient label map that lives only for the duration of the call.
//! The default adjacency is 4-connectivity, so two pixels that touch only
//! diagonally are separate components.

use std::collections::VecDeque;

use crate::buffer::PixelBuffer;

const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Adjacency rule for connected components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Edge-sharing neighbors only.
    #[default]
    Four,
    /// Edge- and corner-sharing neighbors.
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &NEIGHBORS_4,
            Connectivity::Eight => &NEIGHBORS_8,
        }
    }
}

/// Count 4-connected foreground components.
pub fn count_components(image: &PixelBuffer) -> usize {
    count_components_with(image, Connectivity::default())
}

/// Count foreground components under the given connectivity.
pub fn count_components_with(image: &PixelBuffer, connectivity: Connectivity) -> usize {
    let (width, height) = image.dimensions();
    let offsets = connectivity.offsets();

    // 0 = unlabeled
    let mut labels = vec![0u32; width * height];
    let mut queue = VecDeque::new();
    let mut count = 0u32;

    for start_y in 0..height {
        for start_x in 0..width {
            if labels[start_y * width + start_x] != 0
                || !image.pixel(start_x, start_y).is_foreground()
            {
                continue;
            }

            count += 1;
            labels[start_y * width + start_x] = count;
            queue.push_back((start_x, start_y));

            while let Some((x, y)) = queue.pop_front() {
                for &(dx, dy) in offsets {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let nidx = ny * width + nx;
                    if labels[nidx] == 0 && image.pixel(nx, ny).is_foreground() {
                        labels[nidx] = count;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
    }

    tracing::trace!(count, ?connectivity, "components labeled");
    count as usize
}

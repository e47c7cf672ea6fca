//! Modified median cut color quantization
//!
//! Pixels are binned into a 3-D histogram with [`SIGNIFICANT_BITS`] per
//! channel. Each cell keeps its pixel count and the sum of the real channel
//! values, so every output color is the mean of pixels that exist in the
//! image rather than a cell center.
//!
//! Boxes are always shrunk to the occupied cells they contain. Splitting
//! happens on the longest axis at the population median; the box to split is
//! picked by population first, then by population x volume, which lets
//! sparse but colorful regions surface once the dominant ones are covered.

use crate::constants::extraction::{POPULATION_SPLIT_FRACTION, SIGNIFICANT_BITS};

use super::Rgb;

const SIDE: usize = 1 << SIGNIFICANT_BITS;
const SHIFT: u32 = 8 - SIGNIFICANT_BITS;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    count: u64,
    sum: [u64; 3],
}

/// 3-D color histogram over the quantized cube
pub(crate) struct Histogram {
    cells: Vec<Cell>,
    total: u64,
}

impl Histogram {
    pub(crate) fn new() -> Self {
        Self {
            cells: vec![Cell::default(); SIDE * SIDE * SIDE],
            total: 0,
        }
    }

    fn index(coords: [usize; 3]) -> usize {
        (coords[0] * SIDE + coords[1]) * SIDE + coords[2]
    }

    pub(crate) fn add(&mut self, rgb: Rgb) {
        let coords = rgb.map(|c| usize::from(c >> SHIFT));
        let cell = &mut self.cells[Self::index(coords)];
        cell.count += 1;
        for (sum, &c) in cell.sum.iter_mut().zip(rgb.iter()) {
            *sum += u64::from(c);
        }
        self.total += 1;
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Number of non-empty cells
    pub(crate) fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.count > 0).count()
    }

    /// Tight box around the occupied cells within `lo..=hi`
    fn shrink(&self, lo: [usize; 3], hi: [usize; 3]) -> Option<ColorBox> {
        let mut min = [usize::MAX; 3];
        let mut max = [0usize; 3];
        let mut count = 0u64;
        let mut sum = [0u64; 3];

        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    let cell = &self.cells[Self::index([r, g, b])];
                    if cell.count == 0 {
                        continue;
                    }
                    for (axis, v) in [r, g, b].into_iter().enumerate() {
                        min[axis] = min[axis].min(v);
                        max[axis] = max[axis].max(v);
                        sum[axis] += cell.sum[axis];
                    }
                    count += cell.count;
                }
            }
        }

        (count > 0).then_some(ColorBox {
            lo: min,
            hi: max,
            count,
            sum,
        })
    }

    /// Population of the slice `axis == value` inside a box
    fn slice_count(&self, bx: &ColorBox, axis: usize, value: usize) -> u64 {
        let mut lo = bx.lo;
        let mut hi = bx.hi;
        lo[axis] = value;
        hi[axis] = value;

        let mut count = 0;
        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    count += self.cells[Self::index([r, g, b])].count;
                }
            }
        }
        count
    }

    /// Split a box at the population median of its longest axis
    fn split(&self, bx: &ColorBox) -> Option<(ColorBox, ColorBox)> {
        let axis = (0..3).max_by_key(|&a| (bx.hi[a] - bx.lo[a], std::cmp::Reverse(a)))?;
        if bx.hi[axis] == bx.lo[axis] {
            return None;
        }

        let mut cumulative = 0u64;
        let mut cut = bx.hi[axis] - 1;
        for value in bx.lo[axis]..=bx.hi[axis] {
            cumulative += self.slice_count(bx, axis, value);
            if cumulative * 2 >= bx.count {
                cut = value.min(bx.hi[axis] - 1);
                break;
            }
        }

        let mut lower_hi = bx.hi;
        lower_hi[axis] = cut;
        let mut upper_lo = bx.lo;
        upper_lo[axis] = cut + 1;

        // Both halves keep an occupied end slice of a tight box
        let lower = self.shrink(bx.lo, lower_hi)?;
        let upper = self.shrink(upper_lo, bx.hi)?;
        Some((lower, upper))
    }
}

/// Occupied region of the histogram cube, bounds inclusive
#[derive(Debug, Clone, Copy)]
struct ColorBox {
    lo: [usize; 3],
    hi: [usize; 3],
    count: u64,
    sum: [u64; 3],
}

impl ColorBox {
    fn volume(&self) -> u64 {
        (0..3).map(|a| (self.hi[a] - self.lo[a] + 1) as u64).product()
    }

    fn can_split(&self) -> bool {
        self.volume() > 1
    }

    fn average(&self) -> Rgb {
        self.sum
            .map(|s| ((s as f64) / (self.count as f64)).round().clamp(0.0, 255.0) as u8)
    }
}

/// Repeatedly split the highest-priority box until `target` boxes exist
/// or nothing can be split
fn split_until<F>(hist: &Histogram, boxes: &mut Vec<ColorBox>, target: usize, priority: F)
where
    F: Fn(&ColorBox) -> u64,
{
    while boxes.len() < target {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            // First box wins ties
            .fold(None::<(usize, u64)>, |best, (i, b)| {
                let p = priority(b);
                match best {
                    Some((_, bp)) if bp >= p => best,
                    _ => Some((i, p)),
                }
            });

        let Some((index, _)) = candidate else {
            break;
        };
        let bx = boxes.remove(index);
        match hist.split(&bx) {
            Some((lower, upper)) => {
                boxes.push(lower);
                boxes.push(upper);
            }
            None => {
                // Unsplittable in practice; keep it and stop
                boxes.push(bx);
                break;
            }
        }
    }
}

/// Quantize a histogram into at most `max_colors` colors
///
/// Colors are ordered by population, most common first; equal populations
/// are ordered by RGB value so output is deterministic.
pub(crate) fn quantize(hist: &Histogram, max_colors: usize) -> Vec<Rgb> {
    if max_colors == 0 {
        return Vec::new();
    }
    let Some(initial) = hist.shrink([0; 3], [SIDE - 1; 3]) else {
        return Vec::new();
    };

    let mut boxes = vec![initial];
    let population_target =
        ((POPULATION_SPLIT_FRACTION * max_colors as f64).ceil() as usize).clamp(1, max_colors);
    split_until(hist, &mut boxes, population_target, |b| b.count);
    split_until(hist, &mut boxes, max_colors, |b| b.count * b.volume());

    let mut colors: Vec<(Rgb, u64)> = Vec::with_capacity(boxes.len());
    for bx in &boxes {
        let avg = bx.average();
        match colors.iter_mut().find(|(rgb, _)| *rgb == avg) {
            Some((_, count)) => *count += bx.count,
            None => colors.push((avg, bx.count)),
        }
    }

    colors.sort_by(|(a_rgb, a_count), (b_rgb, b_count)| {
        b_count.cmp(a_count).then_with(|| a_rgb.cmp(b_rgb))
    });
    colors.into_iter().map(|(rgb, _)| rgb).take(max_colors).collect()
}

/// Histogram from an iterator of RGB samples
pub(crate) fn histogram<I>(samples: I) -> Histogram
where
    I: IntoIterator<Item = Rgb>,
{
    let mut hist = Histogram::new();
    for rgb in samples {
        hist.add(rgb);
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat(rgb: Rgb, n: usize) -> impl Iterator<Item = Rgb> {
        std::iter::repeat(rgb).take(n)
    }

    #[test]
    fn test_empty_histogram_yields_nothing() {
        let hist = Histogram::new();
        assert!(quantize(&hist, 8).is_empty());
    }

    #[test]
    fn test_single_color_is_exact() {
        let hist = histogram(repeat([255, 0, 0], 100));
        assert_eq!(hist.occupied(), 1);
        assert_eq!(quantize(&hist, 8), vec![[255, 0, 0]]);
    }

    #[test]
    fn test_two_colors_ordered_by_population() {
        let hist = histogram(repeat([0, 0, 255], 30).chain(repeat([250, 10, 10], 70)));
        assert_eq!(quantize(&hist, 8), vec![[250, 10, 10], [0, 0, 255]]);
    }

    #[test]
    fn test_equal_population_ties_break_by_rgb() {
        let hist = histogram(repeat([255, 0, 0], 50).chain(repeat([0, 0, 255], 50)));
        assert_eq!(quantize(&hist, 8), vec![[0, 0, 255], [255, 0, 0]]);
    }

    #[test]
    fn test_never_exceeds_requested_count() {
        let samples = (0..=255u8).flat_map(|r| (0..=255u8).step_by(17).map(move |g| [r, g, 128]));
        let hist = histogram(samples);
        for k in [1, 2, 5, 8, 16] {
            let palette = quantize(&hist, k);
            assert!(!palette.is_empty());
            assert!(palette.len() <= k);
        }
    }

    #[test]
    fn test_does_not_fabricate_colors() {
        let hist = histogram(
            repeat([10, 10, 10], 5)
                .chain(repeat([200, 30, 30], 5))
                .chain(repeat([30, 200, 30], 5)),
        );
        let palette = quantize(&hist, 8);
        assert_eq!(palette.len(), 3);
        for rgb in [[10, 10, 10], [200, 30, 30], [30, 200, 30]] {
            assert!(palette.contains(&rgb));
        }
    }

    #[test]
    fn test_average_is_mean_of_real_pixels() {
        // Same histogram cell, different real values
        let hist = histogram(repeat([248, 0, 0], 1).chain(repeat([252, 0, 0], 1)));
        assert_eq!(quantize(&hist, 1), vec![[250, 0, 0]]);
    }

    #[test]
    fn test_sparse_outlier_does_not_shift_dominant_color() {
        let hist = histogram(repeat([20, 120, 220], 990).chain(repeat([255, 255, 0], 10)));
        let palette = quantize(&hist, 2);
        assert_eq!(palette[0], [20, 120, 220]);
    }

    #[test]
    fn test_is_deterministic() {
        let samples: Vec<Rgb> = (0..5000u32)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8])
            .collect();
        let a = quantize(&histogram(samples.clone()), 8);
        let b = quantize(&histogram(samples), 8);
        assert_eq!(a, b);
    }
}

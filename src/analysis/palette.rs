use crate::models::visual::ColorSwatch;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct PaletteOptions {
    pub clusters: usize,
    pub restarts: usize,
    pub seed: u64,
    pub max_iterations: usize,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            clusters: 5,
            restarts: 10,
            seed: 42,
            max_iterations: 300,
        }
    }
}

/// Resize to a square canonical resolution so clustering cost is bounded.
/// An empty capture stays empty instead of being stretched into a canvas.
pub fn canonicalize(image: &DynamicImage, size: u32) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return RgbImage::new(0, 0);
    }
    image.resize_exact(size, size, FilterType::Triangle).to_rgb8()
}

/// Cluster pixel colours into at most `options.clusters` groups and return
/// one swatch per populated cluster, largest share first.
///
/// Pixels are first collapsed into a colour histogram, so k-means runs over
/// distinct colours weighted by pixel count. Initialisation is k-means++
/// from a seeded RNG; the restart with the lowest inertia wins.
pub fn extract_palette(pixels: &RgbImage, options: &PaletteOptions) -> Vec<ColorSwatch> {
    let histogram = colour_histogram(pixels);
    if histogram.is_empty() || options.clusters == 0 {
        return Vec::new();
    }

    let points: Vec<[f64; 3]> = histogram
        .keys()
        .map(|c| [c[0] as f64, c[1] as f64, c[2] as f64])
        .collect();
    let weights: Vec<f64> = histogram.values().map(|&n| n as f64).collect();
    let k = options.clusters.min(points.len());

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut best: Option<Clustering> = None;
    for _ in 0..options.restarts.max(1) {
        let run = lloyd(&points, &weights, k, options.max_iterations, &mut rng);
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }
    let Some(best) = best else {
        return Vec::new();
    };

    let total: f64 = weights.iter().sum();
    let mut population = vec![0.0f64; k];
    for (label, weight) in best.labels.iter().zip(&weights) {
        population[*label] += weight;
    }

    let mut swatches: Vec<ColorSwatch> = best
        .centers
        .iter()
        .zip(&population)
        .filter(|(_, &count)| count > 0.0)
        .map(|(center, &count)| {
            // Centroids truncate toward zero like an integer cast of the mean.
            let rgb = [
                center[0].clamp(0.0, 255.0) as u8,
                center[1].clamp(0.0, 255.0) as u8,
                center[2].clamp(0.0, 255.0) as u8,
            ];
            ColorSwatch {
                hex: to_hex(rgb),
                rgb,
                proportion: count / total,
            }
        })
        .collect();

    swatches.sort_by(|a, b| {
        b.proportion
            .partial_cmp(&a.proportion)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    swatches
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

struct Clustering {
    centers: Vec<[f64; 3]>,
    labels: Vec<usize>,
    inertia: f64,
}

fn colour_histogram(pixels: &RgbImage) -> BTreeMap<[u8; 3], usize> {
    let mut histogram = BTreeMap::new();
    for pixel in pixels.pixels() {
        *histogram.entry(pixel.0).or_insert(0usize) += 1;
    }
    histogram
}

fn lloyd(
    points: &[[f64; 3]],
    weights: &[f64],
    k: usize,
    max_iterations: usize,
    rng: &mut StdRng,
) -> Clustering {
    let mut centers = seed_centers(points, weights, k, rng);
    let mut labels = vec![0usize; points.len()];

    for _ in 0..max_iterations.max(1) {
        for (label, point) in labels.iter_mut().zip(points) {
            *label = nearest(&centers, point).0;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut mass = vec![0.0f64; k];
        for ((label, point), weight) in labels.iter().zip(points).zip(weights) {
            for channel in 0..3 {
                sums[*label][channel] += point[channel] * weight;
            }
            mass[*label] += weight;
        }

        let mut shift = 0.0f64;
        for cluster in 0..k {
            // Empty clusters keep their previous centre.
            if mass[cluster] <= 0.0 {
                continue;
            }
            let updated = [
                sums[cluster][0] / mass[cluster],
                sums[cluster][1] / mass[cluster],
                sums[cluster][2] / mass[cluster],
            ];
            shift = shift.max(distance_sq(&updated, &centers[cluster]));
            centers[cluster] = updated;
        }

        if shift < 1e-4 {
            break;
        }
    }

    let mut inertia = 0.0;
    for ((label, point), weight) in labels.iter_mut().zip(points).zip(weights) {
        let (index, dist) = nearest(&centers, point);
        *label = index;
        inertia += dist * weight;
    }

    Clustering {
        centers,
        labels,
        inertia,
    }
}

/// k-means++ seeding: each further centre is drawn with probability
/// proportional to weight × squared distance to the nearest chosen centre.
fn seed_centers(points: &[[f64; 3]], weights: &[f64], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[pick_weighted(weights, rng)]);

    let mut closest: Vec<f64> = points.iter().map(|p| distance_sq(p, &centers[0])).collect();
    while centers.len() < k {
        let scores: Vec<f64> = closest.iter().zip(weights).map(|(d, w)| d * w).collect();
        let index = if scores.iter().sum::<f64>() > 0.0 {
            pick_weighted(&scores, rng)
        } else {
            pick_weighted(weights, rng)
        };
        let center = points[index];
        for (slot, point) in closest.iter_mut().zip(points) {
            *slot = slot.min(distance_sq(point, &center));
        }
        centers.push(center);
    }
    centers
}

fn pick_weighted(weights: &[f64], rng: &mut StdRng) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.len());
    }
    let mut target = rng.gen::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        if target < *weight {
            return index;
        }
        target -= weight;
    }
    weights.len() - 1
}

fn nearest(centers: &[[f64; 3]], point: &[f64; 3]) -> (usize, f64) {
    let mut best = (0usize, f64::MAX);
    for (index, center) in centers.iter().enumerate() {
        let dist = distance_sq(point, center);
        if dist < best.1 {
            best = (index, dist);
        }
    }
    best
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

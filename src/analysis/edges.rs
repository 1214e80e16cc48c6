use image::GrayImage;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            high: 100.0,
        }
    }
}

/// Structural-complexity proxy: number of outermost 8-connected edge
/// contours in a Canny-style edge map. This is not a literal element count.
pub fn count_visual_elements(gray: &GrayImage, thresholds: EdgeThresholds) -> usize {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    if w == 0 || h == 0 {
        return 0;
    }
    let edges = edge_map(gray, thresholds);
    count_outer_contours(&edges, w, h)
}

/// Sobel gradients, non-maximum suppression along the gradient direction,
/// then hysteresis: weak edges survive only when connected to a strong one.
pub fn edge_map(gray: &GrayImage, thresholds: EdgeThresholds) -> Vec<bool> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let mut edges = vec![false; w * h];
    if w < 3 || h < 3 {
        return edges;
    }

    let at = |x: usize, y: usize| gray.get_pixel(x as u32, y as u32).0[0] as f32;
    let mut gx = vec![0.0f32; w * h];
    let mut gy = vec![0.0f32; w * h];
    let mut magnitude = vec![0.0f32; w * h];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let dx = (at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x - 1, y) + at(x - 1, y + 1));
            let dy = (at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2.0 * at(x, y - 1) + at(x + 1, y - 1));
            let i = y * w + x;
            gx[i] = dx;
            gy[i] = dy;
            magnitude[i] = dx.abs() + dy.abs();
        }
    }

    // tan(22.5°) and tan(67.5°)
    const TAN_LOW: f32 = 0.414_213_56;
    const TAN_HIGH: f32 = 2.414_213_6;

    let mut strong = Vec::new();
    let mut candidate = vec![false; w * h];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let m = magnitude[i];
            if m <= thresholds.low {
                continue;
            }
            let (ax, ay) = (gx[i].abs(), gy[i].abs());
            let (a, b) = if ay <= ax * TAN_LOW {
                (i - 1, i + 1)
            } else if ay >= ax * TAN_HIGH {
                (i - w, i + w)
            } else if (gx[i] > 0.0) == (gy[i] > 0.0) {
                (i - w - 1, i + w + 1)
            } else {
                (i - w + 1, i + w - 1)
            };
            if m < magnitude[a] || m < magnitude[b] {
                continue;
            }
            candidate[i] = true;
            if m > thresholds.high {
                strong.push(i);
            }
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for i in strong {
        if !edges[i] {
            edges[i] = true;
            queue.push_back(i);
        }
    }
    while let Some(i) = queue.pop_front() {
        for n in neighbours(i, w, h) {
            if candidate[n] && !edges[n] {
                edges[n] = true;
                queue.push_back(n);
            }
        }
    }
    edges
}

/// Counts only outermost contours. The background reachable from the image
/// border is flooded first (4-connected, the dual of 8-connected edges); an
/// edge component that never touches it sits inside another outline.
fn count_outer_contours(edges: &[bool], w: usize, h: usize) -> usize {
    let outside = outer_background(edges, w, h);
    let mut seen = vec![false; edges.len()];
    let mut count = 0;
    let mut queue = VecDeque::new();
    for start in 0..edges.len() {
        if !edges[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut external = false;
        while let Some(i) = queue.pop_front() {
            let (x, y) = (i % w, i / w);
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                external = true;
            }
            for n in neighbours(i, w, h) {
                if edges[n] {
                    if !seen[n] {
                        seen[n] = true;
                        queue.push_back(n);
                    }
                } else if outside[n] {
                    external = true;
                }
            }
        }
        if external {
            count += 1;
        }
    }
    count
}

fn outer_background(edges: &[bool], w: usize, h: usize) -> Vec<bool> {
    let mut outside = vec![false; edges.len()];
    let mut queue = VecDeque::new();
    let border = (0..w)
        .flat_map(|x| [x, (h - 1) * w + x])
        .chain((0..h).flat_map(|y| [y * w, y * w + w - 1]));
    for i in border {
        if !edges[i] && !outside[i] {
            outside[i] = true;
            queue.push_back(i);
        }
    }
    while let Some(i) = queue.pop_front() {
        let (x, y) = (i % w, i / w);
        let mut step = |n: usize| {
            if !edges[n] && !outside[n] {
                outside[n] = true;
                queue.push_back(n);
            }
        };
        if x > 0 {
            step(i - 1);
        }
        if x + 1 < w {
            step(i + 1);
        }
        if y > 0 {
            step(i - w);
        }
        if y + 1 < h {
            step(i + w);
        }
    }
    outside
}

fn neighbours(i: usize, w: usize, h: usize) -> impl Iterator<Item = usize> {
    let (x, y) = ((i % w) as isize, (i / w) as isize);
    (-1isize..=1)
        .flat_map(move |dy| (-1isize..=1).map(move |dx| (x + dx, y + dy)))
        .filter(move |&(nx, ny)| {
            (nx, ny) != (x, y) && nx >= 0 && ny >= 0 && (nx as usize) < w && (ny as usize) < h
        })
        .map(move |(nx, ny)| ny as usize * w + nx as usize)
}

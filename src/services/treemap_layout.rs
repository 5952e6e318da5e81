use crate::models::Rect;

/// Squarified treemap layout.
///
/// Returns one rectangle per weight, in input order, tiling `bounds` with areas
/// proportional to the weights. Weights must be strictly positive; pass them
/// sorted descending for the best aspect ratios.
pub fn squarify(weights: &[f64], bounds: Rect) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 || bounds.area() <= 0.0 {
        return Vec::new();
    }

    let scale = bounds.area() / total;
    let areas: Vec<f64> = weights.iter().map(|w| w * scale).collect();

    let mut rects = Vec::with_capacity(areas.len());
    let mut remaining = bounds;
    let mut start = 0;

    while start < areas.len() {
        let side = remaining.width.min(remaining.height);

        // Grow the row while the worst aspect ratio keeps improving
        let mut end = start + 1;
        while end < areas.len() && worst_ratio(&areas[start..=end], side) <= worst_ratio(&areas[start..end], side) {
            end += 1;
        }

        remaining = lay_row(&areas[start..end], remaining, &mut rects);
        start = end;
    }

    rects
}

/// Worst aspect ratio of a row of areas laid along a side of length `side`
fn worst_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = row.iter().cloned().fold(f64::INFINITY, f64::min);
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

/// Place a row along the shorter side of `area` and return what is left
fn lay_row(row: &[f64], area: Rect, rects: &mut Vec<Rect>) -> Rect {
    let sum: f64 = row.iter().sum();

    if area.width >= area.height {
        // Column on the left edge
        let width = if area.height > 0.0 { (sum / area.height).min(area.width) } else { 0.0 };
        let mut y = area.y;
        for &a in row {
            let height = if width > 0.0 { a / width } else { 0.0 };
            rects.push(Rect { x: area.x, y, width, height });
            y += height;
        }
        Rect {
            x: area.x + width,
            y: area.y,
            width: (area.width - width).max(0.0),
            height: area.height,
        }
    } else {
        // Row along the top edge
        let height = if area.width > 0.0 { (sum / area.width).min(area.height) } else { 0.0 };
        let mut x = area.x;
        for &a in row {
            let width = if height > 0.0 { a / height } else { 0.0 };
            rects.push(Rect { x, y: area.y, width, height });
            x += width;
        }
        Rect {
            x: area.x,
            y: area.y + height,
            width: area.width,
            height: (area.height - height).max(0.0),
        }
    }
}

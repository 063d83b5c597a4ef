use super::vector2::*;

pub type Polygon = Vec<Vector2<f64>>;

/// Clips a convex polygon against the half-plane `{p : dot(n, p) <= c}`
/// (Sutherland-Hodgman, one edge).
pub fn clip_half_plane(polygon: &[Vector2<f64>], n: &Vector2<f64>, c: f64) -> Polygon {
    let mut result = Vec::with_capacity(polygon.len() + 1);
    let count = polygon.len();
    for i in 0..count {
        let a = polygon[i];
        let b = polygon[(i + 1) % count];
        let da = n.dot(&a) - c;
        let db = n.dot(&b) - c;
        if da <= 0.0 {
            result.push(a);
        }
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let t = da / (da - db);
            result.push(Vector2::<f64>::lerp(t, &a, &b));
        }
    }
    return result;
}

/// Integer pixels covered by the segment from `a` to `b` (Bresenham).
pub fn rasterize_segment(a: &Vector2<i32>, b: &Vector2<i32>) -> Vec<Vector2<i32>> {
    let mut pixels = Vec::new();
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = *a;
    loop {
        pixels.push(p);
        if p == *b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
    return pixels;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let square = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(10.0, 10.0),
            Vector2::new(0.0, 10.0),
        ];
        // keep x <= 4
        let clipped = clip_half_plane(&square, &Vector2::new(1.0, 0.0), 4.0);
        assert_eq!(clipped.len(), 4);
        for p in clipped.iter() {
            assert!(p.x <= 4.0 + 1e-12);
        }
    }

    #[test]
    fn test_002() {
        let pixels = rasterize_segment(&Vector2::new(0, 0), &Vector2::new(5, 2));
        assert_eq!(pixels.first(), Some(&Vector2::new(0, 0)));
        assert_eq!(pixels.last(), Some(&Vector2::new(5, 2)));
        assert_eq!(pixels.len(), 6);
    }
}

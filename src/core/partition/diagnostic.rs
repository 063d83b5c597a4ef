use super::spatial_partition::*;
use crate::core::base::*;

const OUTLINE_COLOR: [u8; 3] = [0, 0, 255];
const SITE_COLOR: [u8; 3] = [255, 0, 0];
const SITE_RADIUS: i32 = 4;

fn put_pixel(bytes: &mut [u8], width: u32, height: u32, p: &Point2i, color: &[u8; 3]) {
    if p.x < 0 || p.y < 0 || p.x >= width as i32 || p.y >= height as i32 {
        return;
    }
    let index = 3 * (p.y as usize * width as usize + p.x as usize);
    bytes[index..index + 3].copy_from_slice(color);
}

/// Renders the partition as packed 8-bit RGB: each cell filled with the color
/// of its condition's weight, scaled by the number of conditions so that an
/// even split of the energy gives full intensity. Cell outlines are drawn in
/// blue and light sites as red dots.
pub fn render_partition(partition: &SpatialPartition, weights: &[RGBWeight]) -> Vec<u8> {
    let width = partition.width();
    let height = partition.height();
    let mut bytes = vec![0u8; 3 * (width as usize) * (height as usize)];

    let mut normalized = weights.to_vec();
    normalize_weights_rgb(&mut normalized);
    let scale = 255.0 * normalized.len() as f64;
    let colors: Vec<[u8; 3]> = normalized
        .iter()
        .map(|w| {
            let f = |v: f64| f64::clamp(f64::floor(scale * v), 0.0, 255.0) as u8;
            [f(w[0]), f(w[1]), f(w[2])]
        })
        .collect();

    let table = partition
        .condition_mapping()
        .cell_to_condition(partition.number_of_cells());
    for y in 0..height {
        for x in 0..width {
            let condition = partition.cell_at(x, y).and_then(|cell| table[cell]);
            if let Some(color) = condition.and_then(|k| colors.get(k)) {
                put_pixel(&mut bytes, width, height, &Point2i::new(x as i32, y as i32), color);
            }
        }
    }

    for polygon in partition.cell_polygons().iter() {
        let corners: Vec<Point2i> = polygon
            .iter()
            .map(|p| Point2i::new(p.x.round() as i32, p.y.round() as i32))
            .collect();
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            for p in rasterize_segment(&a, &b) {
                put_pixel(&mut bytes, width, height, &p, &OUTLINE_COLOR);
            }
        }
    }

    for site in partition.cell_centers().iter() {
        for dy in -SITE_RADIUS..=SITE_RADIUS {
            for dx in -SITE_RADIUS..=SITE_RADIUS {
                if dx * dx + dy * dy <= SITE_RADIUS * SITE_RADIUS {
                    let p = Point2i::new(site.x + dx, site.y + dy);
                    put_pixel(&mut bytes, width, height, &p, &SITE_COLOR);
                }
            }
        }
    }
    return bytes;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut partition = SpatialPartition::new(40, 20);
        partition.insert_condition_groups(&[vec![Point2i::new(5, 10)], vec![Point2i::new(35, 10)]]);
        let bytes = render_partition(&partition, &[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        assert_eq!(bytes.len(), 3 * 40 * 20);
        // away from outlines and sites, left cell is fully red, right cell black
        let left = 3 * (2 * 40 + 12);
        assert_eq!(&bytes[left..left + 3], &[255, 0, 0]);
        let right = 3 * (2 * 40 + 30);
        assert_eq!(&bytes[right..right + 3], &[0, 0, 0]);
    }
}

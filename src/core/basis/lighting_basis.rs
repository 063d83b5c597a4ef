use crate::core::base::*;

use log::debug;

/// A rectangular light source given by two opposite corners, in the order
/// they were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaLight {
    pub start: Point2i,
    pub end: Point2i,
}

impl AreaLight {
    pub fn new(start: &Point2i, end: &Point2i) -> Self {
        AreaLight {
            start: *start,
            end: *end,
        }
    }

    pub fn bounds(&self) -> Bounds2i {
        return Bounds2i::from_corners(&self.start, &self.end);
    }

    pub fn centroid(&self) -> Point2i {
        return Point2i::midpoint(&self.start, &self.end);
    }
}

/// Ordered set of light positions on a `width x height` map. The index of a
/// point light is its identity and never changes once assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingBasis {
    width: u32,
    height: u32,
    point_lights: Vec<Point2i>,
    area_lights: Vec<AreaLight>,
    area_lights_sampled: bool,
}

impl LightingBasis {
    pub fn new(width: u32, height: u32) -> Self {
        LightingBasis {
            width,
            height,
            point_lights: Vec::new(),
            area_lights: Vec::new(),
            area_lights_sampled: false,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        return self.width;
    }

    #[inline]
    pub fn height(&self) -> u32 {
        return self.height;
    }

    /// Changes the extent used for bounds checks. Existing lights are kept.
    pub fn set_domain_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn domain(&self) -> Bounds2i {
        return Bounds2i::new(
            &Point2i::new(0, 0),
            &Point2i::new(self.width as i32, self.height as i32),
        );
    }

    /// Appends a point light and returns its index, or `None` when the
    /// position lies outside the map.
    pub fn add_point_light(&mut self, position: &Point2i) -> Option<usize> {
        if !self.domain().inside_exclusive(position) {
            debug!(
                "Rejected point light ({}, {}) outside {}x{}",
                position.x, position.y, self.width, self.height
            );
            return None;
        }
        self.point_lights.push(*position);
        return Some(self.point_lights.len() - 1);
    }

    /// Appends every in-bounds position and returns the indices assigned.
    pub fn add_point_lights(&mut self, positions: &[Point2i]) -> Vec<usize> {
        return positions
            .iter()
            .filter_map(|p| self.add_point_light(p))
            .collect();
    }

    /// Stores the rectangle and registers its centroid as a point light.
    pub fn add_area_light(&mut self, start: &Point2i, end: &Point2i) -> Option<usize> {
        let light = AreaLight::new(start, end);
        self.area_lights.push(light);
        return self.add_point_light(&light.centroid());
    }

    pub fn add_area_lights(&mut self, lights: &[AreaLight]) -> Vec<usize> {
        return lights
            .iter()
            .filter_map(|l| self.add_area_light(&l.start, &l.end))
            .collect();
    }

    /// Expands every area light into a regular grid of point lights about
    /// `spacing` pixels apart. Rectangles narrower than `spacing` in either
    /// direction contribute their centroid only. Returns the indices added.
    pub fn sample_area_lights(&mut self, spacing: i32) -> Vec<usize> {
        let mut added = Vec::new();
        let lights = self.area_lights.clone();
        for (i, light) in lights.iter().enumerate() {
            for p in Self::area_light_samples(light, spacing) {
                if let Some(index) = self.add_point_light(&p) {
                    added.push(index);
                }
            }
            debug!("Sampled area light {}", i);
        }
        self.area_lights_sampled = true;
        return added;
    }

    fn area_light_samples(light: &AreaLight, spacing: i32) -> Vec<Point2i> {
        let bounds = light.bounds();
        let extent = bounds.diagonal();
        if extent.x < spacing || extent.y < spacing {
            return vec![bounds.centroid()];
        }
        let nx = extent.x / spacing;
        let ny = extent.y / spacing;
        let step = Vector2i::new(extent.x / nx, extent.y / ny);
        let mut samples = Vec::with_capacity((nx * ny) as usize);
        for k in 0..ny {
            for l in 0..nx {
                samples.push(Point2i::new(
                    bounds.min.x + step.x / 2 + l * step.x,
                    bounds.min.y + step.y / 2 + k * step.y,
                ));
            }
        }
        return samples;
    }

    /// Replaces all point lights. Out-of-bounds positions are dropped.
    pub fn set_point_lights(&mut self, positions: &[Point2i]) -> Vec<usize> {
        self.point_lights.clear();
        return self.add_point_lights(positions);
    }

    pub fn clear(&mut self) {
        self.point_lights.clear();
        self.area_lights.clear();
        self.area_lights_sampled = false;
    }

    #[inline]
    pub fn point_lights(&self) -> &[Point2i] {
        return &self.point_lights;
    }

    #[inline]
    pub fn point_light(&self, index: usize) -> Option<&Point2i> {
        return self.point_lights.get(index);
    }

    #[inline]
    pub fn area_lights(&self) -> &[AreaLight] {
        return &self.area_lights;
    }

    #[inline]
    pub fn number_of_point_lights(&self) -> usize {
        return self.point_lights.len();
    }

    #[inline]
    pub fn number_of_area_lights(&self) -> usize {
        return self.area_lights.len();
    }

    #[inline]
    pub fn are_area_lights_sampled(&self) -> bool {
        return self.area_lights_sampled;
    }

    pub fn is_empty(&self) -> bool {
        return self.point_lights.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let mut basis = LightingBasis::new(1024, 512);
        assert_eq!(basis.add_point_light(&Point2i::new(10, 10)), Some(0));
        assert_eq!(basis.add_point_light(&Point2i::new(1024, 10)), None);
        assert_eq!(basis.add_point_light(&Point2i::new(10, -1)), None);
        assert_eq!(basis.add_point_light(&Point2i::new(1023, 511)), Some(1));
        assert_eq!(basis.number_of_point_lights(), 2);
    }

    #[test]
    fn test_002() {
        let mut basis = LightingBasis::new(1024, 512);
        let index = basis.add_area_light(&Point2i::new(300, 160), &Point2i::new(100, 10));
        assert_eq!(index, Some(0));
        assert_eq!(basis.point_lights()[0], Point2i::new(200, 85));
        assert_eq!(basis.number_of_area_lights(), 1);

        let added = basis.sample_area_lights(AREA_LIGHT_SAMPLE_SPACING);
        assert_eq!(added.len(), 48);
        assert_eq!(basis.number_of_point_lights(), 49);
        assert!(basis.are_area_lights_sampled());
        // step is 25 in both directions
        assert_eq!(basis.point_lights()[1], Point2i::new(112, 22));
        assert_eq!(basis.point_lights()[48], Point2i::new(287, 147));
    }

    #[test]
    fn test_003() {
        let mut basis = LightingBasis::new(1024, 512);
        basis.add_area_light(&Point2i::new(100, 100), &Point2i::new(120, 300));
        let added = basis.sample_area_lights(AREA_LIGHT_SAMPLE_SPACING);
        assert_eq!(added.len(), 1);
        assert_eq!(basis.point_lights()[1], Point2i::new(110, 200));

        basis.clear();
        assert!(basis.is_empty());
        assert_eq!(basis.number_of_area_lights(), 0);
        assert!(!basis.are_area_lights_sampled());
    }
}

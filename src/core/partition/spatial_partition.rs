use super::condition_mapping::*;
use super::kdtree::*;
use crate::core::base::*;
use crate::core::basis::*;

use log::debug;

/// Nearest-light partition of the `width x height` map domain. Owns the
/// lighting basis so that every structural change goes through a rebuild.
#[derive(Debug, Clone)]
pub struct SpatialPartition {
    basis: LightingBasis,
    tree: PointKdTree,
    cell_map: Vec<usize>,
    pixel_counts: Vec<usize>,
    mapping: CellToConditionMapping,
}

impl SpatialPartition {
    pub fn new(width: u32, height: u32) -> Self {
        return Self::from_basis(LightingBasis::new(width, height));
    }

    pub fn from_basis(basis: LightingBasis) -> Self {
        let mut partition = SpatialPartition {
            basis,
            tree: PointKdTree::default(),
            cell_map: Vec::new(),
            pixel_counts: Vec::new(),
            mapping: CellToConditionMapping::default(),
        };
        partition.rebuild();
        return partition;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        return self.basis.width();
    }

    #[inline]
    pub fn height(&self) -> u32 {
        return self.basis.height();
    }

    #[inline]
    pub fn basis(&self) -> &LightingBasis {
        return &self.basis;
    }

    #[inline]
    pub fn number_of_cells(&self) -> usize {
        return self.basis.number_of_point_lights();
    }

    /// Rebuilds the search tree from the current light positions and recounts
    /// the pixels of every cell.
    pub fn rebuild(&mut self) {
        self.tree = PointKdTree::new(self.basis.point_lights());
        let n = self.basis.number_of_point_lights();
        self.pixel_counts = vec![0; n];
        if n == 0 {
            self.cell_map = Vec::new();
            return;
        }
        let width = self.width();
        let height = self.height();
        let mut cell_map = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                // the tree is non-empty here
                let cell = self.tree.nearest(x as i32, y as i32).unwrap_or(0);
                self.pixel_counts[cell] += 1;
                cell_map.push(cell);
            }
        }
        self.cell_map = cell_map;
        debug!(
            "Partitioned {}x{} map into {} cells",
            width, height, n
        );
    }

    /// Nearest light to `(x, y)`; `None` only for an empty basis.
    pub fn nearest_light(&self, x: i32, y: i32) -> Option<usize> {
        return self.tree.nearest(x, y);
    }

    /// Cell of an in-domain pixel, read from the table built by `rebuild`.
    #[inline]
    pub fn cell_at(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        return self.cell_map.get((y * self.width() + x) as usize).copied();
    }

    #[inline]
    pub fn pixel_counts(&self) -> &[usize] {
        return &self.pixel_counts;
    }

    pub fn pixel_count(&self, cell: usize) -> usize {
        return self.pixel_counts.get(cell).copied().unwrap_or(0);
    }

    pub fn add_point_light(&mut self, position: &Point2i) -> Option<usize> {
        let index = self.basis.add_point_light(position);
        if index.is_some() {
            self.rebuild();
        }
        return index;
    }

    pub fn add_point_lights(&mut self, positions: &[Point2i]) -> Vec<usize> {
        let added = self.basis.add_point_lights(positions);
        self.rebuild();
        return added;
    }

    pub fn add_area_light(&mut self, start: &Point2i, end: &Point2i) -> Option<usize> {
        let index = self.basis.add_area_light(start, end);
        self.rebuild();
        return index;
    }

    pub fn add_area_lights(&mut self, lights: &[AreaLight]) -> Vec<usize> {
        let added = self.basis.add_area_lights(lights);
        self.rebuild();
        return added;
    }

    pub fn sample_area_lights(&mut self, spacing: i32) -> Vec<usize> {
        let added = self.basis.sample_area_lights(spacing);
        self.rebuild();
        return added;
    }

    /// Replaces the light positions. The old cells are gone, so the condition
    /// mapping is cleared as well.
    pub fn set_point_lights(&mut self, positions: &[Point2i]) -> Vec<usize> {
        let added = self.basis.set_point_lights(positions);
        self.mapping.clear();
        self.rebuild();
        return added;
    }

    /// Adds one group of positions per condition and appends the inserted
    /// cells to that condition's group. Cells already present keep their
    /// condition. Rejected positions get no cell.
    pub fn insert_condition_groups(&mut self, positions: &[Vec<Point2i>]) -> &CellToConditionMapping {
        self.mapping.reserve_conditions(positions.len());
        for (k, group) in positions.iter().enumerate() {
            for cell in self.basis.add_point_lights(group) {
                self.mapping.add_cell(k, cell);
            }
        }
        self.rebuild();
        return &self.mapping;
    }

    /// Appends a stored basis. `groups` index into `positions`; they are
    /// renumbered to the cells actually assigned and merged into the current
    /// mapping. Entries whose position was rejected or does not exist are
    /// dropped.
    pub fn insert_basis(&mut self, positions: &[Point2i], groups: &[Vec<usize>]) -> &CellToConditionMapping {
        let assigned: Vec<Option<usize>> = positions
            .iter()
            .map(|p| self.basis.add_point_light(p))
            .collect();
        self.mapping.reserve_conditions(groups.len());
        for (k, group) in groups.iter().enumerate() {
            for cell in group.iter() {
                match assigned.get(*cell).copied().flatten() {
                    Some(index) => self.mapping.add_cell(k, index),
                    None => debug!("Dropped cell {} of condition {}", cell, k),
                }
            }
        }
        self.rebuild();
        return &self.mapping;
    }

    /// Empties the basis and the condition mapping.
    pub fn clear(&mut self) {
        self.basis.clear();
        self.mapping.clear();
        self.rebuild();
    }

    pub fn set_domain_size(&mut self, width: u32, height: u32) {
        self.basis.set_domain_size(width, height);
        self.rebuild();
    }

    #[inline]
    pub fn condition_mapping(&self) -> &CellToConditionMapping {
        return &self.mapping;
    }

    pub fn set_condition_mapping(&mut self, mapping: CellToConditionMapping) {
        self.mapping = mapping;
    }

    /// Light positions, i.e. the cell sites.
    pub fn cell_centers(&self) -> Vec<Point2i> {
        return self.basis.point_lights().to_vec();
    }

    /// Boundary of every cell as a convex polygon in continuous map
    /// coordinates: the domain rectangle clipped by the bisectors between the
    /// cell's site and every other site.
    pub fn cell_polygons(&self) -> Vec<Polygon> {
        let sites: Vec<Vector2<f64>> = self.basis.point_lights().iter().map(|p| p.to_f64()).collect();
        let w = self.width() as f64;
        let h = self.height() as f64;
        let domain = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(w, 0.0),
            Vector2::new(w, h),
            Vector2::new(0.0, h),
        ];
        let mut polygons = Vec::with_capacity(sites.len());
        for (i, si) in sites.iter().enumerate() {
            let mut polygon = domain.clone();
            for (j, sj) in sites.iter().enumerate() {
                if i == j || si == sj {
                    continue;
                }
                let n = *sj - *si;
                let c = 0.5 * (sj.dot(sj) - si.dot(si));
                polygon = clip_half_plane(&polygon, &n, c);
                if polygon.is_empty() {
                    break;
                }
            }
            polygons.push(polygon);
        }
        return polygons;
    }
}

/// Groups of partition cells, one group per lighting condition. A condition
/// may own several cells; a cell belongs to at most one condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellToConditionMapping {
    groups: Vec<Vec<usize>>,
}

impl CellToConditionMapping {
    pub fn new(number_of_conditions: usize) -> Self {
        CellToConditionMapping {
            groups: vec![Vec::new(); number_of_conditions],
        }
    }

    pub fn from_groups(groups: Vec<Vec<usize>>) -> Self {
        CellToConditionMapping { groups }
    }

    #[inline]
    pub fn groups(&self) -> &[Vec<usize>] {
        return &self.groups;
    }

    pub fn group(&self, condition: usize) -> &[usize] {
        match self.groups.get(condition) {
            Some(g) => g,
            None => &[],
        }
    }

    #[inline]
    pub fn number_of_conditions(&self) -> usize {
        return self.groups.len();
    }

    /// Registers `cell` under `condition`, growing the group list if needed.
    pub fn add_cell(&mut self, condition: usize, cell: usize) {
        if condition >= self.groups.len() {
            self.groups.resize(condition + 1, Vec::new());
        }
        self.groups[condition].push(cell);
    }

    /// Grows the group list to at least `number_of_conditions` groups.
    pub fn reserve_conditions(&mut self, number_of_conditions: usize) {
        if number_of_conditions > self.groups.len() {
            self.groups.resize(number_of_conditions, Vec::new());
        }
    }

    /// Condition owning `cell`, by linear search.
    pub fn condition_of(&self, cell: usize) -> Option<usize> {
        return self.groups.iter().position(|g| g.contains(&cell));
    }

    /// Reverse table indexed by cell, for `number_of_cells` cells.
    pub fn cell_to_condition(&self, number_of_cells: usize) -> Vec<Option<usize>> {
        let mut table = vec![None; number_of_cells];
        for (k, g) in self.groups.iter().enumerate() {
            for cell in g.iter() {
                if *cell < number_of_cells && table[*cell].is_none() {
                    table[*cell] = Some(k);
                }
            }
        }
        return table;
    }

    /// True when each of the `number_of_cells` cells appears in exactly one
    /// group and no group names a cell that does not exist.
    pub fn is_consistent(&self, number_of_cells: usize) -> bool {
        let mut seen = vec![0usize; number_of_cells];
        for g in self.groups.iter() {
            for cell in g.iter() {
                if *cell >= number_of_cells {
                    return false;
                }
                seen[*cell] += 1;
            }
        }
        return seen.iter().all(|n| *n == 1);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        return self.groups.iter().all(|g| g.is_empty());
    }
}

use super::lighting_conditions::*;
use crate::core::base::*;
use crate::core::partition::*;

/// Where the lights of each condition are, as decided by an identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum LightProposal {
    /// Positions per condition, in condition order.
    Points(Vec<Vec<Point2i>>),
    /// A stored basis: positions in cell order plus the cell groups of each
    /// condition, indexed into `positions`.
    Basis {
        positions: Vec<Point2i>,
        groups: Vec<Vec<usize>>,
    },
    /// No lights. The conditions are integrated over their masks.
    Masks,
}

impl LightProposal {
    /// Inserts the proposed lights into `partition` and records which cells
    /// belong to which condition. Positions the basis rejects get no cell.
    pub fn apply(&self, partition: &mut SpatialPartition, number_of_conditions: usize) -> CellToConditionMapping {
        match self {
            LightProposal::Points(groups) => {
                return partition.insert_condition_groups(groups).clone();
            }
            LightProposal::Basis { positions, groups } => {
                return partition.insert_basis(positions, groups).clone();
            }
            LightProposal::Masks => {
                let mapping = CellToConditionMapping::new(number_of_conditions);
                partition.set_condition_mapping(mapping.clone());
                return mapping;
            }
        }
    }

    pub fn uses_masks(&self) -> bool {
        return matches!(self, LightProposal::Masks);
    }
}

/// Strategy deciding light positions from the lighting condition images.
pub trait LightSourceIdentifier {
    fn identify(&self, conditions: &LightingConditions) -> Result<LightProposal, LightBasisError>;
}

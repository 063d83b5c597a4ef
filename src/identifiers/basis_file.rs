use crate::core::base::*;
use crate::core::basis::*;
use crate::core::identifier::*;

use log::info;
use std::path::{Path, PathBuf};

/// Reads the lights and their grouping from a basis file and a grouping
/// file written by an earlier run. The condition images are not consulted.
#[derive(Debug, Clone)]
pub struct BasisFileIdentifier {
    basis: PathBuf,
    grouping: PathBuf,
}

impl BasisFileIdentifier {
    pub fn new(basis: &Path, grouping: &Path) -> Self {
        BasisFileIdentifier {
            basis: basis.to_path_buf(),
            grouping: grouping.to_path_buf(),
        }
    }
}

impl LightSourceIdentifier for BasisFileIdentifier {
    fn identify(&self, _conditions: &LightingConditions) -> Result<LightProposal, LightBasisError> {
        let positions = load_basis_positions(&self.basis.to_string_lossy())?;
        let groups = load_grouping(&self.grouping.to_string_lossy())?;
        info!(
            "Read {} lights in {} groups from {}",
            positions.len(),
            groups.len(),
            self.basis.display()
        );
        return Ok(LightProposal::Basis { positions, groups });
    }
}

pub fn create_basis_file_identifier(basis: &Path, grouping: &Path) -> Box<dyn LightSourceIdentifier> {
    return Box::new(BasisFileIdentifier::new(basis, grouping));
}

use super::basis_file::*;
use super::inverse_cdf::*;
use super::masks::*;
use super::median_energy::*;
use crate::core::identifier::*;
use crate::core::options::*;

pub fn create_identifier(method: &IdentificationMethod) -> Box<dyn LightSourceIdentifier> {
    match method {
        IdentificationMethod::MedianEnergy => create_median_energy_identifier(),
        IdentificationMethod::InverseCdf(settings) => create_inverse_cdf_identifier(settings),
        IdentificationMethod::Masks => create_mask_identifier(),
        IdentificationMethod::BasisFile { basis, grouping } => create_basis_file_identifier(basis, grouping),
    }
}

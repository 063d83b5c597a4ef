use crate::core::base::*;
use crate::core::identifier::*;

/// Places no lights. Each condition is integrated over its own mask.
#[derive(Debug, Clone, Default)]
pub struct MaskIdentifier {}

impl MaskIdentifier {
    pub fn new() -> Self {
        MaskIdentifier {}
    }
}

impl LightSourceIdentifier for MaskIdentifier {
    fn identify(&self, _conditions: &LightingConditions) -> Result<LightProposal, LightBasisError> {
        return Ok(LightProposal::Masks);
    }
}

pub fn create_mask_identifier() -> Box<dyn LightSourceIdentifier> {
    return Box::new(MaskIdentifier::new());
}

use super::MaterialT;

/// Marks a boundary without scattering, such as a medium interface.
pub struct PseudoMaterial {}

impl PseudoMaterial {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for PseudoMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialT for PseudoMaterial {
    fn has_bsdf(&self) -> bool {
        false
    }
}

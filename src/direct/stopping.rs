use super::CandidateEstimate;

/// Decides when enough of the ranked candidates have been resolved.
///
/// After `i` candidates were walked, the rule looks ahead at the next
/// `round((N - i) * certainty)` candidates and stops once `tolerance` times the
/// luminance already confirmed visible covers their summed luminance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StoppingRule {
    certainty: f32,
    tolerance: f32,
}

impl StoppingRule {
    pub const DEFAULT_CERTAINTY: f32 = 1.0;
    pub const DEFAULT_TOLERANCE: f32 = 0.1;

    pub fn new(certainty: f32, tolerance: f32) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&certainty) {
            anyhow::bail!(format!(
                "stopping rule - 'certainty' should be in [0, 1], got {}",
                certainty
            ));
        }
        if !(0.0..=1.0).contains(&tolerance) {
            anyhow::bail!(format!(
                "stopping rule - 'tolerance' should be in [0, 1], got {}",
                tolerance
            ));
        }
        Ok(Self {
            certainty,
            tolerance,
        })
    }

    pub fn certainty(&self) -> f32 {
        self.certainty
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// End of the look-ahead window after `walked` candidates out of `total`.
    pub fn boundary(&self, walked: usize, total: usize) -> usize {
        let remaining = total.saturating_sub(walked);
        let ahead = (remaining as f32 * self.certainty).round() as usize;
        (walked + ahead).min(total)
    }

    /// `ranked` must be sorted by descending luminance. `resolved_luminance` is
    /// the luminance of the walked candidates that turned out visible.
    pub fn should_stop(
        &self,
        ranked: &[CandidateEstimate],
        walked: usize,
        resolved_luminance: f32,
    ) -> bool {
        let walked = walked.min(ranked.len());
        let boundary = self.boundary(walked, ranked.len());
        let pending: f32 = ranked[walked..boundary]
            .iter()
            .map(|estimate| estimate.luminance)
            .sum();
        self.tolerance * resolved_luminance >= pending
    }
}

impl Default for StoppingRule {
    fn default() -> Self {
        Self {
            certainty: Self::DEFAULT_CERTAINTY,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

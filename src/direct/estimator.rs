use crate::core::color::Color;

use super::{
    IncidentSample, LightCandidate, LightSampler, LightStatisticsStore, MaterialEvaluator,
    Occluder, ShadingPoint, StatisticsDelta, StoppingRule, VisibilityQuery,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    Unresolved,
    Visible,
    Occluded,
}

impl Visibility {
    /// What resolving a candidate to this state adds to its statistics.
    pub fn delta(self) -> Option<StatisticsDelta> {
        match self {
            Visibility::Unresolved => None,
            Visibility::Visible => Some(StatisticsDelta {
                sampled: true,
                hit: true,
            }),
            Visibility::Occluded => Some(StatisticsDelta {
                sampled: true,
                hit: false,
            }),
        }
    }
}

/// Unshadowed estimate of one candidate at one shading point.
#[derive(Copy, Clone, Debug)]
pub struct CandidateEstimate {
    /// Position of the candidate in the render's candidate list.
    pub index: usize,
    pub contribution: Color,
    pub luminance: f32,
    pub visibility: Visibility,
    pub query: VisibilityQuery,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DirectStrategy {
    /// Resolve a ranked prefix, extrapolate the rest from hit rates.
    Adaptive(StoppingRule),
    /// Resolve every non-zero candidate. Statistics are left untouched.
    Exhaustive,
}

/// Result of one estimator call together with its bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectEstimate {
    pub radiance: Color,
    /// Candidates walked before the stopping rule fired.
    pub walked: usize,
    pub sampled: u32,
    pub hit: u32,
    /// Unresolved candidates that received a non-zero extrapolated share.
    pub extrapolated: usize,
}

pub struct DirectLighting<L> {
    candidates: Vec<LightCandidate<L>>,
    stats: LightStatisticsStore,
    strategy: DirectStrategy,
    rotate_candidates: bool,
}

fn contribution<M: MaterialEvaluator + ?Sized>(
    point: &ShadingPoint,
    sample: &IncidentSample,
    material: &M,
    weight: f32,
) -> Color {
    if !(sample.pdf > 0.0) || sample.radiance.is_black() {
        return Color::BLACK;
    }
    let cos = sample.wi.dot(point.normal).abs();
    let f = material.evaluate(point.wo, sample.wi, point.normal) * cos;
    if f.is_black() {
        return Color::BLACK;
    }
    let contribution = f * sample.radiance / sample.pdf * weight;
    if contribution.is_finite() {
        contribution
    } else {
        Color::BLACK
    }
}

fn ratio(num: u32, denom: u32) -> f32 {
    if denom == 0 {
        0.0
    } else {
        num as f32 / denom as f32
    }
}

impl<L: LightSampler> DirectLighting<L> {
    pub fn new(candidates: Vec<LightCandidate<L>>, strategy: DirectStrategy) -> Self {
        let stats = LightStatisticsStore::new(candidates.len());
        Self {
            candidates,
            stats,
            strategy,
            rotate_candidates: false,
        }
    }

    /// Shifts every candidate coordinate by the shading point's fresh sample
    /// (Cranley-Patterson rotation) instead of using it as built.
    pub fn with_rotation(mut self, rotate_candidates: bool) -> Self {
        self.rotate_candidates = rotate_candidates;
        self
    }

    pub fn candidates(&self) -> &[LightCandidate<L>] {
        &self.candidates
    }

    pub fn statistics(&self) -> &LightStatisticsStore {
        &self.stats
    }

    pub fn estimate<M, O>(
        &self,
        point: &ShadingPoint,
        material: &M,
        occluder: &O,
        fresh: &[(f32, f32)],
    ) -> Color
    where
        M: MaterialEvaluator + ?Sized,
        O: Occluder + ?Sized,
    {
        self.estimate_detailed(point, material, occluder, fresh).radiance
    }

    /// `fresh` holds one sample per candidate from the point's own stream. It
    /// only matters when candidate rotation is enabled and may be shorter than
    /// the candidate list, in which case the rest are used unrotated.
    pub fn estimate_detailed<M, O>(
        &self,
        point: &ShadingPoint,
        material: &M,
        occluder: &O,
        fresh: &[(f32, f32)],
    ) -> DirectEstimate
    where
        M: MaterialEvaluator + ?Sized,
        O: Occluder + ?Sized,
    {
        let mut ranked = self.rank(point, material, fresh);
        match self.strategy {
            DirectStrategy::Adaptive(rule) => self.resolve_adaptive(&mut ranked, &rule, occluder),
            DirectStrategy::Exhaustive => Self::resolve_all(&mut ranked, occluder),
        }
    }

    /// Unshadowed estimates of every candidate, sorted by descending luminance.
    pub fn rank<M: MaterialEvaluator + ?Sized>(
        &self,
        point: &ShadingPoint,
        material: &M,
        fresh: &[(f32, f32)],
    ) -> Vec<CandidateEstimate> {
        let mut ranked = self
            .candidates
            .iter()
            .enumerate()
            .map(|(index, cand)| {
                let u = match fresh.get(index) {
                    Some(offset) if self.rotate_candidates => {
                        ((cand.u.0 + offset.0).fract(), (cand.u.1 + offset.1).fract())
                    }
                    _ => cand.u,
                };
                let sample = cand.light.sample_incident(point, u);
                let contribution = contribution(point, &sample, material, cand.weight);
                CandidateEstimate {
                    index,
                    contribution,
                    luminance: contribution.luminance(),
                    visibility: Visibility::Unresolved,
                    query: sample.visibility,
                }
            })
            .collect::<Vec<_>>();
        // stable, so equal luminances keep candidate order
        ranked.sort_by(|a, b| b.luminance.total_cmp(&a.luminance));
        ranked
    }

    fn resolve_adaptive<O: Occluder + ?Sized>(
        &self,
        ranked: &mut [CandidateEstimate],
        rule: &StoppingRule,
        occluder: &O,
    ) -> DirectEstimate {
        let mut result = DirectEstimate::default();
        let mut resolved_luminance = 0.0;

        while result.walked < ranked.len() {
            let estimate = &mut ranked[result.walked];
            if !estimate.contribution.is_black() {
                estimate.visibility = Self::resolve(estimate, occluder);
                result.sampled += 1;
                if estimate.visibility == Visibility::Visible {
                    result.radiance += estimate.contribution;
                    result.hit += 1;
                    resolved_luminance += estimate.luminance;
                }
            }
            result.walked += 1;
            if rule.should_stop(ranked, result.walked, resolved_luminance) {
                break;
            }
        }

        if result.sampled > 0 {
            let deltas = ranked[..result.walked].iter().filter_map(|estimate| {
                estimate
                    .visibility
                    .delta()
                    .map(|delta| (estimate.index, delta))
            });
            self.stats.apply(deltas);
        }

        let call_rate = ratio(result.hit, result.sampled);
        if call_rate > 0.0 {
            for estimate in &ranked[result.walked..] {
                let history = self.stats.get(estimate.index);
                let scale = call_rate * ratio(history.hit, history.sampled);
                if scale > 0.0 && !estimate.contribution.is_black() {
                    result.radiance += estimate.contribution * scale;
                    result.extrapolated += 1;
                }
            }
        }

        result
    }

    fn resolve_all<O: Occluder + ?Sized>(
        ranked: &mut [CandidateEstimate],
        occluder: &O,
    ) -> DirectEstimate {
        let mut result = DirectEstimate::default();
        for estimate in ranked.iter_mut() {
            result.walked += 1;
            if estimate.contribution.is_black() {
                continue;
            }
            estimate.visibility = Self::resolve(estimate, occluder);
            result.sampled += 1;
            if estimate.visibility == Visibility::Visible {
                result.radiance += estimate.contribution;
                result.hit += 1;
            }
        }
        result
    }

    fn resolve<O: Occluder + ?Sized>(estimate: &CandidateEstimate, occluder: &O) -> Visibility {
        if occluder.is_unoccluded(&estimate.query) {
            Visibility::Visible
        } else {
            Visibility::Occluded
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use super::*;

    /// Fixed radiance arriving straight down the normal.
    struct FakeLight {
        radiance: Color,
        pdf: f32,
    }

    impl LightSampler for FakeLight {
        fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample {
            IncidentSample {
                wi: point.normal,
                pdf: self.pdf,
                radiance: self.radiance,
                // the sample coordinate doubles as an id for the occluder
                visibility: VisibilityQuery::new(point.position, point.normal, u.0),
            }
        }
    }

    struct ConstantMaterial(Color);

    impl MaterialEvaluator for ConstantMaterial {
        fn evaluate(&self, _wo: glam::Vec3A, _wi: glam::Vec3A, _normal: glam::Vec3A) -> Color {
            self.0
        }
    }

    /// Blocks queries whose distance is listed and counts every test.
    struct FakeOccluder {
        blocked: Vec<f32>,
        tests: AtomicUsize,
    }

    impl FakeOccluder {
        fn new(blocked: Vec<f32>) -> Self {
            Self {
                blocked,
                tests: AtomicUsize::new(0),
            }
        }

        fn tests(&self) -> usize {
            self.tests.load(Ordering::Relaxed)
        }
    }

    impl Occluder for FakeOccluder {
        fn is_unoccluded(&self, query: &VisibilityQuery) -> bool {
            self.tests.fetch_add(1, Ordering::Relaxed);
            !self.blocked.contains(&query.distance)
        }
    }

    fn point() -> ShadingPoint {
        ShadingPoint {
            position: glam::Vec3A::ZERO,
            normal: glam::Vec3A::Y,
            wo: glam::Vec3A::Y,
        }
    }

    fn candidate(light: FakeLight, id: f32) -> LightCandidate<FakeLight> {
        LightCandidate {
            light: Arc::new(light),
            light_index: 0,
            u: (id, 0.5),
            weight: 1.0,
        }
    }

    fn gray_light(value: f32) -> FakeLight {
        FakeLight {
            radiance: Color::gray(value),
            pdf: 1.0,
        }
    }

    fn adaptive(certainty: f32, tolerance: f32) -> DirectStrategy {
        DirectStrategy::Adaptive(StoppingRule::new(certainty, tolerance).unwrap())
    }

    #[test]
    fn single_visible_light_is_exact() {
        let radiance = Color::new(0.25, 0.5, 2.0);
        let lighting = DirectLighting::new(
            vec![candidate(FakeLight { radiance, pdf: 1.0 }, 0.1)],
            adaptive(1.0, 0.1),
        );
        let occluder = FakeOccluder::new(vec![]);
        let result = lighting.estimate_detailed(
            &point(),
            &ConstantMaterial(Color::WHITE),
            &occluder,
            &[],
        );

        assert_eq!(result.radiance, radiance);
        assert_eq!(result.extrapolated, 0);
        let stats = lighting.statistics().get(0);
        assert_eq!((stats.sampled, stats.hit), (1, 1));
    }

    #[test]
    fn bright_candidate_stops_walk_and_tail_is_extrapolated() {
        let lighting = DirectLighting::new(
            vec![candidate(gray_light(1.0), 0.2), candidate(gray_light(10.0), 0.1)],
            adaptive(0.5, 0.5),
        );
        let occluder = FakeOccluder::new(vec![]);
        let material = ConstantMaterial(Color::WHITE);

        // never sampled before: the tail contributes nothing
        let first = lighting.estimate_detailed(&point(), &material, &occluder, &[]);
        assert_eq!(first.walked, 1);
        assert_eq!(first.radiance, Color::gray(10.0));
        assert_eq!(first.extrapolated, 0);
        assert_eq!(occluder.tests(), 1);
        assert_eq!(lighting.statistics().get(0).sampled, 0);
        assert_eq!(lighting.statistics().get(1).sampled, 1);

        // give the dim candidate a history of one hit in two samples
        lighting.statistics().apply(vec![
            (0, Visibility::Visible.delta().unwrap()),
            (0, Visibility::Occluded.delta().unwrap()),
        ]);
        let second = lighting.estimate_detailed(&point(), &material, &occluder, &[]);
        assert_eq!(second.walked, 1);
        assert_eq!(second.extrapolated, 1);
        assert_eq!(second.radiance, Color::gray(10.5));
    }

    #[test]
    fn occluded_call_extrapolates_nothing() {
        let lighting = DirectLighting::new(
            vec![candidate(gray_light(10.0), 0.1), candidate(gray_light(1.0), 0.2)],
            adaptive(0.0, 0.5),
        );
        lighting
            .statistics()
            .apply(vec![(1, Visibility::Visible.delta().unwrap())]);
        let occluder = FakeOccluder::new(vec![0.1]);
        let result = lighting.estimate_detailed(
            &point(),
            &ConstantMaterial(Color::WHITE),
            &occluder,
            &[],
        );

        assert_eq!(result.sampled, 1);
        assert_eq!(result.hit, 0);
        assert_eq!(result.radiance, Color::BLACK);
        assert_eq!(result.extrapolated, 0);
    }

    #[test]
    fn zero_pdf_candidate_is_never_sampled() {
        let lighting = DirectLighting::new(
            vec![
                candidate(
                    FakeLight {
                        radiance: Color::gray(100.0),
                        pdf: 0.0,
                    },
                    0.1,
                ),
                candidate(gray_light(1.0), 0.2),
            ],
            adaptive(1.0, 0.0),
        );
        let occluder = FakeOccluder::new(vec![]);
        let result = lighting.estimate_detailed(
            &point(),
            &ConstantMaterial(Color::WHITE),
            &occluder,
            &[],
        );

        assert_eq!(result.radiance, Color::gray(1.0));
        assert_eq!(occluder.tests(), 1);
        assert_eq!(lighting.statistics().get(0).sampled, 0);
        assert_eq!(lighting.statistics().get(1).sampled, 1);
    }

    #[test]
    fn degenerate_samples_contribute_zero() {
        let material = ConstantMaterial(Color::WHITE);
        let light = FakeLight {
            radiance: Color::WHITE,
            pdf: f32::NAN,
        };
        let sample = light.sample_incident(&point(), (0.0, 0.0));
        assert!(contribution(&point(), &sample, &material, 1.0).is_black());

        let light = FakeLight {
            radiance: Color::gray(f32::INFINITY),
            pdf: 1.0,
        };
        let sample = light.sample_incident(&point(), (0.0, 0.0));
        assert!(contribution(&point(), &sample, &material, 1.0).is_black());

        let sample = gray_light(1.0).sample_incident(&point(), (0.0, 0.0));
        assert!(contribution(&point(), &sample, &ConstantMaterial(Color::BLACK), 1.0).is_black());
    }

    #[test]
    fn contribution_applies_cosine_pdf_and_weight() {
        let light = FakeLight {
            radiance: Color::gray(4.0),
            pdf: 2.0,
        };
        let mut sample = light.sample_incident(&point(), (0.0, 0.0));
        sample.wi = glam::Vec3A::new(0.0, -0.5, 0.0);
        let result = contribution(&point(), &sample, &ConstantMaterial(Color::gray(0.5)), 0.25);
        assert!((result.r - 0.125).abs() < 1e-6);
    }

    #[test]
    fn exhaustive_resolves_everything_without_statistics() {
        let lighting = DirectLighting::new(
            vec![
                candidate(gray_light(10.0), 0.1),
                candidate(gray_light(1.0), 0.2),
                candidate(gray_light(0.0), 0.3),
            ],
            DirectStrategy::Exhaustive,
        );
        let occluder = FakeOccluder::new(vec![0.2]);
        let result = lighting.estimate_detailed(
            &point(),
            &ConstantMaterial(Color::WHITE),
            &occluder,
            &[],
        );

        assert_eq!(result.radiance, Color::gray(10.0));
        assert_eq!((result.sampled, result.hit), (2, 1));
        assert_eq!(occluder.tests(), 2);
        assert_eq!(lighting.statistics().totals().sampled, 0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let lighting = DirectLighting::new(
            vec![
                candidate(gray_light(1.0), 0.1),
                candidate(gray_light(3.0), 0.2),
                candidate(gray_light(1.0), 0.3),
                candidate(gray_light(2.0), 0.4),
            ],
            adaptive(1.0, 0.1),
        );
        let ranked = lighting.rank(&point(), &ConstantMaterial(Color::WHITE), &[]);
        let order = ranked.iter().map(|e| e.index).collect::<Vec<_>>();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(ranked
            .iter()
            .all(|estimate| estimate.visibility == Visibility::Unresolved));
    }

    #[test]
    fn rotation_shifts_candidate_coordinates() {
        struct RecordingLight(Mutex<(f32, f32)>);

        impl LightSampler for RecordingLight {
            fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample {
                *self.0.lock().unwrap() = u;
                IncidentSample::none(point.position)
            }
        }

        let light = Arc::new(RecordingLight(Mutex::new((0.0, 0.0))));
        let cand = LightCandidate {
            light: light.clone(),
            light_index: 0,
            u: (0.75, 0.25),
            weight: 1.0,
        };
        let material = ConstantMaterial(Color::WHITE);

        let lighting = DirectLighting::new(vec![cand.clone()], DirectStrategy::Exhaustive);
        lighting.rank(&point(), &material, &[(0.5, 0.5)]);
        assert_eq!(*light.0.lock().unwrap(), (0.75, 0.25));

        let lighting =
            DirectLighting::new(vec![cand], DirectStrategy::Exhaustive).with_rotation(true);
        lighting.rank(&point(), &material, &[(0.5, 0.5)]);
        assert_eq!(*light.0.lock().unwrap(), (0.25, 0.75));
    }
}

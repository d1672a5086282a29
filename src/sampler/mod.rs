mod jittered;
mod random;
mod recurrence;

pub use jittered::*;
pub use random::*;
pub use recurrence::*;

use crate::core::{loader::InputParams, rng::Rng};

/// Per-pixel sample stream.
///
/// Besides the camera offsets returned by `next_sample`, a sampler can hand out
/// batches of 2D samples that were requested before rendering starts. Arrays are
/// consumed in the order they were requested and are regenerated for every
/// pixel sample.
#[enum_dispatch::enum_dispatch(Sampler)]
pub trait SamplerT: Send + Sync + Clone {
    fn spp(&self) -> u32;

    /// The array size this sampler would rather produce for a request of `n`.
    fn round_count(&self, n: u32) -> u32 {
        n
    }

    fn request_2d_array(&mut self, n: u32);

    fn start_pixel(&mut self);

    /// Camera offset inside the pixel, `None` when the pixel is done.
    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)>;

    fn get_2d(&mut self, rng: &mut Rng) -> (f32, f32);

    /// `None` if no array of this size is pending for the current sample.
    fn get_2d_array(&mut self, n: u32) -> Option<&[(f32, f32)]>;
}

#[enum_dispatch::enum_dispatch]
#[derive(Clone)]
pub enum Sampler {
    RandomSampler,
    JitteredSampler,
    AdditiveRecurrenceSampler,
}

/// Requested 2D arrays of one pixel sample.
#[derive(Clone, Default)]
pub struct SampleArrays {
    arrays: Vec<Vec<(f32, f32)>>,
    sizes: Vec<u32>,
    offset: usize,
}

impl SampleArrays {
    pub fn request(&mut self, n: u32) {
        self.sizes.push(n);
        self.arrays.push(Vec::with_capacity(n as usize));
    }

    pub fn refill<F: FnMut(u32, &mut Vec<(f32, f32)>)>(&mut self, mut fill: F) {
        for (array, &n) in self.arrays.iter_mut().zip(self.sizes.iter()) {
            array.clear();
            fill(n, array);
        }
        self.offset = 0;
    }

    pub fn next(&mut self, n: u32) -> Option<&[(f32, f32)]> {
        if self.offset >= self.arrays.len() || self.sizes[self.offset] != n {
            return None;
        }
        self.offset += 1;
        Some(&self.arrays[self.offset - 1])
    }
}

pub fn create_sampler_from_params(params: &mut InputParams) -> anyhow::Result<Sampler> {
    params.set_name("sampler".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("sampler-{}", ty).into());

    let res = match ty.as_str() {
        "random" => RandomSampler::load(params)?.into(),
        "jittered" => JitteredSampler::load(params)?.into(),
        "recurrence" => AdditiveRecurrenceSampler::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_are_consumed_in_request_order() {
        let mut arrays = SampleArrays::default();
        arrays.request(4);
        arrays.request(2);
        arrays.refill(|n, array| {
            for i in 0..n {
                array.push((i as f32, n as f32));
            }
        });

        assert_eq!(arrays.next(4).map(|arr| arr.len()), Some(4));
        // a size mismatch does not advance the cursor
        assert!(arrays.next(3).is_none());
        assert_eq!(arrays.next(2), Some(&[(0.0, 2.0), (1.0, 2.0)][..]));
        assert!(arrays.next(2).is_none());
    }

    #[test]
    fn refill_rewinds_arrays() {
        let mut arrays = SampleArrays::default();
        arrays.request(1);
        arrays.refill(|_, array| array.push((0.25, 0.75)));
        assert!(arrays.next(1).is_some());
        arrays.refill(|_, array| array.push((0.5, 0.5)));
        assert_eq!(arrays.next(1), Some(&[(0.5, 0.5)][..]));
    }
}

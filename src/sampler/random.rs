use crate::core::{loader::InputParams, rng::Rng};

use super::{SampleArrays, SamplerT};

#[derive(Clone)]
pub struct RandomSampler {
    spp: u32,
    curr_index: u32,
    arrays: SampleArrays,
}

impl RandomSampler {
    pub fn new(spp: u32) -> Self {
        Self {
            spp,
            curr_index: 0,
            arrays: SampleArrays::default(),
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let spp = params.get_int("spp")?;
        if spp <= 0 {
            anyhow::bail!(format!("{} - 'spp' should be positive", params.name()));
        }
        Ok(Self::new(spp as u32))
    }
}

impl SamplerT for RandomSampler {
    fn spp(&self) -> u32 {
        self.spp
    }

    fn request_2d_array(&mut self, n: u32) {
        self.arrays.request(n);
    }

    fn start_pixel(&mut self) {
        self.curr_index = 0;
    }

    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)> {
        if self.curr_index < self.spp {
            self.curr_index += 1;
            self.arrays.refill(|n, array| {
                for _ in 0..n {
                    array.push(rng.uniform_2d());
                }
            });
            Some(rng.uniform_2d())
        } else {
            None
        }
    }

    fn get_2d(&mut self, rng: &mut Rng) -> (f32, f32) {
        rng.uniform_2d()
    }

    fn get_2d_array(&mut self, n: u32) -> Option<&[(f32, f32)]> {
        self.arrays.next(n)
    }
}

use crate::core::{loader::InputParams, rng::Rng};

use super::{SampleArrays, SamplerT};

#[derive(Clone)]
pub struct JitteredSampler {
    division_x: u32,
    division_y: u32,
    division_x_inv: f32,
    division_y_inv: f32,
    curr_ind_x: u32,
    curr_ind_y: u32,
    arrays: SampleArrays,
}

impl JitteredSampler {
    pub fn new(division_x: u32, division_y: u32) -> Self {
        Self {
            division_x,
            division_y,
            division_x_inv: 1.0 / division_x as f32,
            division_y_inv: 1.0 / division_y as f32,
            curr_ind_x: 0,
            curr_ind_y: 0,
            arrays: SampleArrays::default(),
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let division_x = params.get_int("division_x")?;
        let division_y = params.get_int("division_y")?;
        if division_x <= 0 || division_y <= 0 {
            anyhow::bail!(format!("{} - divisions should be positive", params.name()));
        }
        Ok(Self::new(division_x as u32, division_y as u32))
    }
}

/// Fills `array` with `n` samples jittered over a `sqrt(n) x sqrt(n)` grid.
fn stratified_2d(n: u32, array: &mut Vec<(f32, f32)>, rng: &mut Rng) {
    let division = (n as f32).sqrt() as u32;
    if division * division != n {
        for _ in 0..n {
            array.push(rng.uniform_2d());
        }
        return;
    }
    let division_inv = 1.0 / division as f32;
    for j in 0..division {
        for i in 0..division {
            let x = (i as f32 + rng.uniform_1d()) * division_inv;
            let y = (j as f32 + rng.uniform_1d()) * division_inv;
            array.push((x, y));
        }
    }
}

impl SamplerT for JitteredSampler {
    fn spp(&self) -> u32 {
        self.division_x * self.division_y
    }

    fn round_count(&self, n: u32) -> u32 {
        let root = (n as f32).sqrt().ceil() as u32;
        root * root
    }

    fn request_2d_array(&mut self, n: u32) {
        self.arrays.request(n);
    }

    fn start_pixel(&mut self) {
        self.curr_ind_x = 0;
        self.curr_ind_y = 0;
    }

    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)> {
        if self.curr_ind_y == self.division_y {
            None
        } else {
            let rand_x = (self.curr_ind_x as f32 + rng.uniform_1d()) * self.division_x_inv;
            let rand_y = (self.curr_ind_y as f32 + rng.uniform_1d()) * self.division_y_inv;
            self.curr_ind_x += 1;
            if self.curr_ind_x == self.division_x {
                self.curr_ind_x = 0;
                self.curr_ind_y += 1;
            }
            self.arrays.refill(|n, array| stratified_2d(n, array, rng));
            Some((rand_x, rand_y))
        }
    }

    fn get_2d(&mut self, rng: &mut Rng) -> (f32, f32) {
        rng.uniform_2d()
    }

    fn get_2d_array(&mut self, n: u32) -> Option<&[(f32, f32)]> {
        self.arrays.next(n)
    }
}

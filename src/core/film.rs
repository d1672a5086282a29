use std::cell::UnsafeCell;

use image::{Rgb, RgbImage};

use crate::core::color::Color;

#[derive(Copy, Clone)]
struct SampleData {
    offset: (f32, f32),
    color: Color,
}

/// Box reconstruction filter. Every sample within `radius` pixels of a pixel
/// centre, on both axes, counts with the same weight.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxFilter {
    radius: f32,
}

impl BoxFilter {
    pub const DEFAULT_RADIUS: f32 = 0.5;

    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Neighbouring pixels whose samples can fall inside the box.
    fn reach(&self) -> i32 {
        (self.radius - 0.5).ceil().max(0.0) as i32
    }

    fn covers(&self, x: f32, y: f32) -> bool {
        x.abs() <= self.radius && y.abs() <= self.radius
    }
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

pub struct Film {
    width: u32,
    height: u32,
    data: Vec<Vec<SampleData>>,
}

/// Pixel window `[x0, x1) x [y0, y1)` that a render is restricted to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl PixelBounds {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            x1: width,
            y0: 0,
            y1: height,
        }
    }

    pub fn intersect(&self, other: &PixelBounds) -> PixelBounds {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        PixelBounds {
            x0,
            x1: self.x1.min(other.x1).max(x0),
            y0,
            y1: self.y1.min(other.y1).max(y0),
        }
    }

    pub fn area(&self) -> u32 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![vec![]; (width * height) as usize];
        Self {
            width,
            height,
            data,
        }
    }

    pub fn add_sample(&mut self, x: u32, y: u32, offset: (f32, f32), color: Color) {
        let data = SampleData { offset, color };
        let index = self.index_of(x, y);
        self.data[index].push(data);
    }

    pub fn filter_to_image(&self, filter: &BoxFilter) -> RgbImage {
        let mut image: RgbImage = RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let filtered = self.filter_pixel(x, y, filter);
                image.put_pixel(x, y, color_to_rgb(filtered));
            }
        }
        image
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    fn filter_pixel(&self, x: u32, y: u32, filter: &BoxFilter) -> Color {
        let reach = filter.reach();

        let mut color = Color::BLACK;
        let mut count = 0;
        for j in -reach..=reach {
            let py = y as i32 + j;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for i in -reach..=reach {
                let px = x as i32 + i;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                let samples = &self.data[self.index_of(px as u32, py as u32)];
                for sample in samples {
                    if filter.covers(i as f32 + sample.offset.0, j as f32 + sample.offset.1) {
                        color += sample.color;
                        count += 1;
                    }
                }
            }
        }
        if count > 0 {
            color / count as f32
        } else {
            Color::BLACK
        }
    }
}

/// Film shared by render threads that write disjoint rows.
#[derive(Clone, Copy)]
pub struct UnsafeFilm<'a> {
    film: &'a UnsafeCell<Film>,
}

unsafe impl Send for UnsafeFilm<'_> {}
unsafe impl Sync for UnsafeFilm<'_> {}

impl<'a> UnsafeFilm<'a> {
    pub fn new(film: &'a UnsafeCell<Film>) -> Self {
        Self { film }
    }

    /// # Safety
    /// No two threads may write the same pixel concurrently.
    pub unsafe fn add_sample(&self, x: u32, y: u32, offset: (f32, f32), color: Color) {
        let film = &mut *self.film.get();
        film.add_sample(x, y, offset, color);
    }
}

fn color_to_rgb(color: Color) -> Rgb<u8> {
    let r = (color.r * 255.0).clamp(0.0, 255.0) as u8;
    let g = (color.g * 255.0).clamp(0.0, 255.0) as u8;
    let b = (color.b * 255.0).clamp(0.0, 255.0) as u8;
    Rgb([r, g, b])
}

// Trail field - the shared 2D intensity grid agents sense and deposit into

use rayon::prelude::*;

/// Intensity written by a deposit (pure white in the rendered view).
pub const MAX_TRAIL: f32 = 255.0;

/// Wrap a coordinate into `[0, max)` - the field topology is a torus.
#[inline]
pub fn wrap(v: f32, max: f32) -> f32 {
    ((v % max) + max) % max
}

// Dense row-major intensity grid with toroidal addressing. The scratch
// buffer backs the separable blur pass (double buffer, never exposed).
pub struct TrailField {
    width: usize,
    height: usize,
    cells: Vec<f32>,
    scratch: Vec<f32>,
}

impl TrailField {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "field dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
            scratch: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw intensities, row-major. Rendering reads the field through this;
    /// the field itself is the source of truth, not the drawn pixels.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Intensity at a real-valued position: wrap both axes, then
    /// floor-truncate to the containing cell. Pure read.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = wrap(x, self.width as f32).floor() as usize;
        let yi = wrap(y, self.height as f32).floor() as usize;
        self.cells[yi * self.width + xi]
    }

    /// Stamp a filled disk at max intensity around a float position. This is
    /// the only way intensity ever increases.
    pub fn deposit(&mut self, x: f32, y: f32, radius: f32) {
        let w = self.width as isize;
        let h = self.height as isize;
        let cx = wrap(x, self.width as f32).floor() as isize;
        let cy = wrap(y, self.height as f32).floor() as isize;
        let r = radius.ceil() as isize;
        let r2 = radius * radius;

        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 > r2 {
                    continue;
                }
                let px = (cx + dx).rem_euclid(w) as usize;
                let py = (cy + dy).rem_euclid(h) as usize;
                self.cells[py * self.width + px] = MAX_TRAIL;
            }
        }
    }

    /// Per-frame diffusion: a normalized toroidal box blur of `blur_radius`
    /// (two separable passes through the scratch buffer), then multiplicative
    /// decay toward zero. Brighter trails fade proportionally, so old trails
    /// linger - that is the intended look, not an artifact.
    pub fn decay_and_diffuse(&mut self, diffuse_rate: f32, blur_radius: usize) {
        let w = self.width;
        let h = self.height;
        let r = blur_radius as isize;
        let kernel = (2 * blur_radius + 1) as f32;
        let keep = 1.0 - diffuse_rate;

        // Horizontal pass: cells -> scratch
        {
            let cells = &self.cells;
            self.scratch
                .par_chunks_mut(w)
                .enumerate()
                .for_each(|(y, out)| {
                    let row = &cells[y * w..(y + 1) * w];
                    for (x, cell) in out.iter_mut().enumerate() {
                        let mut sum = 0.0;
                        for dx in -r..=r {
                            let sx = (x as isize + dx).rem_euclid(w as isize) as usize;
                            sum += row[sx];
                        }
                        *cell = sum / kernel;
                    }
                });
        }

        // Vertical pass + decay: scratch -> cells
        let scratch = &self.scratch;
        self.cells
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, out)| {
                for (x, cell) in out.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for dy in -r..=r {
                        let sy = (y as isize + dy).rem_euclid(h as isize) as usize;
                        sum += scratch[sy * w + x];
                    }
                    *cell = sum / kernel * keep;
                }
            });
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
        self.scratch.fill(0.0);
    }

    pub fn mean_intensity(&self) -> f32 {
        self.cells.iter().sum::<f32>() / self.cells.len() as f32
    }

    pub fn max_intensity(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range() {
        assert!((wrap(50.0, 100.0) - 50.0).abs() < 1e-6);
        assert!((wrap(150.0, 100.0) - 50.0).abs() < 1e-6);
        assert!((wrap(-10.0, 100.0) - 90.0).abs() < 1e-6);
        assert!((wrap(100.0, 100.0) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn new_field_is_dark() {
        let field = TrailField::new(64, 48);
        assert_eq!(field.max_intensity(), 0.0);
        assert_eq!(field.sample(10.0, 10.0), 0.0);
    }

    #[test]
    fn deposit_is_visible_at_full_intensity() {
        let mut field = TrailField::new(100, 100);
        field.deposit(50.0, 50.0, 1.0);
        assert_eq!(field.sample(50.0, 50.0), MAX_TRAIL);
    }

    #[test]
    fn deposit_wraps_around_edges() {
        let mut field = TrailField::new(100, 100);
        // A disk stamped on the corner spills onto all four corners.
        field.deposit(0.0, 0.0, 1.0);
        assert_eq!(field.sample(0.0, 0.0), MAX_TRAIL);
        assert_eq!(field.sample(99.0, 0.0), MAX_TRAIL);
        assert_eq!(field.sample(0.0, 99.0), MAX_TRAIL);
    }

    #[test]
    fn sample_floor_truncates() {
        let mut field = TrailField::new(100, 100);
        field.deposit(20.0, 20.0, 0.0);
        assert_eq!(field.sample(20.9, 20.9), MAX_TRAIL);
        assert_eq!(field.sample(21.0, 21.0), 0.0);
    }

    #[test]
    fn uniform_field_decays_monotonically_toward_zero() {
        let mut field = TrailField::new(32, 32);
        for x in 0..32 {
            for y in 0..32 {
                field.deposit(x as f32, y as f32, 0.0);
            }
        }
        let mut prev = field.sample(16.0, 16.0);
        for _ in 0..200 {
            field.decay_and_diffuse(0.05, 2);
            let cur = field.sample(16.0, 16.0);
            assert!(cur <= prev);
            prev = cur;
        }
        assert!(prev < 0.01);
    }

    #[test]
    fn max_intensity_never_increases_without_deposits() {
        let mut field = TrailField::new(50, 50);
        field.deposit(25.0, 25.0, 1.0);
        let mut prev = field.max_intensity();
        for _ in 0..50 {
            field.decay_and_diffuse(0.05, 2);
            let cur = field.max_intensity();
            assert!(cur <= prev);
            prev = cur;
        }
    }

    #[test]
    fn blur_spreads_intensity_to_neighbors() {
        let mut field = TrailField::new(50, 50);
        field.deposit(25.0, 25.0, 0.0);
        assert_eq!(field.sample(27.0, 25.0), 0.0);
        field.decay_and_diffuse(0.0, 2);
        assert!(field.sample(27.0, 25.0) > 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut field = TrailField::new(40, 40);
        field.deposit(10.0, 10.0, 2.0);
        field.clear();
        assert_eq!(field.max_intensity(), 0.0);
    }
}

/// Multi-channel 2D odor field on a toroidal grid.
///
/// Data is laid out channel-major: `data[c * W * H + y * W + x]`.
#[derive(Clone, Debug)]
pub struct ChemicalField {
    width: usize,
    height: usize,
    world_width: f64,
    world_height: f64,
    diffusion_rates: Vec<f64>,
    evaporation: f64,
    data: Vec<f64>,
    scratch: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    InvalidGrid,
    InvalidWorldSize,
    NoChannels,
    InvalidDiffusionRate { channel: usize },
    InvalidEvaporation,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGrid => write!(f, "field grid dimensions must be positive"),
            Self::InvalidWorldSize => write!(f, "field world extent must be positive and finite"),
            Self::NoChannels => write!(f, "field must carry at least one channel"),
            Self::InvalidDiffusionRate { channel } => {
                write!(f, "diffusion rate for channel {channel} must be within [0,1]")
            }
            Self::InvalidEvaporation => write!(f, "evaporation must be within [0,1)"),
        }
    }
}

impl std::error::Error for FieldError {}

/// Read-only access to odor concentrations at world coordinates.
pub trait FieldSampler {
    /// Number of channels returned by [`FieldSampler::sample`].
    fn channels(&self) -> usize;

    /// Copy of every channel's concentration at the given world position.
    fn sample(&self, x: f64, y: f64) -> Vec<f64>;
}

impl ChemicalField {
    pub fn new(
        width: usize,
        height: usize,
        world_width: f64,
        world_height: f64,
        diffusion_rates: Vec<f64>,
        evaporation: f64,
    ) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidGrid);
        }
        if !(world_width.is_finite() && world_width > 0.0)
            || !(world_height.is_finite() && world_height > 0.0)
        {
            return Err(FieldError::InvalidWorldSize);
        }
        if diffusion_rates.is_empty() {
            return Err(FieldError::NoChannels);
        }
        if let Some(channel) = diffusion_rates
            .iter()
            .position(|rate| !(rate.is_finite() && (0.0..=1.0).contains(rate)))
        {
            return Err(FieldError::InvalidDiffusionRate { channel });
        }
        if !(evaporation.is_finite() && (0.0..1.0).contains(&evaporation)) {
            return Err(FieldError::InvalidEvaporation);
        }
        let len = diffusion_rates.len() * width * height;
        Ok(Self {
            width,
            height,
            world_width,
            world_height,
            diffusion_rates,
            evaporation,
            data: vec![0.0; len],
            scratch: vec![0.0; len],
        })
    }

    /// Add `amounts` to the cell nearest `(x, y)`. Out-of-range positions clamp to the border.
    ///
    /// `amounts` holds one entry per channel; the length is checked in debug builds
    /// and surplus entries are ignored otherwise. Negative amounts remove odor, but a
    /// cell never drops below zero.
    pub fn deposit(&mut self, x: f64, y: f64, amounts: &[f64]) {
        debug_assert_eq!(
            amounts.len(),
            self.channel_count(),
            "deposit vector must match channel count"
        );
        let (cx, cy) = self.grid_coords(x, y);
        for (c, &amount) in amounts.iter().enumerate().take(self.channel_count()) {
            let idx = self.index(c, cx, cy);
            self.data[idx] = (self.data[idx] + amount).max(0.0);
        }
    }

    /// Diffuse every channel over its Moore neighbourhood, then evaporate.
    ///
    /// `new = evap * ((1 - rate) * old + rate / 8 * neighbour_sum)`
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        let plane = w * h;
        for (c, &rate) in self.diffusion_rates.iter().enumerate() {
            let src = &self.data[c * plane..(c + 1) * plane];
            let dst = &mut self.scratch[c * plane..(c + 1) * plane];
            for y in 0..h {
                let up = (y + h - 1) % h;
                let down = (y + 1) % h;
                for x in 0..w {
                    let left = (x + w - 1) % w;
                    let right = (x + 1) % w;
                    let neighbour_sum = src[up * w + left]
                        + src[up * w + x]
                        + src[up * w + right]
                        + src[y * w + left]
                        + src[y * w + right]
                        + src[down * w + left]
                        + src[down * w + x]
                        + src[down * w + right];
                    let old = src[y * w + x];
                    dst[y * w + x] =
                        self.evaporation * ((1.0 - rate) * old + rate / 8.0 * neighbour_sum);
                }
            }
        }
        std::mem::swap(&mut self.data, &mut self.scratch);
    }

    /// Concentration of one channel at grid cell `(cx, cy)`.
    pub fn cell(&self, channel: usize, cx: usize, cy: usize) -> f64 {
        self.data[self.index(channel, cx, cy)]
    }

    /// Map a world position to its grid cell, clamping to the grid bounds.
    pub fn grid_coords(&self, x: f64, y: f64) -> (usize, usize) {
        (
            scale_clamped(x, self.world_width, self.width),
            scale_clamped(y, self.world_height, self.height),
        )
    }

    pub fn channel_count(&self) -> usize {
        self.diffusion_rates.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Total mass of a single channel.
    pub fn channel_total(&self, channel: usize) -> f64 {
        let plane = self.width * self.height;
        self.data[channel * plane..(channel + 1) * plane].iter().sum()
    }

    /// Total mass per channel.
    pub fn totals(&self) -> Vec<f64> {
        (0..self.channel_count())
            .map(|c| self.channel_total(c))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    fn index(&self, channel: usize, cx: usize, cy: usize) -> usize {
        channel * self.width * self.height + cy * self.width + cx
    }
}

impl FieldSampler for ChemicalField {
    fn channels(&self) -> usize {
        self.channel_count()
    }

    fn sample(&self, x: f64, y: f64) -> Vec<f64> {
        let (cx, cy) = self.grid_coords(x, y);
        (0..self.channel_count())
            .map(|c| self.cell(c, cx, cy))
            .collect()
    }
}

fn scale_clamped(coord: f64, extent: f64, cells: usize) -> usize {
    let scaled = (coord / extent * cells as f64).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(cells - 1)
    }
}

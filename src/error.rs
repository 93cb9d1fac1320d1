use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantizeError {
    #[error("no samples to quantize")]
    EmptyInput,

    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("only {distinct} distinct quantized colors, need more than {max_colors}")]
    InsufficientColors { distinct: usize, max_colors: u32 },

    #[error("significant_bits must be between 1 and 8, got {0}")]
    InvalidSignificantBits(u32),

    #[error("iteration_cap must be at least 1, got {0}")]
    InvalidIterationCap(u32),

    #[error("population_fraction must be in (0, 1], got {0}")]
    InvalidPopulationFraction(f32),

    #[error("sampling quality must be at least 1, got {0}")]
    InvalidQuality(usize),
}

impl QuantizeError {
    /// Every variant describes input the caller must fix; nothing is retried.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::EmptyInput
            | Self::InvalidMaxColors(_)
            | Self::InsufficientColors { .. }
            | Self::InvalidSignificantBits(_)
            | Self::InvalidIterationCap(_)
            | Self::InvalidPopulationFraction(_)
            | Self::InvalidQuality(_) => true,
        }
    }
}

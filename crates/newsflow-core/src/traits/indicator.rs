//! Indicator trait definitions.

/// Trait for technical indicators over a price slice.
///
/// Implementations in this workspace use a minimum period of one: the output
/// has exactly one value per input value, with early values computed over
/// whatever history is available.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically gap-free closes)
    ///
    /// # Returns
    /// A vector the same length as `data`
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Multi-output indicator (e.g., MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

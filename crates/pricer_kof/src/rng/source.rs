//! The normal-variate capability consumed by path generation.

/// A source of standard normal variates (mean 0, standard deviation 1).
///
/// Path generation draws exactly one value per (path, step) pair through this
/// trait, so any implementor (seeded, entropy-seeded, or a scripted sequence
/// in tests) can drive the same simulation body.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::rng::NormalSource;
///
/// /// Replays a fixed sequence, wrapping around at the end.
/// struct Scripted {
///     values: Vec<f64>,
///     cursor: usize,
/// }
///
/// impl NormalSource for Scripted {
///     fn next_normal(&mut self) -> f64 {
///         let z = self.values[self.cursor % self.values.len()];
///         self.cursor += 1;
///         z
///     }
/// }
///
/// let mut source = Scripted { values: vec![0.5, -0.5], cursor: 0 };
/// assert_eq!(source.next_normal(), 0.5);
/// assert_eq!(source.next_normal(), -0.5);
/// ```
pub trait NormalSource {
    /// Returns the next standard normal variate.
    fn next_normal(&mut self) -> f64;
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}

use rand::Rng;

/// Declared accuracy values. These are fixed approximations, not measured
/// extraction quality.
pub mod accuracy_bands {
    /// Lower bound of the synthesized AI accuracy.
    pub const AI_MIN: f64 = 85.0;

    /// Upper bound of the synthesized AI accuracy.
    pub const AI_MAX: f64 = 95.0;
}

pub const HEURISTIC_ACCURACY: f64 = 75.0;

pub const ERROR_FALLBACK_ACCURACY: f64 = 0.0;

/// Accuracy assigned to a valid AI-structured table: uniform in
/// `[AI_MIN, AI_MAX]`.
pub fn synthesized_ai_accuracy() -> f64 {
    rand::thread_rng().gen_range(accuracy_bands::AI_MIN..=accuracy_bands::AI_MAX)
}

/// Force an accuracy into `[0, 100]`. NaN becomes 0.
pub fn clamp_accuracy(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

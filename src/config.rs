// Evaluator configuration
//
// Loaded from TOML (perflogic.toml) or built in code. Every component receives
// the configuration explicitly; there is no process-wide settings object.
//
// # Example TOML
//
// ```toml
// confidence = 0.95
// equality_interval = 0.05
// primary_test = "t_test"
// graphs = ["histogram"]
//
// [t_test]
// clip = { kind = "sigma", multiplier = 3.0, max_iterations = 10 }
//
// [kolmogorov_smirnov]
// clip = { kind = "quantile", lower = 1.0, upper = 99.0 }
// ```

use crate::clip::{quantile_clip, sigma_clip};
use crate::statistics::TestKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which data view a test reads
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipMode {
    /// Raw (lambda-scaled) samples
    #[default]
    None,
    /// Iterative sigma clipping
    Sigma {
        multiplier: f64,
        max_iterations: usize,
    },
    /// Percentile trimming, bounds in [0, 100]
    Quantile { lower: f64, upper: f64 },
}

impl ClipMode {
    /// Apply this clip to `samples`, returning a new vector
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        match *self {
            ClipMode::None => samples.to_vec(),
            ClipMode::Sigma {
                multiplier,
                max_iterations,
            } => sigma_clip(samples, multiplier, max_iterations),
            ClipMode::Quantile { lower, upper } => quantile_clip(samples, lower, upper),
        }
    }

    fn validate(&self, test: TestKind) -> Result<(), String> {
        match *self {
            ClipMode::None => Ok(()),
            ClipMode::Sigma { multiplier, .. } => {
                if multiplier.is_finite() && multiplier > 0.0 {
                    Ok(())
                } else {
                    Err(format!(
                        "{}: sigma multiplier must be positive, got {}",
                        test, multiplier
                    ))
                }
            }
            ClipMode::Quantile { lower, upper } => {
                let in_range = |v: f64| (0.0..=100.0).contains(&v);
                if in_range(lower) && in_range(upper) && lower <= upper {
                    Ok(())
                } else {
                    Err(format!(
                        "{}: quantile bounds must satisfy 0 <= lower <= upper <= 100, got [{}, {}]",
                        test, lower, upper
                    ))
                }
            }
        }
    }
}

/// Per-test settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSettings {
    pub clip: ClipMode,
}

/// Which test decides the verdict propagated through the formula tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryTest {
    #[default]
    TTest,
    MannWhitney,
    KolmogorovSmirnov,
    /// Kleene AND over all three verdicts
    All,
}

/// Graph types requested by renderers
///
/// The engine does not draw anything; any requested graph makes it compute a
/// per-sample summary for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Histogram,
    Density,
    Quantile,
    Timeline,
}

/// Configuration for formula evaluation
///
/// # Example
/// ```
/// use perflogic::config::EvaluatorConfig;
///
/// let config = EvaluatorConfig::default();
/// assert_eq!(config.confidence, 0.95);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Confidence level; a test is significant when p < 1 - confidence
    pub confidence: f64,

    /// Relative tolerance applied to the right operand
    ///
    /// `A <= B` is tested against `B * (1 + equality_interval)`, `A < B`
    /// against `B * (1 - equality_interval)`, and `A = B` holds when A lies
    /// significantly inside that band.
    pub equality_interval: f64,

    /// Test driving the propagated verdict
    pub primary_test: PrimaryTest,

    pub t_test: TestSettings,
    pub mann_whitney: TestSettings,
    pub kolmogorov_smirnov: TestSettings,

    /// Graphs requested by renderers
    pub graphs: Vec<GraphType>,

    /// Worker threads for `Evaluator::run`; 1 evaluates sequentially
    pub parallelism: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            equality_interval: 0.05,
            primary_test: PrimaryTest::TTest,
            t_test: TestSettings {
                clip: ClipMode::Sigma {
                    multiplier: 3.0,
                    max_iterations: 10,
                },
            },
            mann_whitney: TestSettings::default(),
            kolmogorov_smirnov: TestSettings::default(),
            graphs: Vec::new(),
            parallelism: 1,
        }
    }
}

impl EvaluatorConfig {
    /// 99% confidence: fewer false verdicts, more inconclusive ones
    pub fn strict() -> Self {
        Self {
            confidence: 0.99,
            equality_interval: 0.02,
            ..Self::default()
        }
    }

    /// 90% confidence: decides more comparisons on small samples
    pub fn lenient() -> Self {
        Self {
            confidence: 0.90,
            equality_interval: 0.10,
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EvaluatorConfig =
            toml::from_str(content).context("Failed to parse evaluator configuration")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Significance level derived from the confidence
    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence
    }

    /// Settings of one test
    pub fn settings(&self, test: TestKind) -> &TestSettings {
        match test {
            TestKind::TTest => &self.t_test,
            TestKind::MannWhitney => &self.mann_whitney,
            TestKind::KolmogorovSmirnov => &self.kolmogorov_smirnov,
        }
    }

    /// True when renderers asked for graphs and need sample summaries
    pub fn wants_summaries(&self) -> bool {
        !self.graphs.is_empty()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            ));
        }

        if !(self.equality_interval.is_finite() && self.equality_interval >= 0.0) {
            return Err(format!(
                "equality_interval must be non-negative, got {}",
                self.equality_interval
            ));
        }

        if self.parallelism == 0 {
            return Err("parallelism must be >= 1".to_string());
        }

        for test in TestKind::ALL {
            self.settings(test).clip.validate(test)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.equality_interval, 0.05);
        assert_eq!(config.primary_test, PrimaryTest::TTest);
        assert!(!config.wants_summaries());
        assert!(config.validate().is_ok());
        assert!((config.alpha() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_presets() {
        assert_eq!(EvaluatorConfig::strict().confidence, 0.99);
        assert_eq!(EvaluatorConfig::lenient().confidence, 0.90);
        assert!(EvaluatorConfig::strict().validate().is_ok());
        assert!(EvaluatorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            confidence = 0.9
            primary_test = "all"
            graphs = ["histogram", "density"]
            parallelism = 4

            [mann_whitney]
            clip = { kind = "quantile", lower = 5.0, upper = 95.0 }
        "#;

        let config = EvaluatorConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.confidence, 0.9);
        assert_eq!(config.primary_test, PrimaryTest::All);
        assert_eq!(config.parallelism, 4);
        assert!(config.wants_summaries());
        assert_eq!(
            config.mann_whitney.clip,
            ClipMode::Quantile {
                lower: 5.0,
                upper: 95.0
            }
        );
        // Untouched sections keep their defaults
        assert_eq!(config.t_test, EvaluatorConfig::default().t_test);
        assert_eq!(config.equality_interval, 0.05);
    }

    #[test]
    fn test_invalid_confidence() {
        assert!(EvaluatorConfig::from_toml_str("confidence = 1.5").is_err());
        assert!(EvaluatorConfig::from_toml_str("confidence = 1.0").is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_equality_interval() {
        let mut config = EvaluatorConfig::default();
        config.equality_interval = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_clip() {
        let mut config = EvaluatorConfig::default();
        config.kolmogorov_smirnov.clip = ClipMode::Quantile {
            lower: 60.0,
            upper: 40.0,
        };
        assert!(config.validate().is_err());

        config.kolmogorov_smirnov.clip = ClipMode::Sigma {
            multiplier: 0.0,
            max_iterations: 3,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_parallelism() {
        let mut config = EvaluatorConfig::default();
        config.parallelism = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clip_mode_apply() {
        let data = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(ClipMode::None.apply(&data), data.to_vec());
        let clipped = ClipMode::Quantile {
            lower: 0.0,
            upper: 80.0,
        }
        .apply(&data);
        assert_eq!(clipped, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(EvaluatorConfig::from_file("/nonexistent/perflogic.toml").is_err());
    }
}

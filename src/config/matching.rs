//! Driver matching configuration

use serde::{Deserialize, Serialize};

/// Weights for scoring driver candidates. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub distance: f64,
    pub rating: f64,
    pub performance: f64,
    pub customer_preference: f64,
    pub service_expertise: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            distance: 0.40,
            rating: 0.25,
            performance: 0.20,
            customer_preference: 0.10,
            service_expertise: 0.05,
        }
    }
}

impl MatchWeights {
    const TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.distance
            + self.rating
            + self.performance
            + self.customer_preference
            + self.service_expertise
    }

    /// Validate that weights are non-negative and sum to 1.0
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.distance,
            self.rating,
            self.performance,
            self.customer_preference,
            self.service_expertise,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("Match weights must be finite and non-negative".to_string());
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > Self::TOLERANCE {
            Err(format!("Match weights must sum to 1.0, got {:.4}", sum))
        } else {
            Ok(())
        }
    }
}

/// Sub-weights blended into the performance component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceWeights {
    pub on_time: f64,
    pub satisfaction: f64,
    pub completion: f64,
    pub response_time: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            on_time: 0.4,
            satisfaction: 0.3,
            completion: 0.2,
            response_time: 0.1,
        }
    }
}

/// Driver matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: MatchWeights,
    pub performance_weights: PerformanceWeights,
    /// Distance at which the distance score reaches zero
    pub distance_horizon_km: f64,
    /// Response time that scores zero in the performance blend
    pub response_ceiling_minutes: f64,
    /// Free-flow average speed for ETA estimates
    pub base_speed_kmh: f64,
    /// Fraction of speed lost at congestion level 100
    pub max_congestion_slowdown: f64,
    /// Drivers responding slower than this get the ETA penalty
    pub slow_response_threshold_minutes: f64,
    pub slow_responder_penalty: f64,
    /// Confidence reported for nearest-driver fallback decisions
    pub fallback_confidence: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            performance_weights: PerformanceWeights::default(),
            distance_horizon_km: 20.0,
            response_ceiling_minutes: 10.0,
            base_speed_kmh: 30.0,
            max_congestion_slowdown: 0.5,
            slow_response_threshold_minutes: 5.0,
            slow_responder_penalty: 1.2,
            fallback_confidence: 0.5,
        }
    }
}

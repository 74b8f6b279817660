//! Ranking strategies, one per [`Priority`]. Lower scores rank first.

use crate::catalog::ModelDescriptor;
use crate::selector::types::Priority;

pub trait RankingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, model: &ModelDescriptor) -> f64;
}

/// Cheapest input price first.
pub struct CostStrategy;

impl RankingStrategy for CostStrategy {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn score(&self, model: &ModelDescriptor) -> f64 {
        model.input_cost_per_million
    }
}

/// Fastest speed tier first.
pub struct SpeedStrategy;

impl RankingStrategy for SpeedStrategy {
    fn name(&self) -> &'static str {
        "speed"
    }

    fn score(&self, model: &ModelDescriptor) -> f64 {
        f64::from(model.speed_tier.rank())
    }
}

/// Best quality tier first. Price is not consulted.
pub struct QualityStrategy;

impl RankingStrategy for QualityStrategy {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn score(&self, model: &ModelDescriptor) -> f64 {
        f64::from(model.quality_tier.rank())
    }
}

/// Weighted blend: 40% cost, 30% speed, 30% quality.
pub struct BalancedStrategy;

impl BalancedStrategy {
    pub const COST_WEIGHT: f64 = 0.4;
    pub const SPEED_WEIGHT: f64 = 0.3;
    pub const QUALITY_WEIGHT: f64 = 0.3;

    /// Input cost at or above this many USD per million scores as 1.0.
    pub const COST_CEILING: f64 = 10.0;
}

impl RankingStrategy for BalancedStrategy {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn score(&self, model: &ModelDescriptor) -> f64 {
        let cost = (model.input_cost_per_million / Self::COST_CEILING).clamp(0.0, 1.0);
        Self::COST_WEIGHT * cost
            + Self::SPEED_WEIGHT * model.speed_tier.penalty()
            + Self::QUALITY_WEIGHT * model.quality_tier.penalty()
    }
}

impl Priority {
    pub fn strategy(&self) -> &'static dyn RankingStrategy {
        match self {
            Priority::Cost => &CostStrategy,
            Priority::Speed => &SpeedStrategy,
            Priority::Quality => &QualityStrategy,
            Priority::Balanced => &BalancedStrategy,
        }
    }
}

/// Stable sort by score; ties keep their incoming (catalog) order.
pub fn rank<'a>(
    candidates: impl IntoIterator<Item = &'a ModelDescriptor>,
    strategy: &dyn RankingStrategy,
) -> Vec<&'a ModelDescriptor> {
    let mut scored: Vec<(f64, &ModelDescriptor)> = candidates
        .into_iter()
        .map(|m| (strategy.score(m), m))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Provider, QualityTier, SpeedTier};

    fn model(id: &str, cost: f64, speed: SpeedTier, quality: QualityTier) -> ModelDescriptor {
        ModelDescriptor::new(Provider::OpenAi, id)
            .with_costs(cost, cost)
            .with_tiers(speed, quality)
    }

    #[test]
    fn test_cost_strategy_scores_input_price() {
        let m = model("a", 0.14, SpeedTier::Fast, QualityTier::High);
        assert_eq!(CostStrategy.score(&m), 0.14);
    }

    #[test]
    fn test_speed_strategy_uses_tier_rank() {
        let fast = model("a", 5.0, SpeedTier::UltraFast, QualityTier::Good);
        let slow = model("b", 0.0, SpeedTier::Slow, QualityTier::Good);
        assert!(SpeedStrategy.score(&fast) < SpeedStrategy.score(&slow));
    }

    #[test]
    fn test_quality_strategy_ignores_price() {
        let cheap_excellent = model("a", 0.1, SpeedTier::Slow, QualityTier::Excellent);
        let pricey_good = model("b", 50.0, SpeedTier::Fast, QualityTier::Good);
        assert!(QualityStrategy.score(&cheap_excellent) < QualityStrategy.score(&pricey_good));
    }

    #[test]
    fn test_balanced_strategy_formula() {
        let m = model("a", 2.5, SpeedTier::Fast, QualityTier::High);
        let expected = 0.4 * 0.25 + 0.3 * 0.25 + 0.3 * 0.25;
        assert!((BalancedStrategy.score(&m) - expected).abs() < 1e-12);

        // Cost saturates at the ceiling
        let opus = model("b", 15.0, SpeedTier::Medium, QualityTier::Excellent);
        assert!((BalancedStrategy.score(&opus) - (0.4 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let a = model("a", 1.0, SpeedTier::Fast, QualityTier::High);
        let b = model("b", 0.5, SpeedTier::Fast, QualityTier::High);
        let c = model("c", 0.2, SpeedTier::Fast, QualityTier::High);

        let ranked = rank([&a, &b, &c], &SpeedStrategy);
        let ids: Vec<_> = ranked.iter().map(|m| m.model_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let ranked = rank([&a, &b, &c], Priority::Cost.strategy());
        let ids: Vec<_> = ranked.iter().map(|m| m.model_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_priority_strategy_lookup() {
        for priority in [
            Priority::Cost,
            Priority::Speed,
            Priority::Quality,
            Priority::Balanced,
        ] {
            assert_eq!(priority.strategy().name(), priority.as_str());
        }
    }
}

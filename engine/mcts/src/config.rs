//! MCTS configuration parameters.

use std::time::Duration;

use crate::policy::TemperatureSchedule;
use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of terminal playouts per search.
    /// Playouts that stop at a freshly expanded leaf do not count.
    pub num_simulations: u32,

    /// Exploration constant for the UCT formula (c_puct in AlphaZero).
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Temperature for turning visit counts into move probabilities.
    /// 1.0 = proportional to visit counts
    /// 0.0 = always the most-visited move (argmax)
    /// AlphaZero uses 1.0 for the first 30 moves, then 0.0
    pub temperature: TemperatureSchedule,

    /// Memoise oracle outputs by position key.
    pub eval_cache: bool,

    /// Wall-clock limit per search, on top of the playout budget.
    pub max_search_time: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 50,
            c_puct: 1.0,
            temperature: TemperatureSchedule::constant(1.0),
            eval_cache: true,
            max_search_time: None,
        }
    }
}

impl MctsConfig {
    /// Create config for self-play training (exploratory opening moves).
    pub fn for_training() -> Self {
        Self {
            num_simulations: 200,
            temperature: TemperatureSchedule::new(1.0, 30),
            ..Self::default()
        }
    }

    /// Create config for evaluation/inference (greedy selection).
    pub fn for_evaluation() -> Self {
        Self {
            num_simulations: 200,
            temperature: TemperatureSchedule::constant(0.0),
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            temperature: TemperatureSchedule::constant(0.0),
            ..Self::default()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set a constant temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = TemperatureSchedule::constant(t);
        self
    }

    /// Builder pattern: set the temperature schedule.
    pub fn with_temperature_schedule(mut self, schedule: TemperatureSchedule) -> Self {
        self.temperature = schedule;
        self
    }

    /// Builder pattern: enable or disable the evaluation cache.
    pub fn with_eval_cache(mut self, enabled: bool) -> Self {
        self.eval_cache = enabled;
        self
    }

    /// Builder pattern: set a wall-clock limit per search.
    pub fn with_max_search_time(mut self, limit: Duration) -> Self {
        self.max_search_time = Some(limit);
        self
    }

    /// Reject settings the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "c_puct must be finite and non-negative, got {}",
                self.c_puct
            )));
        }
        let t = self.temperature.initial;
        if !t.is_finite() || t < 0.0 {
            return Err(SearchError::InvalidTemperature(t));
        }
        Ok(())
    }
}

impl From<&engine_config::MctsConfig> for MctsConfig {
    fn from(config: &engine_config::MctsConfig) -> Self {
        Self {
            num_simulations: config.num_simulations,
            c_puct: config.c_puct as f32,
            temperature: TemperatureSchedule::new(
                config.temperature as f32,
                config.temp_threshold,
            ),
            eval_cache: config.eval_cache,
            // 0 means no limit
            max_search_time: (config.max_search_millis > 0)
                .then(|| Duration::from_millis(config.max_search_millis)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 50);
        assert!((config.c_puct - 1.0).abs() < 1e-6);
        assert!(config.eval_cache);
        assert!(config.max_search_time.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_c_puct(2.0)
            .with_temperature(0.5)
            .with_eval_cache(false);

        assert_eq!(config.num_simulations, 100);
        assert!((config.c_puct - 2.0).abs() < 1e-6);
        assert!((config.temperature.temperature_for_move(99) - 0.5).abs() < 1e-6);
        assert!(!config.eval_cache);
    }

    #[test]
    fn test_presets() {
        let eval = MctsConfig::for_evaluation();
        assert_eq!(eval.temperature.temperature_for_move(0), 0.0);

        let train = MctsConfig::for_training();
        assert!((train.temperature.temperature_for_move(0) - 1.0).abs() < 1e-6);
        assert_eq!(train.temperature.temperature_for_move(30), 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = MctsConfig::default().with_c_puct(-0.1);
        assert!(matches!(
            negative.validate(),
            Err(SearchError::InvalidConfig(_))
        ));

        let nan = MctsConfig::default().with_c_puct(f32::NAN);
        assert!(nan.validate().is_err());

        let cold = MctsConfig::default().with_temperature(-1.0);
        assert!(matches!(
            cold.validate(),
            Err(SearchError::InvalidTemperature(_))
        ));

        // Pure exploitation is allowed
        assert!(MctsConfig::default().with_c_puct(0.0).validate().is_ok());
    }

    #[test]
    fn test_from_central_config() {
        let central = engine_config::MctsConfig {
            num_simulations: 400,
            c_puct: 1.5,
            temperature: 1.0,
            temp_threshold: 8,
            eval_cache: false,
            max_search_millis: 250,
        };
        let config = MctsConfig::from(&central);

        assert_eq!(config.num_simulations, 400);
        assert!((config.c_puct - 1.5).abs() < 1e-6);
        assert_eq!(config.temperature, TemperatureSchedule::new(1.0, 8));
        assert!(!config.eval_cache);
        assert_eq!(config.max_search_time, Some(Duration::from_millis(250)));

        let unlimited = engine_config::MctsConfig {
            max_search_millis: 0,
            ..central
        };
        assert!(MctsConfig::from(&unlimited).max_search_time.is_none());
    }
}

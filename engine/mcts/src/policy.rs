//! Turning root visit counts into move probabilities, and sampling from them.

use engine_core::Action;
use rand::Rng;

use crate::search::SearchError;

/// Offset keeping `ln(visits)` finite for unvisited actions.
pub const VISIT_EPSILON: f64 = 1e-8;

/// Convert visit counts into a probability distribution.
///
/// - `temperature == 0`: one-hot on the most visited action, ties going to
///   the lowest index.
/// - `temperature > 0`: `p_i ∝ visits_i^(1/T)`, computed as a softmax over
///   `(1/T) * ln(visits_i + ε)` with the maximum subtracted first.
///
/// When any action has visits, unvisited actions get exactly zero; without
/// the mask, ε would leak noticeable mass to them at high temperatures. If
/// nothing has been visited the result is uniform.
pub fn visits_to_policy(visits: &[u32], temperature: f32) -> Result<Vec<f32>, SearchError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(SearchError::InvalidTemperature(temperature));
    }

    let mut policy = vec![0.0; visits.len()];
    if visits.is_empty() {
        return Ok(policy);
    }

    if temperature == 0.0 {
        // Greedy: all mass on best action, lower index wins ties
        let mut best = 0;
        for (i, &v) in visits.iter().enumerate() {
            if v > visits[best] {
                best = i;
            }
        }
        policy[best] = 1.0;
        return Ok(policy);
    }

    let any_visited = visits.iter().any(|&v| v > 0);
    let inv_t = 1.0 / temperature as f64;
    let logits: Vec<f64> = visits
        .iter()
        .map(|&v| inv_t * (v as f64 + VISIT_EPSILON).ln())
        .collect();
    let max_logit = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let weights: Vec<f64> = visits
        .iter()
        .zip(logits.iter())
        .map(|(&v, &logit)| {
            if any_visited && v == 0 {
                0.0
            } else {
                (logit - max_logit).exp()
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    for (p, w) in policy.iter_mut().zip(weights.iter()) {
        *p = (w / total) as f32;
    }
    Ok(policy)
}

/// Temperature annealing over the course of a game.
///
/// The initial temperature applies to the first `threshold` moves, after
/// which play becomes greedy. A threshold of 0 keeps the initial temperature
/// for the whole game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    pub initial: f32,
    pub threshold: u32,
}

impl TemperatureSchedule {
    pub fn new(initial: f32, threshold: u32) -> Self {
        Self { initial, threshold }
    }

    /// Constant temperature for every move.
    pub fn constant(temperature: f32) -> Self {
        Self::new(temperature, 0)
    }

    /// Temperature for the move with 0-based index `move_number`.
    pub fn temperature_for_move(&self, move_number: u32) -> f32 {
        if self.threshold == 0 || move_number < self.threshold {
            self.initial
        } else {
            0.0
        }
    }
}

impl Default for TemperatureSchedule {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

/// Sample an action from a probability distribution.
pub fn sample_action<G: Rng>(policy: &[f32], rng: &mut G) -> Result<Action, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i);
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    policy
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or(SearchError::EmptyPolicy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn assert_distribution(policy: &[f32]) {
        let sum: f32 = policy.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum was {sum}");
        assert!(policy.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_greedy_one_hot_lowest_index_on_tie() {
        let policy = visits_to_policy(&[3, 7, 0, 7], 0.0).unwrap();
        assert_eq!(policy, vec![0.0, 1.0, 0.0, 0.0]);

        // Same input, same answer
        assert_eq!(policy, visits_to_policy(&[3, 7, 0, 7], 0.0).unwrap());
    }

    #[test]
    fn test_temperature_one_is_proportional() {
        let policy = visits_to_policy(&[30, 70, 0], 1.0).unwrap();
        assert_distribution(&policy);
        assert!((policy[0] - 0.3).abs() < 1e-5);
        assert!((policy[1] - 0.7).abs() < 1e-5);
        assert_eq!(policy[2], 0.0);
    }

    #[test]
    fn test_low_temperature_approaches_greedy() {
        let visits = [10, 12, 3];
        let warm = visits_to_policy(&visits, 1.0).unwrap();
        let cool = visits_to_policy(&visits, 0.1).unwrap();
        let cold = visits_to_policy(&visits, 0.01).unwrap();

        assert!(warm[1] < cool[1]);
        assert!(cool[1] < cold[1]);
        assert!(cold[1] > 0.999);
        assert_distribution(&cold);
    }

    #[test]
    fn test_high_temperature_flattens_but_masks_unvisited() {
        let policy = visits_to_policy(&[1, 100, 0, 0], 50.0).unwrap();
        assert_distribution(&policy);
        assert!(policy[0] > 0.4);
        assert_eq!(policy[2], 0.0);
        assert_eq!(policy[3], 0.0);
    }

    #[test]
    fn test_no_visits_is_uniform() {
        let policy = visits_to_policy(&[0, 0, 0, 0], 1.0).unwrap();
        for p in &policy {
            assert!((p - 0.25).abs() < 1e-6);
        }
        assert_eq!(visits_to_policy(&[0, 0, 0], 0.0).unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_temperature() {
        assert!(matches!(
            visits_to_policy(&[1, 2], -1.0),
            Err(SearchError::InvalidTemperature(_))
        ));
        assert!(visits_to_policy(&[1, 2], f32::NAN).is_err());
    }

    #[test]
    fn test_temperature_schedule() {
        let schedule = TemperatureSchedule::new(1.0, 2);
        assert!((schedule.temperature_for_move(0) - 1.0).abs() < 1e-6);
        assert!((schedule.temperature_for_move(1) - 1.0).abs() < 1e-6);
        assert_eq!(schedule.temperature_for_move(2), 0.0);
        assert_eq!(schedule.temperature_for_move(40), 0.0);

        let constant = TemperatureSchedule::constant(0.5);
        assert!((constant.temperature_for_move(1000) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_action() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let policy = vec![0.0, 0.5, 0.3, 0.2, 0.0];

        let mut counts = [0u32; 5];
        for _ in 0..1000 {
            let action = sample_action(&policy, &mut rng).unwrap();
            counts[action] += 1;
        }

        // Action 0 and 4 should never be selected
        assert_eq!(counts[0], 0);
        assert_eq!(counts[4], 0);

        // Action 1 should be most common (~500), action 2 (~300), action 3 (~200)
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);
    }

    #[test]
    fn test_sample_action_empty_policy() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(
            sample_action(&[0.0, 0.0], &mut rng),
            Err(SearchError::EmptyPolicy)
        ));
    }
}

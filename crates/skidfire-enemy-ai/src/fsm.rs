//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions from the distance to the
//! target. No ECS or navigation dependency; operates on plain data.

use skidfire_core::config::EnemyConfig;
use skidfire_core::constants::ATTACK_EXIT_MARGIN;
use skidfire_core::enums::EnemyState;

/// Distance thresholds driving the FSM.
///
/// Ordered `attack < detection <= lose`. Entering Follow needs the smaller
/// detection range, leaving it needs the larger lose range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementRanges {
    pub attack: f64,
    pub detection: f64,
    pub lose: f64,
}

impl From<&EnemyConfig> for EngagementRanges {
    fn from(config: &EnemyConfig) -> Self {
        Self {
            attack: config.attack_range,
            detection: config.player_detection_range,
            lose: config.lose_player_range,
        }
    }
}

impl EngagementRanges {
    /// Distance past which an attacking enemy goes back to following.
    pub fn attack_exit(&self) -> f64 {
        self.attack * ATTACK_EXIT_MARGIN
    }
}

/// Input to the FSM for a single enemy.
pub struct EnemyContext {
    pub state: EnemyState,
    /// Distance to the target, `None` when there is no target.
    pub distance_to_target: Option<f64>,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyUpdate {
    pub new_state: EnemyState,
    pub state_changed: bool,
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &EnemyContext, ranges: &EngagementRanges) -> EnemyUpdate {
    let next = match ctx.distance_to_target {
        // NaN distances are treated as "no target"
        Some(distance) if !distance.is_nan() => match ctx.state {
            EnemyState::Patrol => evaluate_patrol(distance, ranges),
            EnemyState::Follow => evaluate_follow(distance, ranges),
            EnemyState::Attack => evaluate_attack(distance, ranges),
        },
        _ => EnemyState::Patrol,
    };

    EnemyUpdate {
        new_state: next,
        state_changed: next != ctx.state,
    }
}

fn evaluate_patrol(distance: f64, ranges: &EngagementRanges) -> EnemyState {
    if distance <= ranges.attack {
        EnemyState::Attack
    } else if distance <= ranges.detection {
        EnemyState::Follow
    } else {
        EnemyState::Patrol
    }
}

fn evaluate_follow(distance: f64, ranges: &EngagementRanges) -> EnemyState {
    if distance > ranges.lose {
        EnemyState::Patrol
    } else if distance <= ranges.attack {
        EnemyState::Attack
    } else {
        EnemyState::Follow
    }
}

fn evaluate_attack(distance: f64, ranges: &EngagementRanges) -> EnemyState {
    if distance > ranges.lose {
        EnemyState::Patrol
    } else if distance > ranges.attack_exit() {
        EnemyState::Follow
    } else {
        EnemyState::Attack
    }
}

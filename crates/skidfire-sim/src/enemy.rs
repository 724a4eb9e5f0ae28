//! Enemy behaviour: the Patrol/Follow/Attack machine driving a navigation agent.
//!
//! Decisions come from `skidfire_enemy_ai`; this module carries them out on a
//! [`NavigationAgent`], fires through a [`TargetingController`] while
//! attacking, and runs stuck recovery with a one-step deferred agent re-enable.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use skidfire_core::collaborators::{LineOfSight, NavigationAgent};
use skidfire_core::config::EnemyConfig;
use skidfire_core::constants::*;
use skidfire_core::enums::EnemyState;
use skidfire_core::error::ConfigError;
use skidfire_core::events::SimEvent;
use skidfire_core::types::{horizontal, TargetState};
use skidfire_enemy_ai::fsm::{self, EnemyContext, EngagementRanges};
use skidfire_enemy_ai::patrol::pick_patrol_point;
use skidfire_enemy_ai::stuck::StuckDetector;

use crate::scheduler::{Delay, Scheduler};
use crate::targeting::{Shot, TargetingController};

#[derive(Debug, Clone, Copy, PartialEq)]
enum EnemyTimer {
    ReenableAgent,
}

pub struct EnemyBehavior<N: NavigationAgent> {
    enemy_id: u32,
    agent: N,
    state: EnemyState,
    spawn_origin: DVec3,
    config: EnemyConfig,
    ranges: EngagementRanges,
    stuck: StuckDetector,
    scheduler: Scheduler<EnemyTimer>,
    patrol_target: Option<DVec3>,
    weapon: TargetingController,
    rng: ChaCha8Rng,
}

impl<N: NavigationAgent> EnemyBehavior<N> {
    /// The agent's current position becomes the patrol origin.
    pub fn new(
        enemy_id: u32,
        agent: N,
        config: EnemyConfig,
        weapon: TargetingController,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn_origin = agent.position();
        Ok(Self {
            enemy_id,
            agent,
            state: EnemyState::Patrol,
            spawn_origin,
            ranges: EngagementRanges::from(&config),
            config,
            stuck: StuckDetector::default(),
            scheduler: Scheduler::new(),
            patrol_target: None,
            weapon,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Run one fixed step against the current target (if any).
    ///
    /// Returns the shot fired this step, if the attack gates all passed.
    pub fn tick(
        &mut self,
        target: Option<TargetState>,
        now: f64,
        dt: f64,
        line_of_sight: Option<&dyn LineOfSight>,
        events: &mut Vec<SimEvent>,
    ) -> Option<Shot> {
        for due in self.scheduler.advance(dt) {
            match due {
                EnemyTimer::ReenableAgent => {
                    self.agent.set_enabled(true);
                    self.agent.resume();
                    self.reissue_destination(target);
                }
            }
        }

        let position = self.agent.position();
        let ctx = EnemyContext {
            state: self.state,
            distance_to_target: target.map(|t| position.distance(t.position)),
        };
        let update = fsm::evaluate(&ctx, &self.ranges);
        if update.state_changed {
            debug!(
                enemy_id = self.enemy_id,
                from = ?self.state,
                to = ?update.new_state,
                "enemy state changed"
            );
            events.push(SimEvent::EnemyStateChanged {
                enemy_id: self.enemy_id,
                from: self.state,
                to: update.new_state,
            });
            self.enter_state(update.new_state);
        }

        // Recovery in progress: the agent comes back next step.
        if !self.agent.is_enabled() {
            return None;
        }

        let shot = match (self.state, target) {
            (EnemyState::Patrol, _) => {
                self.patrol();
                None
            }
            (EnemyState::Follow, Some(target)) => {
                self.agent.set_destination(target.position);
                None
            }
            (EnemyState::Attack, Some(target)) => self.attack(&target, now, line_of_sight),
            _ => None,
        };

        let moving = self.agent.has_path() && !self.agent.is_stopped();
        if self.stuck.update(self.agent.position(), moving, dt) {
            self.begin_recovery(events);
        }

        shot
    }

    fn enter_state(&mut self, state: EnemyState) {
        self.state = state;
        self.stuck.reset();
        match state {
            EnemyState::Patrol => {
                self.patrol_target = None;
                self.agent.resume();
            }
            EnemyState::Follow => self.agent.resume(),
            EnemyState::Attack => self.agent.stop(),
        }
    }

    fn patrol(&mut self) {
        let arrived = self.patrol_target.is_some()
            && self.agent.remaining_distance() <= PATROL_ARRIVAL_DISTANCE;
        if self.patrol_target.is_some() && self.agent.has_path() && !arrived {
            return;
        }

        let pick = pick_patrol_point(
            &mut self.rng,
            &self.agent,
            self.spawn_origin,
            self.config.patrol_radius,
            PATROL_MAX_ATTEMPTS,
        );
        if pick.fell_back {
            warn!(
                enemy_id = self.enemy_id,
                attempts = pick.attempts,
                "no reachable patrol point, returning to spawn"
            );
        }
        self.patrol_target = if self.agent.set_destination(pick.point) {
            Some(pick.point)
        } else {
            None
        };
    }

    fn attack(
        &mut self,
        target: &TargetState,
        now: f64,
        line_of_sight: Option<&dyn LineOfSight>,
    ) -> Option<Shot> {
        let position = self.agent.position();
        self.agent.stop();
        let facing = horizontal(target.position - position);
        if facing != DVec3::ZERO {
            self.agent.face(facing);
        }

        self.weapon
            .set_muzzle_position(position + DVec3::Y * ENEMY_MUZZLE_HEIGHT);
        let aim_point = self.weapon.aim_at_moving_target(target);
        let line_of_sight = if self.config.require_line_of_sight {
            line_of_sight
        } else {
            None
        };
        self.weapon.try_fire(now, aim_point, None, line_of_sight)
    }

    /// Stop, drop the agent for one step, then reissue navigation.
    fn begin_recovery(&mut self, events: &mut Vec<SimEvent>) {
        info!(
            enemy_id = self.enemy_id,
            state = ?self.state,
            "enemy stuck, resetting path"
        );
        self.agent.stop();
        self.agent.set_enabled(false);
        self.scheduler
            .schedule(EnemyTimer::ReenableAgent, Delay::Steps(1));
        self.stuck.reset();
        events.push(SimEvent::PathReset {
            enemy_id: self.enemy_id,
        });
    }

    fn reissue_destination(&mut self, target: Option<TargetState>) {
        match self.state {
            EnemyState::Patrol => {
                if let Some(point) = self.patrol_target {
                    if !self.agent.set_destination(point) {
                        self.patrol_target = None;
                    }
                }
            }
            EnemyState::Follow => {
                if let Some(target) = target {
                    self.agent.set_destination(target.position);
                }
            }
            EnemyState::Attack => self.agent.stop(),
        }
    }

    pub fn enemy_id(&self) -> u32 {
        self.enemy_id
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn position(&self) -> DVec3 {
        self.agent.position()
    }

    pub fn spawn_origin(&self) -> DVec3 {
        self.spawn_origin
    }

    pub fn patrol_target(&self) -> Option<DVec3> {
        self.patrol_target
    }

    pub fn is_recovering(&self) -> bool {
        self.scheduler.is_pending(EnemyTimer::ReenableAgent)
    }

    pub fn agent(&self) -> &N {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut N {
        &mut self.agent
    }

    pub fn weapon(&self) -> &TargetingController {
        &self.weapon
    }

    pub fn weapon_mut(&mut self) -> &mut TargetingController {
        &mut self.weapon
    }
}

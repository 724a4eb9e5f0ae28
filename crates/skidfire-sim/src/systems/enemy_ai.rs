//! Enemy AI system: runs each enemy's behaviour, then moves its agent.

use hecs::World;

use skidfire_core::collaborators::LineOfSight;
use skidfire_core::components::Enemy;
use skidfire_core::constants::DT;
use skidfire_core::events::SimEvent;
use skidfire_core::types::TargetState;

use crate::targeting::Shot;
use crate::world_setup::ArenaEnemy;

/// Run one step for every enemy. Shots fired are pushed to `shots` for the
/// caller to spawn once the query is released.
pub fn run(
    world: &mut World,
    target: Option<TargetState>,
    now: f64,
    line_of_sight: &dyn LineOfSight,
    events: &mut Vec<SimEvent>,
    shots: &mut Vec<Shot>,
) {
    for (_entity, (_enemy, behavior)) in world.query_mut::<(&Enemy, &mut ArenaEnemy)>() {
        if let Some(shot) = behavior.tick(target, now, DT, Some(line_of_sight), events) {
            shots.push(shot);
        }
        behavior.agent_mut().step(DT);
    }
}

/// Position and velocity of every enemy, keyed by enemy id.
pub fn enemy_targets(world: &World) -> Vec<(u32, TargetState)> {
    let mut query = world.query::<(&Enemy, &ArenaEnemy)>();
    let mut targets: Vec<(u32, TargetState)> = query
        .iter()
        .map(|(_entity, (enemy, behavior))| {
            let agent = behavior.agent();
            (
                enemy.enemy_id,
                TargetState::new(behavior.position(), agent.velocity()),
            )
        })
        .collect();
    targets.sort_by_key(|(id, _)| *id);
    targets
}

//! Simulation constants and tuning parameters.

/// Fixed physics tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravity magnitude (m/s²), applied along -y.
pub const GRAVITY: f64 = 9.81;

/// Conversion from m/s to km/h for the speed readout.
pub const MS_TO_KMH: f64 = 3.6;

// --- Vehicle tunable ranges ---

pub const GRIP_FACTOR_RANGE: (f64, f64) = (0.1, 2.0);
pub const DRIFT_FACTOR_RANGE: (f64, f64) = (0.2, 2.0);
pub const DRIFT_ANGLE_THRESHOLD_RANGE: (f64, f64) = (5.0, 50.0);
pub const TURN_GRIP_FACTOR_RANGE: (f64, f64) = (0.1, 1.0);

// --- Vehicle dynamics ---

/// Reverse torque is weaker than forward torque.
pub const REVERSE_TORQUE_FACTOR: f64 = 0.7;

/// Front wheels get this multiple of the base grip factor.
pub const FRONT_GRIP_MULTIPLIER: f64 = 1.2;

/// Grip to forward-friction stiffness scale.
pub const FORWARD_STIFFNESS_SCALE: f64 = 2.0;

/// Grip to sideways-friction stiffness scale.
pub const SIDEWAYS_STIFFNESS_SCALE: f64 = 1.0;

/// Suspension spring constant (N/m). Stiff on purpose, independent of grip.
pub const SUSPENSION_SPRING: f64 = 50_000.0;

/// Suspension damper constant (N·s/m).
pub const SUSPENSION_DAMPER: f64 = 4_500.0;

/// Suspension travel (m).
pub const SUSPENSION_DISTANCE: f64 = 0.1;

/// |steer| above this counts as turning.
pub const TURN_INPUT_THRESHOLD: f64 = 0.1;

/// |throttle| above this counts as accelerating (battery drain).
pub const ACCELERATE_INPUT_THRESHOLD: f64 = 0.1;

/// Speed (km/h) above which rear grip drops while turning.
pub const TURN_GRIP_MIN_SPEED_KMH: f64 = 30.0;

/// Speed (m/s) below which drift is never reported.
pub const DRIFT_MIN_SPEED: f64 = 5.0;

/// Rigid body linear damping set at initialization.
pub const VEHICLE_LINEAR_DAMPING: f64 = 0.2;

/// Rigid body angular damping set at initialization.
pub const VEHICLE_ANGULAR_DAMPING: f64 = 0.5;

/// Center of mass offset in body space (m).
pub const VEHICLE_CENTER_OF_MASS: [f64; 3] = [0.0, -0.5, 0.1];

// --- Battery ---

/// Default battery capacity (energy units).
pub const BATTERY_CAPACITY: f64 = 100.0;

/// Drain per (m/s · s) while accelerating.
pub const BATTERY_CONSUMPTION_FACTOR: f64 = 0.5;

/// Engine-off velocity decay rate (per second).
pub const ENGINE_OFF_DECELERATION: f64 = 0.5;

/// Charging zone recharge rate (units per second).
pub const CHARGING_RATE: f64 = 10.0;

// --- Weapons ---

/// Energy per unit of projectile speed when the cost is auto-calculated.
pub const ENERGY_COST_PER_SPEED: f64 = 0.01;

/// Energy per unit of projectile size when the cost is auto-calculated.
pub const ENERGY_COST_PER_SIZE: f64 = 0.1;

/// Turret muzzle height above the player chassis origin (m).
pub const PLAYER_MUZZLE_HEIGHT: f64 = 1.2;

/// Projectiles despawn after this many seconds.
pub const PROJECTILE_LIFETIME_SECS: f64 = 5.0;

/// Distance at which a projectile counts as hitting an entity (m), per unit size.
pub const PROJECTILE_HIT_RADIUS: f64 = 1.5;

// --- Enemy AI ---

/// Attack is left once distance exceeds attack range times this margin.
pub const ATTACK_EXIT_MARGIN: f64 = 1.1;

/// Window over which stuck displacement is measured (seconds).
pub const STUCK_WINDOW_SECS: f64 = 1.0;

/// Minimum displacement over one window to count as moving (m).
pub const STUCK_MIN_DISPLACEMENT: f64 = 0.1;

/// Patrol point re-pick attempts before returning to spawn.
pub const PATROL_MAX_ATTEMPTS: u32 = 10;

/// Remaining path distance at which a patrol point counts as reached (m).
pub const PATROL_ARRIVAL_DISTANCE: f64 = 1.0;

/// Enemy muzzle height above the agent position (m).
pub const ENEMY_MUZZLE_HEIGHT: f64 = 1.0;

// --- Arena ---

/// Default arena radius (m).
pub const ARENA_RADIUS: f64 = 150.0;

/// Ground plane height (m).
pub const GROUND_Y: f64 = 0.0;

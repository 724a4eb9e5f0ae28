//! Battery energy store and power-edge monitor.

use skidfire_core::collaborators::EnergySource;
use skidfire_core::config::EnergyConfig;
use skidfire_core::enums::PowerTransition;

/// Rechargeable battery. `level` always stays within `[0, capacity]`.
#[derive(Debug, Clone)]
pub struct Battery {
    capacity: f64,
    level: f64,
    consumption_factor: f64,
}

impl Battery {
    pub fn new(capacity: f64, level: f64, consumption_factor: f64) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            level: level.clamp(0.0, capacity),
            consumption_factor,
        }
    }

    pub fn from_config(config: &EnergyConfig) -> Self {
        Self::new(config.capacity, config.initial, config.consumption_factor)
    }

    /// Drain proportional to speed while accelerating, floored at zero.
    pub fn drain_for_motion(&mut self, speed: f64, dt: f64) {
        let amount = speed.abs() * self.consumption_factor * dt;
        self.drain(amount);
    }

    /// Remove up to `amount`, stopping at empty.
    pub fn drain(&mut self, amount: f64) {
        if amount > 0.0 {
            self.level = (self.level - amount).max(0.0);
        }
    }

    /// Fraction of capacity remaining, for the HUD.
    pub fn fraction(&self) -> f64 {
        if self.capacity > 0.0 {
            self.level / self.capacity
        } else {
            0.0
        }
    }
}

impl EnergySource for Battery {
    fn try_consume(&mut self, amount: f64) -> bool {
        if amount <= 0.0 || self.level < amount {
            return false;
        }
        self.level -= amount;
        true
    }

    fn recharge(&mut self, amount: f64) {
        if amount > 0.0 {
            self.level = (self.level + amount).min(self.capacity);
        }
    }

    fn is_empty(&self) -> bool {
        self.level <= 0.0
    }

    fn level(&self) -> f64 {
        self.level
    }

    fn capacity(&self) -> f64 {
        self.capacity
    }
}

/// Reports empty/non-empty edges of an energy source exactly once each.
#[derive(Debug, Clone, Default)]
pub struct PowerMonitor {
    was_empty: bool,
}

impl PowerMonitor {
    /// Start from the source's current state so no spurious edge is reported.
    pub fn new(source: &dyn EnergySource) -> Self {
        Self {
            was_empty: source.is_empty(),
        }
    }

    pub fn poll(&mut self, source: &dyn EnergySource) -> Option<PowerTransition> {
        let empty = source.is_empty();
        if empty == self.was_empty {
            return None;
        }
        self.was_empty = empty;
        Some(if empty {
            PowerTransition::Lost
        } else {
            PowerTransition::Restored
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_clamped_on_construction() {
        assert_eq!(Battery::new(100.0, 150.0, 0.5).level(), 100.0);
        assert_eq!(Battery::new(100.0, -5.0, 0.5).level(), 0.0);
    }

    #[test]
    fn test_try_consume_requires_enough_energy() {
        let mut battery = Battery::new(10.0, 3.0, 0.5);
        assert!(!battery.try_consume(4.0));
        assert_eq!(battery.level(), 3.0, "refusal has no side effects");
        assert!(battery.try_consume(3.0));
        assert!(battery.is_empty());
        assert!(!battery.try_consume(0.0));
    }

    #[test]
    fn test_recharge_caps_at_capacity() {
        let mut battery = Battery::new(10.0, 9.0, 0.5);
        battery.recharge(5.0);
        assert_eq!(battery.level(), 10.0);
        battery.recharge(-5.0);
        assert_eq!(battery.level(), 10.0);
    }

    #[test]
    fn test_drain_for_motion_floors_at_zero() {
        let mut battery = Battery::new(10.0, 1.0, 0.5);
        // 20 m/s * 0.5 * 1 s = 10 units, more than is left
        battery.drain_for_motion(20.0, 1.0);
        assert_eq!(battery.level(), 0.0);
    }

    #[test]
    fn test_monitor_reports_each_edge_once() {
        let mut battery = Battery::new(10.0, 1.0, 0.5);
        let mut monitor = PowerMonitor::new(&battery);
        assert_eq!(monitor.poll(&battery), None);

        battery.drain(1.0);
        assert_eq!(monitor.poll(&battery), Some(PowerTransition::Lost));
        battery.drain(1.0);
        assert_eq!(monitor.poll(&battery), None);
        assert_eq!(monitor.poll(&battery), None);

        battery.recharge(0.5);
        assert_eq!(monitor.poll(&battery), Some(PowerTransition::Restored));
        battery.recharge(0.5);
        assert_eq!(monitor.poll(&battery), None);
    }

    #[test]
    fn test_monitor_starting_empty_has_no_initial_edge() {
        let battery = Battery::new(10.0, 0.0, 0.5);
        let mut monitor = PowerMonitor::new(&battery);
        assert_eq!(monitor.poll(&battery), None);
    }
}

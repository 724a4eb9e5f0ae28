#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::{DQuat, DVec3};

    use crate::commands::PlayerCommand;
    use crate::config::*;
    use crate::constants::*;
    use crate::error::ConfigError;
    use crate::events::SimEvent;
    use crate::types::*;

    #[test]
    fn test_vehicle_setters_clamp_to_range() {
        let mut config = VehicleConfig::default();

        config.set_grip_factor(5.0);
        assert_eq!(config.grip_factor, 2.0);
        config.set_grip_factor(0.0);
        assert_eq!(config.grip_factor, 0.1);

        config.set_drift_factor(0.05);
        assert_eq!(config.drift_factor, 0.2);
        config.set_drift_factor(3.0);
        assert_eq!(config.drift_factor, 2.0);

        config.set_drift_angle_threshold(1.0);
        assert_eq!(config.drift_angle_threshold, 5.0);
        config.set_drift_angle_threshold(90.0);
        assert_eq!(config.drift_angle_threshold, 50.0);

        config.set_turn_grip_factor(1.5);
        assert_eq!(config.turn_grip_factor, 1.0);
        config.set_turn_grip_factor(-1.0);
        assert_eq!(config.turn_grip_factor, 0.1);
    }

    #[test]
    fn test_vehicle_setters_keep_in_range_values() {
        let mut config = VehicleConfig::default();
        config.set_grip_factor(1.3);
        config.set_turn_grip_factor(0.75);
        assert_eq!(config.grip_factor, 1.3);
        assert_eq!(config.turn_grip_factor, 0.75);
    }

    #[test]
    fn test_vehicle_clamped_fixes_every_tunable() {
        let config = VehicleConfig {
            grip_factor: 9.0,
            drift_factor: 0.0,
            drift_angle_threshold: 0.0,
            turn_grip_factor: f64::NAN,
            ..VehicleConfig::default()
        }
        .clamped();
        assert_eq!(config.grip_factor, GRIP_FACTOR_RANGE.1);
        assert_eq!(config.drift_factor, DRIFT_FACTOR_RANGE.0);
        assert_eq!(config.drift_angle_threshold, DRIFT_ANGLE_THRESHOLD_RANGE.0);
        assert_eq!(config.turn_grip_factor, TURN_GRIP_FACTOR_RANGE.0);
    }

    #[test]
    fn test_vehicle_validate_rejects_bad_forces() {
        let config = VehicleConfig {
            max_motor_force: 0.0,
            ..VehicleConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "max_motor_force",
                value: 0.0
            })
        );

        let config = VehicleConfig {
            max_speed: f64::INFINITY,
            ..VehicleConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(VehicleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_weapon_energy_cost_auto_calc() {
        let weapon = WeaponConfig {
            projectile_speed: 30.0,
            projectile_size: 2.0,
            energy_cost_per_shot: None,
            ..WeaponConfig::default()
        };
        assert_abs_diff_eq!(weapon.energy_cost(), 0.5, epsilon = 1e-12);

        let explicit = WeaponConfig {
            energy_cost_per_shot: Some(4.0),
            ..weapon
        };
        assert_eq!(explicit.energy_cost(), 4.0);

        // Negative explicit cost means "auto", as in legacy presets.
        let legacy = WeaponConfig {
            energy_cost_per_shot: Some(-1.0),
            ..weapon
        };
        assert_abs_diff_eq!(legacy.energy_cost(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_enemy_range_order_enforced() {
        let ok = EnemyConfig {
            attack_range: 5.0,
            player_detection_range: 15.0,
            lose_player_range: 15.0,
            ..EnemyConfig::default()
        };
        assert!(ok.validate().is_ok());

        let inverted = EnemyConfig {
            attack_range: 20.0,
            player_detection_range: 15.0,
            lose_player_range: 30.0,
            ..EnemyConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::RangeOrder { .. })
        ));

        let lose_too_small = EnemyConfig {
            attack_range: 5.0,
            player_detection_range: 15.0,
            lose_player_range: 10.0,
            ..EnemyConfig::default()
        };
        assert!(lose_too_small.validate().is_err());
    }

    #[test]
    fn test_default_arena_config_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_arena_config_json_round_trip() {
        let config = ArenaConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ArenaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_weapon_config_missing_energy_cost_defaults_to_auto() {
        let json = r#"{
            "projectile_speed": 20.0,
            "projectile_size": 1.0,
            "projectile_mass": 1.0,
            "damage": 10,
            "fire_rate": 0.2,
            "auto_fire_distance": 50.0
        }"#;
        let weapon: WeaponConfig = serde_json::from_str(json).unwrap();
        assert_eq!(weapon.energy_cost_per_shot, None);
        assert_abs_diff_eq!(weapon.energy_cost(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_player_command_tagged_json() {
        let cmd = PlayerCommand::SetGripFactor { value: 1.5 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"SetGripFactor\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, PlayerCommand::SetGripFactor { value } if value == 1.5));
    }

    #[test]
    fn test_sim_event_tagged_json() {
        let json = serde_json::to_string(&SimEvent::PathReset { enemy_id: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"PathReset","enemy_id":3}"#);
    }

    #[test]
    fn test_driver_input_clamps_axes() {
        let input = DriverInput::new(2.0, -3.0, true);
        assert_eq!(input.steer, 1.0);
        assert_eq!(input.throttle, -1.0);
        assert!(input.brake);

        let input = DriverInput::new(f64::NAN, 0.5, false);
        assert_eq!(input.steer, 0.0);
        assert_eq!(input.throttle, 0.5);
    }

    #[test]
    fn test_pose_forward_and_yaw() {
        let pose = Pose::default();
        assert_abs_diff_eq!(pose.forward().z, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pose.yaw(), 0.0, epsilon = 1e-12);

        let turned = Pose::new(DVec3::ZERO, DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2));
        assert_abs_diff_eq!(turned.forward().x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(turned.yaw(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_between() {
        assert_abs_diff_eq!(angle_between_deg(DVec3::Z, DVec3::X), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_between_deg(DVec3::Z, DVec3::Z * 3.0), 0.0, epsilon = 1e-6);
        assert_eq!(angle_between_deg(DVec3::ZERO, DVec3::X), 0.0);
        assert_eq!(horizontal(DVec3::new(1.0, 5.0, -2.0)), DVec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert_abs_diff_eq!(time.elapsed_secs, 1.0, epsilon = 1e-12);
    }
}

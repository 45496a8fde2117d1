#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::time::Duration;

    use glam::{Quat, Vec3};

    use crate::commands::InputEvent;
    use crate::config::{default_zones, GameConfig, ZoneContent};
    use crate::constants::{MAX_FRAME_DELTA, MIN_FRAME_DELTA};
    use crate::enums::KeyCode;
    use crate::error::SimError;
    use crate::events::ZoneEvent;
    use crate::scene::Scene;
    use crate::types::{planar_distance, yaw_of, FrameClock};

    #[test]
    fn test_frame_clock_caps_stalls() {
        let mut clock = FrameClock::default();
        clock.anchor(Duration::from_secs(1));

        // Five seconds in a background tab collapse into one capped frame.
        let t = clock.advance(Duration::from_secs(6));
        assert_eq!(t.delta, MAX_FRAME_DELTA);
        assert_eq!(t.elapsed, MAX_FRAME_DELTA);
        assert_eq!(t.frame, 1);
    }

    #[test]
    fn test_frame_clock_non_advancing_clock_still_positive() {
        let mut clock = FrameClock::default();
        clock.anchor(Duration::from_millis(500));
        let t = clock.advance(Duration::from_millis(500));
        assert!(t.delta > 0.0);
        assert_eq!(t.delta, MIN_FRAME_DELTA);

        // Clock going backwards never rewinds the anchor.
        let t = clock.advance(Duration::from_millis(400));
        assert_eq!(t.delta, MIN_FRAME_DELTA);
        assert_eq!(clock.last_timestamp, Duration::from_millis(500));
    }

    #[test]
    fn test_frame_clock_accumulates_elapsed() {
        let mut clock = FrameClock::default();
        for i in 1..=60u64 {
            clock.advance(Duration::from_micros(16_667 * i));
        }
        assert_eq!(clock.frame, 60);
        assert!((clock.elapsed - 1.0).abs() < 1e-3, "elapsed = {}", clock.elapsed);
        assert!((clock.last_delta - 0.016_667).abs() < 1e-6);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 50.0, 0.0);
        let b = Vec3::new(3.0, -2.0, 4.0);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_of_left_turn_is_positive() {
        assert!(yaw_of(Quat::IDENTITY).abs() < 1e-6);
        let left = Quat::from_rotation_y(FRAC_PI_2);
        assert!((yaw_of(left) - FRAC_PI_2).abs() < 1e-5);
        // Facing -X after a positive yaw.
        let forward = left * Vec3::NEG_Z;
        assert!((forward.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "vehicle": { "max_speed": 3.0 } }"#).unwrap();
        assert_eq!(config.vehicle.max_speed, 3.0);
        assert_eq!(config.vehicle.acceleration, 0.8);
        assert_eq!(config.zones, default_zones());
        assert_eq!(config.physics.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(config.frame_rate, 60);
    }

    #[test]
    fn test_config_rejects_zero_frame_rate() {
        assert!(matches!(
            GameConfig::from_json_str(r#"{ "frame_rate": 0 }"#),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_bad_zone_radius() {
        let json = r#"{ "zones": [
            { "id": "a", "x": 0, "z": 0, "radius": 0, "label": "A",
              "content": { "title": "A", "body": "" } }
        ] }"#;
        match GameConfig::from_json_str(json) {
            Err(SimError::InvalidConfig(msg)) => assert!(msg.contains("radius")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_config_rejects_duplicate_zone_ids() {
        let mut config = GameConfig::with_default_zones();
        let dup = config.zones[0].clone();
        config.zones.push(dup);
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_zero_timestep() {
        let json = r#"{ "physics": { "timestep": 0.0 } }"#;
        assert!(matches!(
            GameConfig::from_json_str(json),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_zone_radius_defaults_when_omitted() {
        let json = r#"{ "zones": [
            { "id": "a", "x": 1, "z": 2, "label": "A",
              "content": { "title": "A", "body": "b" } }
        ] }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.zones.len(), 1);
        assert_eq!(config.zones[0].radius, 8.0);
    }

    #[test]
    fn test_key_code_parse() {
        assert_eq!(KeyCode::parse("ArrowUp"), KeyCode::ArrowUp);
        assert_eq!(KeyCode::parse("Space"), KeyCode::Space);
        assert_eq!(KeyCode::parse("KeyQ"), KeyCode::Other);
    }

    #[test]
    fn test_input_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{ "type": "KeyDown", "key": "KeyW" }"#).unwrap();
        assert_eq!(event, InputEvent::KeyDown { key: KeyCode::KeyW });
    }

    #[test]
    fn test_zone_event_is_tagged() {
        let event = ZoneEvent::Entered {
            id: "about".into(),
            content: ZoneContent {
                title: "About Me".into(),
                body: "hi".into(),
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"Entered""#));
        assert_eq!(event.zone_id(), "about");
    }

    #[test]
    fn test_scene_ignores_unknown_nodes() {
        let mut scene = Scene::new();
        let root = scene.add("chassis", Vec3::ZERO);
        let wheel = scene.add_child(root, "wheel", Vec3::X);
        scene.set_transform(crate::scene::NodeId(42), Vec3::ONE, Quat::IDENTITY);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(wheel).unwrap().parent, Some(root));
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use futures::executor::block_on;
    use glam::{Quat, Vec3};

    use trailhead_core::commands::DriveInput;
    use trailhead_core::config::{PhysicsConfig, VehicleParams};
    use trailhead_core::constants::*;
    use trailhead_core::enums::DriveMode;
    use trailhead_core::scene::Scene;
    use trailhead_physics::{BodyDesc, PhysicsAdapter};

    use crate::controller::{ground_forward, VehicleController};
    use crate::drive::{resolve, smooth_steering, steering_torque, toward_zero, VehicleState};

    const DT: f32 = 1.0 / 60.0;

    fn forward() -> DriveInput {
        DriveInput {
            forward: 1.0,
            ..Default::default()
        }
    }

    fn backward() -> DriveInput {
        DriveInput {
            forward: -1.0,
            ..Default::default()
        }
    }

    fn run(state: VehicleState, input: &DriveInput, frames: usize) -> VehicleState {
        let params = VehicleParams::default();
        (0..frames).fold(state, |s, _| resolve(s, input, &params, DT).state)
    }

    // ---- Drive state machine ----

    #[test]
    fn test_mode_selection() {
        let params = VehicleParams::default();
        let rest = VehicleState::default();
        assert_eq!(resolve(rest, &forward(), &params, DT).mode, DriveMode::Forward);
        assert_eq!(resolve(rest, &backward(), &params, DT).mode, DriveMode::Reverse);
        assert_eq!(
            resolve(rest, &DriveInput::default(), &params, DT).mode,
            DriveMode::Coast
        );
        // Brake beats directional intent
        let braking = DriveInput {
            brake: true,
            ..forward()
        };
        assert_eq!(resolve(rest, &braking, &params, DT).mode, DriveMode::Brake);
    }

    #[test]
    fn test_forward_accelerates_to_cap() {
        let params = VehicleParams::default();
        let mut state = VehicleState::default();
        for frame in 1..=180 {
            let next = resolve(state, &forward(), &params, DT).state;
            assert!(
                next.speed >= state.speed,
                "speed dropped at frame {frame}: {} -> {}",
                state.speed,
                next.speed
            );
            let t = frame as f32 * DT;
            let expected = (VEHICLE_ACCELERATION * t).min(VEHICLE_MAX_SPEED);
            assert!((next.speed - expected).abs() < 1e-4, "frame {frame}");
            state = next;
        }

        let half_second = run(VehicleState::default(), &forward(), 30);
        assert!((half_second.speed - VEHICLE_ACCELERATION * 0.5).abs() < 1e-4);

        let capped = run(VehicleState::default(), &forward(), 180);
        assert_eq!(capped.speed, VEHICLE_MAX_SPEED);
    }

    #[test]
    fn test_boost_raises_acceleration_and_cap() {
        let boosted = DriveInput {
            boost: true,
            ..forward()
        };
        let one_second = run(VehicleState::default(), &boosted, 60);
        let expected = VEHICLE_ACCELERATION * VEHICLE_BOOST_MULTIPLIER;
        assert!((one_second.speed - expected).abs() < 1e-3);

        let capped = run(VehicleState::default(), &boosted, 300);
        assert_eq!(capped.speed, VEHICLE_MAX_SPEED_BOOST);
    }

    #[test]
    fn test_reverse_is_slower_and_capped() {
        let one_second = run(VehicleState::default(), &backward(), 60);
        let expected = -VEHICLE_ACCELERATION * VEHICLE_REVERSE_FACTOR;
        assert!((one_second.speed - expected).abs() < 1e-3);

        let capped = run(VehicleState::default(), &backward(), 300);
        assert_eq!(capped.speed, -VEHICLE_MAX_REVERSE_SPEED);
    }

    #[test]
    fn test_boost_drop_clamps_to_normal_cap() {
        let fast = VehicleState {
            speed: VEHICLE_MAX_SPEED_BOOST,
            steering: 0.0,
        };
        let next = run(fast, &forward(), 1);
        assert_eq!(next.speed, VEHICLE_MAX_SPEED);
    }

    #[test]
    fn test_direction_change_passes_through_zero() {
        let params = VehicleParams::default();
        let mut state = VehicleState {
            speed: 1.0,
            steering: 0.0,
        };
        let mut reached_zero = false;
        for _ in 0..60 {
            let next = resolve(state, &backward(), &params, DT).state;
            if state.speed > 0.0 {
                assert!(next.speed >= 0.0, "sign flipped within one frame");
            }
            if next.speed == 0.0 {
                reached_zero = true;
            }
            state = next;
        }
        assert!(reached_zero);
        assert!(state.speed < 0.0);
    }

    #[test]
    fn test_coast_never_crosses_zero() {
        let mut forward_state = VehicleState {
            speed: 0.9,
            steering: 0.0,
        };
        let mut reverse_state = VehicleState {
            speed: -0.4,
            steering: 0.0,
        };
        for _ in 0..30 {
            forward_state = run(forward_state, &DriveInput::default(), 1);
            reverse_state = run(reverse_state, &DriveInput::default(), 1);
            assert!(forward_state.speed >= 0.0);
            assert!(reverse_state.speed <= 0.0);
        }
        assert_eq!(forward_state.speed, 0.0);
        assert_eq!(reverse_state.speed, 0.0);
    }

    #[test]
    fn test_brake_zeroes_speed_but_keeps_steering() {
        let params = VehicleParams::default();
        let moving = VehicleState {
            speed: 0.8,
            steering: 0.3,
        };
        let input = DriveInput {
            forward: 1.0,
            steering: 1.0,
            brake: true,
            boost: false,
        };
        let update = resolve(moving, &input, &params, DT);
        assert_eq!(update.mode, DriveMode::Brake);
        assert_eq!(update.state.speed, 0.0);
        assert!(update.state.steering > 0.3);
    }

    #[test]
    fn test_steering_bounded_and_converges() {
        let oversteer = DriveInput {
            steering: 5.0,
            ..Default::default()
        };
        let state = run(VehicleState::default(), &oversteer, 240);
        assert!(state.steering <= VEHICLE_MAX_STEERING);
        assert!((state.steering - VEHICLE_MAX_STEERING).abs() < 1e-4);

        let right = DriveInput {
            steering: -1.0,
            ..Default::default()
        };
        let state = run(VehicleState::default(), &right, 240);
        assert!((state.steering + VEHICLE_MAX_STEERING).abs() < 1e-4);
    }

    #[test]
    fn test_steering_smoothing_scales_with_delta() {
        let params = VehicleParams::default();
        let two_small = smooth_steering(smooth_steering(0.0, 1.0, &params, DT), 1.0, &params, DT);
        let one_large = smooth_steering(0.0, 1.0, &params, DT * 2.0);
        assert!((two_small - one_large).abs() < 1e-5);

        let first = smooth_steering(0.0, 1.0, &params, DT);
        assert!((first - VEHICLE_MAX_STEERING * VEHICLE_STEERING_SMOOTHING).abs() < 1e-5);
    }

    #[test]
    fn test_toward_zero() {
        assert_eq!(toward_zero(0.5, 0.25), 0.25);
        assert_eq!(toward_zero(0.1, 0.2), 0.0);
        assert_eq!(toward_zero(-0.1, 0.2), 0.0);
        assert_eq!(toward_zero(0.0, 0.2), 0.0);
    }

    #[test]
    fn test_steering_torque() {
        let params = VehicleParams::default();
        let crawling = VehicleState {
            speed: 0.05,
            steering: 0.5,
        };
        assert_eq!(steering_torque(&crawling, &params), 0.0);

        let forward = VehicleState {
            speed: 1.0,
            steering: 0.5,
        };
        assert!((steering_torque(&forward, &params) - 2.0).abs() < 1e-6);

        // Reversing inverts the turn
        let reversing = VehicleState {
            speed: -0.5,
            steering: 0.5,
        };
        assert!((steering_torque(&reversing, &params) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ground_forward() {
        let straight = ground_forward(Quat::IDENTITY).unwrap();
        assert!((straight - Vec3::NEG_Z).length() < 1e-6);

        let yawed = ground_forward(Quat::from_rotation_y(FRAC_PI_2)).unwrap();
        assert!((yawed - Vec3::NEG_X).length() < 1e-5);

        assert!(ground_forward(Quat::from_rotation_x(FRAC_PI_2)).is_none());
    }

    // ---- Controller against physics ----

    struct Rig {
        physics: PhysicsAdapter,
        scene: Scene,
        vehicle: VehicleController,
    }

    impl Rig {
        fn new() -> Self {
            let mut physics = PhysicsAdapter::new();
            block_on(physics.initialize(PhysicsConfig::default())).unwrap();
            let half = Vec3::new(GROUND_SIZE / 2.0, GROUND_HALF_THICKNESS, GROUND_SIZE / 2.0);
            physics
                .create_static_body(BodyDesc::cuboid(Vec3::ZERO, half).with_friction(GROUND_FRICTION))
                .unwrap();
            let mut scene = Scene::new();
            let vehicle = VehicleController::spawn(
                &mut physics,
                &mut scene,
                VehicleParams::default(),
                Vec3::from_array(CHASSIS_SPAWN),
            )
            .unwrap();
            Self {
                physics,
                scene,
                vehicle,
            }
        }

        fn frame(&mut self, input: &DriveInput) {
            self.vehicle
                .pre_physics(input, &mut self.physics, DT)
                .unwrap();
            self.physics.step(&mut self.scene).unwrap();
            self.vehicle
                .post_physics(&mut self.physics, &mut self.scene, DT)
                .unwrap();
        }

        fn frames(&mut self, input: &DriveInput, count: usize) {
            for _ in 0..count {
                self.frame(input);
            }
        }

        fn settled() -> Self {
            let mut rig = Self::new();
            rig.frames(&DriveInput::default(), 90);
            rig
        }
    }

    #[test]
    fn test_spawn_creates_chassis_and_wheels() {
        let rig = Rig::new();
        assert_eq!(rig.scene.len(), 5);
        assert_eq!(rig.vehicle.wheel_nodes().count(), 4);
        for wheel in rig.vehicle.wheel_nodes() {
            let node = rig.scene.get(wheel).unwrap();
            assert_eq!(node.parent, Some(rig.vehicle.chassis_node()));
        }
        assert_eq!(rig.vehicle.mode(), DriveMode::Coast);
    }

    #[test]
    fn test_forward_drives_toward_negative_z() {
        let mut rig = Rig::settled();
        rig.frames(&forward(), 300);
        let position = rig.vehicle.position();
        assert!(position.z < -1.0, "position = {position:?}");
        assert!(position.x.abs() < 0.1);
        assert_eq!(rig.vehicle.mode(), DriveMode::Forward);
    }

    #[test]
    fn test_reverse_drives_toward_positive_z() {
        let mut rig = Rig::settled();
        rig.frames(&backward(), 300);
        assert!(rig.vehicle.position().z > 0.5);
        assert!(rig.vehicle.speed() < 0.0);
    }

    #[test]
    fn test_brake_kills_horizontal_motion() {
        let mut rig = Rig::settled();
        rig.frames(&forward(), 120);
        assert!(rig.physics.velocity(rig.vehicle.body()).unwrap().z < -0.1);

        let braking = DriveInput {
            brake: true,
            ..Default::default()
        };
        rig.vehicle
            .pre_physics(&braking, &mut rig.physics, DT)
            .unwrap();
        let v = rig.physics.velocity(rig.vehicle.body()).unwrap();
        assert_eq!(v.x, 0.0);
        assert_eq!(v.z, 0.0);
        assert_eq!(
            rig.physics.angular_velocity(rig.vehicle.body()).unwrap(),
            Vec3::ZERO
        );
        assert_eq!(rig.vehicle.speed(), 0.0);

        let parked = rig.vehicle.position();
        rig.physics.step(&mut rig.scene).unwrap();
        rig.vehicle
            .post_physics(&mut rig.physics, &mut rig.scene, DT)
            .unwrap();
        rig.frames(&braking, 60);
        let after = rig.vehicle.position();
        assert!((after.x - parked.x).abs() < 1e-3 && (after.z - parked.z).abs() < 1e-3);
    }

    #[test]
    fn test_coast_comes_to_rest() {
        let mut rig = Rig::settled();
        rig.frames(&forward(), 120);
        rig.frames(&DriveInput::default(), 60);
        assert_eq!(rig.vehicle.speed(), 0.0);
        let v = rig.physics.velocity(rig.vehicle.body()).unwrap();
        assert!(v.x.abs() < 1e-4 && v.z.abs() < 1e-4, "v = {v:?}");
    }

    #[test]
    fn test_positive_steering_turns_left() {
        let mut rig = Rig::settled();
        let left = DriveInput {
            forward: 1.0,
            steering: 1.0,
            ..Default::default()
        };
        rig.frames(&left, 60);
        let yaw = rig.vehicle.yaw();
        assert!(yaw > 0.05 && yaw < 1.5, "yaw = {yaw}");
    }

    #[test]
    fn test_recovery_after_falling_through_ground() {
        let mut rig = Rig::settled();
        let body = rig.vehicle.body();
        rig.physics
            .set_translation(body, Vec3::new(3.0, -1.0, 4.0))
            .unwrap();
        rig.physics
            .set_velocity(body, Vec3::new(2.0, -5.0, -2.0))
            .unwrap();

        rig.vehicle
            .post_physics(&mut rig.physics, &mut rig.scene, DT)
            .unwrap();

        let position = rig.physics.transform(body).unwrap().position;
        assert_eq!(position, Vec3::new(3.0, RECOVERY_HEIGHT, 4.0));
        assert_eq!(rig.physics.velocity(body).unwrap(), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(rig.vehicle.position(), position);
        assert_eq!(
            rig.scene.get(rig.vehicle.chassis_node()).unwrap().position,
            position
        );
    }

    #[test]
    fn test_wheels_spin_and_front_wheels_steer() {
        let mut rig = Rig::settled();
        let wheels: Vec<_> = rig.vehicle.wheel_nodes().collect();
        let initial = rig.scene.get(wheels[2]).unwrap().rotation;

        let left = DriveInput {
            forward: 1.0,
            steering: 1.0,
            ..Default::default()
        };
        rig.frames(&left, 30);

        let front = rig.scene.get(wheels[0]).unwrap().rotation;
        let rear = rig.scene.get(wheels[2]).unwrap().rotation;
        assert!(!rear.abs_diff_eq(initial, 1e-4), "rear wheel did not spin");
        assert!(!front.abs_diff_eq(rear, 1e-4), "front wheel did not steer");
    }

    #[test]
    fn test_chassis_node_tracks_body() {
        let mut rig = Rig::settled();
        rig.frames(&forward(), 30);
        let transform = rig.physics.transform(rig.vehicle.body()).unwrap();
        let node = rig.scene.get(rig.vehicle.chassis_node()).unwrap();
        assert_eq!(node.position, transform.position);
        assert_eq!(node.rotation, transform.rotation);
    }
}

//! Hinge Geometry Tests
//!
//! Tests for:
//! - PropellerHinge: axis derivation, rigid spin about the geometric center,
//!   axis tracking when an ancestor turns
//! - DoorHinge: swing direction inference, outward opening, hinge line fixed
//! - WheelHinge: corner classification, rolling direction, shared axle

mod common;

use std::f32::consts::PI;
use std::time::Duration;

use common::{
    FRONT, PROPELLER_BACK, PROPELLER_CENTER, Vehicle, approx_eq, door_left_line, door_right_line,
    quat_approx, vec3_approx, vehicle,
};
use glam::{Quat, Vec3};
use myth_dynamics::dynamics::{
    DoorHinge, HingeKind, PropellerHinge, SwingDirection, WheelHinge, WheelPosition,
};
use myth_dynamics::{Dynamics, Hinge};

// ============================================================================
// Helpers
// ============================================================================

fn propeller_of(hinge: &Hinge) -> &PropellerHinge {
    match &hinge.kind {
        HingeKind::Propeller(p) => p,
        other => panic!("expected propeller, got {}", other.tag()),
    }
}

fn door_of(hinge: &Hinge) -> &DoorHinge {
    match &hinge.kind {
        HingeKind::Door(d) => d,
        other => panic!("expected door, got {}", other.tag()),
    }
}

fn wheel_of(hinge: &Hinge) -> &WheelHinge {
    match &hinge.kind {
        HingeKind::Wheel(w) => w,
        other => panic!("expected wheel, got {}", other.tag()),
    }
}

fn with_propeller() -> (Vehicle, Dynamics) {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_propeller_hinge(&mut v.scene, "prop", Some(v.propeller), PROPELLER_BACK)
        .unwrap();
    (v, dynamics)
}

fn with_doors() -> (Vehicle, Dynamics) {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    let (upper, lower) = door_left_line();
    dynamics
        .create_door_hinge(&mut v.scene, "doorL", Some(v.door_left), Some(v.body), upper, lower)
        .unwrap();
    let (upper, lower) = door_right_line();
    dynamics
        .create_door_hinge(&mut v.scene, "doorR", Some(v.door_right), Some(v.body), upper, lower)
        .unwrap();
    (v, dynamics)
}

/// Top of the front-left wheel rim in wheel-local space.
const RIM_TOP: Vec3 = Vec3::new(0.0, 0.0, 0.3);

// ============================================================================
// Propeller
// ============================================================================

#[test]
fn propeller_axis_runs_from_center_to_back() {
    let (_, dynamics) = with_propeller();
    let hinge = dynamics.hinge("prop").unwrap();
    let prop = propeller_of(hinge);

    assert!(hinge.continuous);
    assert_eq!(hinge.angle_limit, 0.0);
    assert_eq!(hinge.upm, 240.0);
    assert!(vec3_approx(prop.axis, Vec3::NEG_X));
    assert!(vec3_approx(prop.axis_world, Vec3::NEG_X));
    assert!(vec3_approx(prop.center_world, PROPELLER_CENTER));
    assert!(vec3_approx(prop.center, Vec3::new(0.2, 0.3, 0.0)));
}

#[test]
fn propeller_half_turn_orbits_origin_about_center() {
    let (mut v, mut dynamics) = with_propeller();

    // 240 upm for 250 ms is half a turn
    dynamics.advance(&mut v.scene, Duration::from_millis(250));

    let hinge = dynamics.hinge("prop").unwrap();
    assert!(approx_eq(hinge.rotated_angle, PI));

    let position = v.scene.position(v.propeller).unwrap();
    assert!(vec3_approx(position, Vec3::new(2.0, 0.6, 0.0)), "got {position}");

    let rotation = v.scene.rotation(v.propeller).unwrap();
    assert!(quat_approx(rotation, Quat::from_axis_angle(Vec3::NEG_X, PI)));

    let center = v.scene.bounding_center(v.propeller).unwrap();
    assert!(vec3_approx(center, PROPELLER_CENTER), "got {center}");
}

#[test]
fn propeller_center_stays_fixed_over_many_steps() {
    let (mut v, mut dynamics) = with_propeller();

    for _ in 0..10 {
        dynamics.advance(&mut v.scene, Duration::from_millis(37));
        let center = v.scene.bounding_center(v.propeller).unwrap();
        assert!(vec3_approx(center, PROPELLER_CENTER), "drifted to {center}");
    }

    let expected = PI * 240.0 / 60000.0 * 370.0;
    assert!(approx_eq(dynamics.hinge("prop").unwrap().rotated_angle, expected));
}

#[test]
fn propeller_axis_follows_ancestor_rotation() {
    let (mut v, mut dynamics) = with_propeller();

    v.scene.get_node_mut(v.model).unwrap().transform.rotation = Quat::from_rotation_z(PI / 2.0);
    dynamics.advance(&mut v.scene, Duration::from_millis(10));

    let prop = propeller_of(dynamics.hinge("prop").unwrap());
    assert!(vec3_approx(prop.center_world, Vec3::new(-0.3, 2.2, 0.0)), "got {}", prop.center_world);
    assert!(vec3_approx(prop.axis_world, Vec3::NEG_Y), "got {}", prop.axis_world);

    let center = v.scene.bounding_center(v.propeller).unwrap();
    assert!(vec3_approx(center, Vec3::new(-0.3, 2.2, 0.0)));
}

#[test]
fn hinge_rotate_leaves_accumulated_angle_alone() {
    let (mut v, mut dynamics) = with_propeller();
    let hinge = dynamics.hinge_mut("prop").unwrap();

    hinge.rotate(&mut v.scene, 0.5).unwrap();

    assert_eq!(hinge.rotated_angle, 0.0);
    let rotation = v.scene.rotation(v.propeller).unwrap();
    assert!(quat_approx(rotation, Quat::from_axis_angle(Vec3::NEG_X, 0.5)));
}

// ============================================================================
// Door
// ============================================================================

#[test]
fn door_direction_depends_on_side_of_body() {
    let (_, dynamics) = with_doors();

    let left = dynamics.hinge("doorL").unwrap();
    let right = dynamics.hinge("doorR").unwrap();

    assert!(!left.continuous);
    assert!(approx_eq(left.angle_limit, 0.4 * PI));
    assert_eq!(left.upm, 60.0);

    assert_eq!(door_of(left).direction, SwingDirection::CounterClockwise);
    assert_eq!(door_of(right).direction, SwingDirection::Clockwise);
    assert!(vec3_approx(door_of(left).axis_world, Vec3::Z));
    assert!(vec3_approx(door_of(left).point_world, Vec3::new(0.0, 1.05, 0.0)));
}

#[test]
fn doors_open_outward_and_stop_at_limit() {
    let (mut v, mut dynamics) = with_doors();

    assert!(dynamics.fastforward_hinge(&mut v.scene, "doorL", 10.0));
    assert!(dynamics.fastforward_hinge(&mut v.scene, "doorR", 10.0));

    let limit = dynamics.config().door_angle_limit;
    assert_eq!(dynamics.hinge("doorL").unwrap().rotated_angle, limit);
    assert_eq!(dynamics.hinge("doorR").unwrap().rotated_angle, limit);

    let left = v.scene.bounding_center(v.door_left).unwrap();
    let right = v.scene.bounding_center(v.door_right).unwrap();
    assert!(vec3_approx(left, Vec3::new(0.154_508, 1.525_528, 0.0)), "got {left}");
    assert!(vec3_approx(right, Vec3::new(0.154_508, -1.525_528, 0.0)), "got {right}");
}

#[test]
fn door_hinge_line_stays_fixed() {
    let (mut v, mut dynamics) = with_doors();

    dynamics.fastforward_hinge(&mut v.scene, "doorL", 0.3);

    let (upper, lower) = door_left_line();
    let mid = (upper + lower) * 0.5;
    let origin = v.scene.local_to_world(v.door_left, Vec3::ZERO).unwrap();
    assert!(vec3_approx(origin, mid));
}

#[test]
fn door_closes_back_to_rest() {
    let (mut v, mut dynamics) = with_doors();
    let limit = dynamics.config().door_angle_limit;

    dynamics.fastforward_hinge(&mut v.scene, "doorL", 10.0);
    // 60 upm: one second is half a turn
    dynamics.fastforward_hinge(&mut v.scene, "doorL", -limit / PI);

    let hinge = dynamics.hinge("doorL").unwrap();
    assert!(approx_eq(hinge.rotated_angle, 0.0));

    let center = v.scene.bounding_center(v.door_left).unwrap();
    assert!(vec3_approx(center, Vec3::new(0.5, 1.05, 0.0)), "got {center}");
}

// ============================================================================
// Wheel
// ============================================================================

#[test]
fn wheel_pairs_are_classified_by_corner() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "front", Some(v.wheel_fl), Some(v.wheel_fr), FRONT)
        .unwrap();
    dynamics
        .create_wheel_hinge(&mut v.scene, "rear", Some(v.wheel_rl), Some(v.wheel_rr), FRONT)
        .unwrap();
    dynamics
        .create_wheel_hinge(&mut v.scene, "swapped", Some(v.wheel_fr), Some(v.wheel_fl), FRONT)
        .unwrap();

    let front = wheel_of(dynamics.hinge("front").unwrap());
    assert_eq!(front.position, WheelPosition::FrontLeft);
    assert_eq!(front.dir, 1.0);
    assert_eq!(front.parent.handle, v.body);

    let rear = wheel_of(dynamics.hinge("rear").unwrap());
    assert_eq!(rear.position, WheelPosition::BackLeft);
    assert_eq!(rear.dir, 1.0);

    let swapped = wheel_of(dynamics.hinge("swapped").unwrap());
    assert_eq!(swapped.position, WheelPosition::FrontRight);
    assert_eq!(swapped.dir, -1.0);
}

#[test]
fn wheel_axes_run_along_the_axle() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "front", Some(v.wheel_fl), Some(v.wheel_fr), FRONT)
        .unwrap();

    let wheel = wheel_of(dynamics.hinge("front").unwrap());
    assert!(vec3_approx(wheel.left_center_world, Vec3::new(1.5, 1.2, -0.5)));
    assert!(vec3_approx(wheel.right_center_world, Vec3::new(1.5, -1.2, -0.5)));
    assert!(vec3_approx(wheel.left_axis_world, Vec3::Y));
    assert!(vec3_approx(wheel.right_axis_world, Vec3::NEG_Y));
    assert!(vec3_approx(wheel.left_axis, Vec3::Y));
    assert!(vec3_approx(wheel.right_axis, Vec3::NEG_Y));
}

#[test]
fn wheels_roll_toward_front() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "front", Some(v.wheel_fl), Some(v.wheel_fr), FRONT)
        .unwrap();

    // 100 upm for 600 ms is half a turn
    dynamics.advance(&mut v.scene, Duration::from_millis(600));

    let left_top = v.scene.local_to_world(v.wheel_fl, RIM_TOP).unwrap();
    let right_top = v.scene.local_to_world(v.wheel_fr, RIM_TOP).unwrap();
    assert!(vec3_approx(left_top, Vec3::new(1.5, 1.2, -0.8)), "got {left_top}");
    assert!(vec3_approx(right_top, Vec3::new(1.5, -1.2, -0.8)), "got {right_top}");

    let left_center = v.scene.bounding_center(v.wheel_fl).unwrap();
    assert!(vec3_approx(left_center, Vec3::new(1.5, 1.2, -0.5)));
}

#[test]
fn both_wheels_share_one_rigid_rotation() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "swapped", Some(v.wheel_fr), Some(v.wheel_fl), FRONT)
        .unwrap();

    dynamics.advance(&mut v.scene, Duration::from_millis(50));

    // Top of the rim moves forward on both sides, regardless of labelling
    let left_top = v.scene.local_to_world(v.wheel_fl, RIM_TOP).unwrap();
    let right_top = v.scene.local_to_world(v.wheel_fr, RIM_TOP).unwrap();
    assert!(left_top.x > 1.5);
    assert!(approx_eq(left_top.x, right_top.x));
    assert!(approx_eq(left_top.z, right_top.z));
    assert!(quat_approx(
        v.scene.rotation(v.wheel_fl).unwrap(),
        v.scene.rotation(v.wheel_fr).unwrap()
    ));
}

#[test]
fn rear_wheels_with_offset_origin_turn_about_their_centers() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "rear", Some(v.wheel_rl), Some(v.wheel_rr), FRONT)
        .unwrap();

    dynamics.advance(&mut v.scene, Duration::from_millis(100));

    let top = v.scene.local_to_world(v.wheel_rl, Vec3::new(-1.5, 1.2, -0.2)).unwrap();
    assert!(top.x > -1.5, "rim top moved backward: {top}");

    let center = v.scene.bounding_center(v.wheel_rl).unwrap();
    assert!(vec3_approx(center, Vec3::new(-1.5, 1.2, -0.5)), "got {center}");
    let center = v.scene.bounding_center(v.wheel_rr).unwrap();
    assert!(vec3_approx(center, Vec3::new(-1.5, -1.2, -0.5)), "got {center}");
}

#[test]
fn degenerate_front_point_stays_finite() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    let body_center = v.scene.bounding_center(v.body).unwrap();
    dynamics
        .create_wheel_hinge(&mut v.scene, "front", Some(v.wheel_fl), Some(v.wheel_fr), body_center)
        .unwrap();

    let wheel = wheel_of(dynamics.hinge("front").unwrap());
    assert_eq!(wheel.position, WheelPosition::FrontLeft);
    assert_eq!(wheel.dir, 1.0);

    dynamics.advance(&mut v.scene, Duration::from_millis(100));
    let rotation = v.scene.rotation(v.wheel_fl).unwrap();
    assert!(rotation.is_finite());
}

#[test]
fn wheel_centers_follow_parent_rotation() {
    let mut v = vehicle();
    let mut dynamics = Dynamics::new();
    dynamics
        .create_wheel_hinge(&mut v.scene, "front", Some(v.wheel_fl), Some(v.wheel_fr), FRONT)
        .unwrap();

    v.scene.get_node_mut(v.body).unwrap().transform.rotation = Quat::from_rotation_z(PI / 2.0);
    dynamics.advance(&mut v.scene, Duration::from_millis(10));

    let wheel = wheel_of(dynamics.hinge("front").unwrap());
    assert!(vec3_approx(wheel.left_center_world, Vec3::new(-1.2, 1.5, -0.5)));
    assert!(vec3_approx(wheel.left_axis_world, Vec3::NEG_X));
}

#[test]
fn wheel_position_display() {
    assert_eq!(WheelPosition::FrontLeft.to_string(), "FRONTLEFT");
    assert_eq!(WheelPosition::BackRight.to_string(), "BACKRIGHT");
    assert!(WheelPosition::new(false, true).is_left());
    assert!(!WheelPosition::new(false, true).is_front());
}

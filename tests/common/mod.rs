//! Shared fixtures for the integration tests.
//!
//! The vehicle is built Z-up, facing +X, with its left side toward +Y:
//!
//! ```text
//! Model
//! └── Body            (-2..2, -1..1, -0.5..0.5)
//!     ├── Propeller   origin (2, 0, 0), blade centered at local (0.2, 0.3, 0)
//!     ├── DoorL       origin (0, 1.05, 0), leaf along +X
//!     ├── DoorR       origin (0, -1.05, 0), leaf along +X
//!     ├── WheelFL     origin at its center (1.5, 1.2, -0.5)
//!     ├── WheelFR     origin at its center (1.5, -1.2, -0.5)
//!     ├── WheelRL     origin at the body origin, geometry at (-1.5, 1.2, -0.5)
//!     └── WheelRR     origin at the body origin, geometry at (-1.5, -1.2, -0.5)
//! ```
#![allow(dead_code)]

use glam::{Quat, Vec3};
use myth_dynamics::scene::{BoundingBox, NodeHandle, Scene};

pub const EPSILON: f32 = 1e-4;

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

pub fn quat_approx(a: Quat, b: Quat) -> bool {
    (a.dot(b).abs() - 1.0).abs() < EPSILON
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Vehicle {
    pub scene: Scene,
    pub model: NodeHandle,
    pub body: NodeHandle,
    pub propeller: NodeHandle,
    pub door_left: NodeHandle,
    pub door_right: NodeHandle,
    pub wheel_fl: NodeHandle,
    pub wheel_fr: NodeHandle,
    pub wheel_rl: NodeHandle,
    pub wheel_rr: NodeHandle,
}

/// World point behind the propeller blade; yields a spin axis of -X.
pub const PROPELLER_BACK: Vec3 = Vec3::new(1.9, 0.3, 0.0);
pub const PROPELLER_CENTER: Vec3 = Vec3::new(2.2, 0.3, 0.0);

/// World point well ahead of the vehicle.
pub const FRONT: Vec3 = Vec3::new(10.0, 0.0, 0.0);

pub fn wheel_bounds(center: Vec3) -> BoundingBox {
    BoundingBox::from_center_size(center, Vec3::new(0.6, 0.2, 0.6))
}

pub fn vehicle() -> Vehicle {
    init_logger();
    let mut scene = Scene::new();

    let model = scene.create_node_with_name("Model");
    let body = scene
        .build_node("Body")
        .with_bounds(BoundingBox::new(Vec3::new(-2.0, -1.0, -0.5), Vec3::new(2.0, 1.0, 0.5)))
        .with_parent(model)
        .build();

    let propeller = scene
        .build_node("Propeller")
        .with_position(2.0, 0.0, 0.0)
        .with_bounds(BoundingBox::from_center_size(
            Vec3::new(0.2, 0.3, 0.0),
            Vec3::new(0.05, 0.1, 1.6),
        ))
        .with_parent(body)
        .build();

    let leaf = BoundingBox::new(Vec3::new(0.0, -0.05, -0.4), Vec3::new(1.0, 0.05, 0.4));
    let door_left = scene
        .build_node("DoorL")
        .with_position(0.0, 1.05, 0.0)
        .with_bounds(leaf)
        .with_parent(body)
        .build();
    let door_right = scene
        .build_node("DoorR")
        .with_position(0.0, -1.05, 0.0)
        .with_bounds(leaf)
        .with_parent(body)
        .build();

    let wheel_fl = scene
        .build_node("WheelFL")
        .with_position(1.5, 1.2, -0.5)
        .with_bounds(wheel_bounds(Vec3::ZERO))
        .with_parent(body)
        .build();
    let wheel_fr = scene
        .build_node("WheelFR")
        .with_position(1.5, -1.2, -0.5)
        .with_bounds(wheel_bounds(Vec3::ZERO))
        .with_parent(body)
        .build();
    let wheel_rl = scene
        .build_node("WheelRL")
        .with_bounds(wheel_bounds(Vec3::new(-1.5, 1.2, -0.5)))
        .with_parent(body)
        .build();
    let wheel_rr = scene
        .build_node("WheelRR")
        .with_bounds(wheel_bounds(Vec3::new(-1.5, -1.2, -0.5)))
        .with_parent(body)
        .build();

    scene.update_matrix_world();

    Vehicle {
        scene,
        model,
        body,
        propeller,
        door_left,
        door_right,
        wheel_fl,
        wheel_fr,
        wheel_rl,
        wheel_rr,
    }
}

/// Door hinge line endpoints (world space) for the left and right doors.
pub fn door_left_line() -> (Vec3, Vec3) {
    (Vec3::new(0.0, 1.05, 0.4), Vec3::new(0.0, 1.05, -0.4))
}

pub fn door_right_line() -> (Vec3, Vec3) {
    (Vec3::new(0.0, -1.05, 0.4), Vec3::new(0.0, -1.05, -0.4))
}

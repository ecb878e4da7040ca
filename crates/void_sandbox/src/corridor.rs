//! Scripted corridor scene
//!
//! The player walks down +Z under a low beam (line-of-sight occlusion from a
//! raised camera), through a glass pane the camera sees through, then past a
//! gate volume that pulls the camera in until the gate is removed.
//!
//! ```text
//!   z=0          z=8       z=16      z=22..26             z=45
//!   start ────  [beam] ── [glass] ── [gate] ──────────── end
//! ```

use glam::Vec3;
use void_camera::{EntityId, Transform, TransformRegistry};
use void_physics::{ColliderDesc, ColliderHandle, ColliderShape, CollisionGroups, CollisionLayer, PhysicsWorld};

/// The player entity
pub const PLAYER: EntityId = EntityId(1);

/// Player eye height
const PLAYER_HEIGHT: f32 = 1.0;

/// Corridor end
const CORRIDOR_END: f32 = 45.0;

/// Collision scene plus scripted player
pub struct Corridor {
    /// Collision scene
    pub world: PhysicsWorld,
    /// Entity transforms
    pub transforms: TransformRegistry,
    /// The player's own collider (ignored by line-of-sight tests)
    pub player_body: ColliderHandle,
    gate: Option<ColliderHandle>,
    gate_lifetime: f32,
    player_speed: f32,
}

impl Corridor {
    /// Build the corridor
    pub fn build(mut world: PhysicsWorld, player_speed: f32, gate_lifetime: f32) -> void_physics::Result<Self> {
        let environment = CollisionGroups::from_layer(CollisionLayer::ENVIRONMENT, &[CollisionLayer::PLAYER]);

        // Side walls
        for x in [-4.0, 4.0] {
            world.create_collider(
                ColliderDesc::new(ColliderShape::cuboid(0.25, 3.0, CORRIDOR_END / 2.0 + 5.0))
                    .with_offset(x, 1.5, CORRIDOR_END / 2.0)
                    .with_collision_groups(environment),
            )?;
        }

        // Beam across the corridor, above head height
        world.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(3.75, 0.75, 0.25))
                .with_offset(0.0, 2.75, 8.0)
                .with_collision_groups(environment),
        )?;

        // Glass pane: solid, but transparent to camera sight lines
        world.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(3.75, 3.0, 0.05))
                .with_offset(0.0, 1.5, 16.0)
                .with_collision_groups(CollisionGroups::from_layer(
                    CollisionLayer::CAMERA_TRANSPARENT,
                    &[CollisionLayer::PLAYER],
                )),
        )?;

        // Gate: designated camera volume
        let gate = world.create_collider(
            ColliderDesc::sensor(ColliderShape::cuboid(3.5, 3.0, 2.0))
                .with_offset(0.0, 1.5, 24.0)
                .with_collision_groups(CollisionGroups::from_layer(
                    CollisionLayer::TRIGGERS,
                    &[CollisionLayer::PLAYER],
                )),
        )?;

        let player_body = world.create_collider(
            ColliderDesc::new(ColliderShape::capsule(0.5, 0.4))
                .with_offset(0.0, PLAYER_HEIGHT, 0.0)
                .with_collision_groups(CollisionGroups::from_layer(
                    CollisionLayer::PLAYER,
                    &[CollisionLayer::ENVIRONMENT],
                )),
        )?;

        let mut transforms = TransformRegistry::new();
        transforms.insert(PLAYER, Transform::from_position(Vec3::new(0.0, PLAYER_HEIGHT, 0.0)));

        world.sync_query_pipeline();
        log::info!("Corridor built with {} colliders", world.collider_count());

        Ok(Self {
            world,
            transforms,
            player_body,
            gate: Some(gate),
            gate_lifetime,
            player_speed,
        })
    }

    /// Sight-line filter that sees through camera-transparent geometry
    pub fn camera_sight_filter() -> CollisionGroups {
        CollisionGroups::ALL.remove_filter(CollisionLayer::CAMERA_TRANSPARENT)
    }

    /// Where the scripted player is at `time`
    pub fn player_position(&self, time: f32) -> Vec3 {
        let z = (time * self.player_speed).clamp(0.0, CORRIDOR_END);
        Vec3::new(0.0, PLAYER_HEIGHT, z)
    }

    /// Advance the script to `time`
    pub fn step(&mut self, time: f32) -> void_physics::Result<()> {
        let position = self.player_position(time);
        self.transforms.set_position(PLAYER, position);
        self.world.set_collider_position(self.player_body, position.to_array())?;

        if time >= self.gate_lifetime {
            if let Some(gate) = self.gate.take() {
                log::info!("Gate volume removed at t={:.2}s", time);
                self.world.remove_collider(gate)?;
            }
        }
        Ok(())
    }
}

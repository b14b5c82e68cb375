// Rigid-body world for the arena simulation, backed by rapier2d.
//
// Screen-space coordinates: +x right, +y down. Every body carries exactly one collider whose
// user data holds its collision tag. Only tag pairs with a registered handler interact, and
// the begin / pre-solve / separate outcome of each contact is queued as a `ContactEvent` that
// the caller drains after `step`. Handlers never get access to game state.

use rapier2d::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

pub use rapier2d::prelude::{RigidBody, RigidBodyHandle as BodyHandle};

pub type Vec2 = Vector<Real>;

/// Solver tolerances are expressed in pixels through this scale.
const PIXELS_PER_METER: f32 = 100.0;
const ONE_WAY_BIT: u128 = 1 << 8;

/// Collision filter tags. Handlers are registered per pair of tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CollisionType {
    Platform = 1,
    Player = 2,
    Projectile = 3,
    Pickup = 4,
}

impl CollisionType {
    fn from_tag(tag: u128) -> Option<Self> {
        match tag & 0xff {
            1 => Some(CollisionType::Platform),
            2 => Some(CollisionType::Player),
            3 => Some(CollisionType::Projectile),
            4 => Some(CollisionType::Pickup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Box {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    fn collider(self) -> ColliderBuilder {
        match self {
            Shape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
        }
    }
}

/// Everything needed to insert one body and its collider.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub body_type: RigidBodyType,
    pub shape: Shape,
    pub collision_type: CollisionType,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub friction: f32,
    /// Surface that only supports bodies arriving from above. Read by pre-solve filters.
    pub one_way: bool,
    /// Reports overlaps without ever producing contact forces.
    pub sensor: bool,
}

impl BodyDesc {
    fn new(body_type: RigidBodyType, shape: Shape, collision_type: CollisionType) -> Self {
        Self {
            body_type,
            shape,
            collision_type,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            mass: 1.0,
            friction: 1.0,
            one_way: false,
            sensor: false,
        }
    }

    pub fn dynamic(shape: Shape, collision_type: CollisionType, mass: f32) -> Self {
        Self {
            mass,
            ..Self::new(RigidBodyType::Dynamic, shape, collision_type)
        }
    }

    /// Moved by scheduling its next position; riders see the implied velocity.
    pub fn kinematic_position_based(shape: Shape, collision_type: CollisionType) -> Self {
        Self::new(RigidBodyType::KinematicPositionBased, shape, collision_type)
    }

    /// Moves at a constant velocity, unaffected by gravity and contacts.
    pub fn kinematic_velocity_based(shape: Shape, collision_type: CollisionType) -> Self {
        Self::new(RigidBodyType::KinematicVelocityBased, shape, collision_type)
    }

    pub fn fixed(shape: Shape, collision_type: CollisionType) -> Self {
        Self::new(RigidBodyType::Fixed, shape, collision_type)
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn as_one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    fn user_data(&self) -> u128 {
        let one_way = if self.one_way { ONE_WAY_BIT } else { 0 };
        self.collision_type as u128 | one_way
    }
}

/// Extent and motion of one side of a contact, as seen by pre-solve filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub top: f32,
    pub bottom: f32,
    pub velocity: Vec2,
    pub one_way: bool,
}

/// Contact passed to pre-solve filters. `a` carries the first tag of the registered pair and
/// `normal` points from `a` towards `b`.
#[derive(Debug, Clone, Copy)]
pub struct Arbiter {
    pub a: Surface,
    pub b: Surface,
    pub normal: Vec2,
}

/// Returns false to skip resolving the contact for this step.
pub type PreSolveFn = fn(&Arbiter) -> bool;

#[derive(Clone, Copy, Default)]
pub struct CollisionHandler {
    pub pre_solve: Option<PreSolveFn>,
    /// Accepted contacts push the bodies apart. Sensors only report.
    pub solid: bool,
}

impl CollisionHandler {
    pub fn sensor() -> Self {
        Self::default()
    }

    pub fn solid() -> Self {
        Self {
            pre_solve: None,
            solid: true,
        }
    }

    pub fn with_pre_solve(mut self, filter: PreSolveFn) -> Self {
        self.pre_solve = Some(filter);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    /// The pre-solve filter accepted the contact this step.
    PreSolve,
    Separate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub a_type: CollisionType,
    pub b_type: CollisionType,
    pub normal: Vec2,
}

impl ContactEvent {
    pub fn is(&self, phase: ContactPhase, a_type: CollisionType, b_type: CollisionType) -> bool {
        self.phase == phase && self.a_type == a_type && self.b_type == b_type
    }
}

#[derive(Default)]
struct ContactHooks {
    handlers: HashMap<(CollisionType, CollisionType), CollisionHandler>,
}

impl ContactHooks {
    /// Handler for a tag pair and whether the pair is reversed relative to its registration.
    fn handler_for(
        &self,
        first: CollisionType,
        second: CollisionType,
    ) -> Option<(CollisionHandler, bool)> {
        if let Some(handler) = self.handlers.get(&(first, second)) {
            return Some((*handler, false));
        }
        self.handlers
            .get(&(second, first))
            .map(|handler| (*handler, true))
    }

    fn pair(
        &self,
        colliders: &ColliderSet,
        first: ColliderHandle,
        second: ColliderHandle,
    ) -> Option<(CollisionHandler, bool)> {
        let first = collision_type(colliders.get(first)?)?;
        let second = collision_type(colliders.get(second)?)?;
        self.handler_for(first, second)
    }
}

impl PhysicsHooks for ContactHooks {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        let (handler, _) = self.pair(context.colliders, context.collider1, context.collider2)?;
        if handler.solid {
            Some(SolverFlags::COMPUTE_IMPULSES)
        } else {
            // Contacts are still tracked and reported, they just never push.
            Some(SolverFlags::empty())
        }
    }

    fn filter_intersection_pair(&self, context: &PairFilterContext) -> bool {
        self.pair(context.colliders, context.collider1, context.collider2)
            .is_some()
    }

    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let Some((handler, swapped)) =
            self.pair(context.colliders, context.collider1, context.collider2)
        else {
            return;
        };
        let Some(filter) = handler.pre_solve else {
            return;
        };
        let (Some(first), Some(second)) = (
            surface(context.bodies, context.colliders, context.collider1),
            surface(context.bodies, context.colliders, context.collider2),
        ) else {
            return;
        };
        let normal = *context.normal;
        let arbiter = if swapped {
            Arbiter {
                a: second,
                b: first,
                normal: -normal,
            }
        } else {
            Arbiter {
                a: first,
                b: second,
                normal,
            }
        };
        if !filter(&arbiter) {
            context.solver_contacts.clear();
        }
    }
}

/// Collects collision start/stop events raised during a step.
#[derive(Default)]
struct ContactCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl ContactCollector {
    fn drain(&self) -> Vec<CollisionEvent> {
        let mut collisions = self
            .collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *collisions)
    }
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

pub struct World {
    gravity: Vec2,
    /// Rapier damping coefficient derived from the fraction of velocity kept per second.
    linear_damping: f32,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    hooks: ContactHooks,
    collector: ContactCollector,
    /// Pairs that began touching and have not separated yet.
    touching: HashSet<(ColliderHandle, ColliderHandle)>,
    events: Vec<ContactEvent>,
}

impl World {
    /// `damping` is the fraction of velocity a dynamic body keeps per second.
    pub fn new(gravity: Vec2, damping: f32) -> Self {
        let integration_parameters = IntegrationParameters {
            length_unit: PIXELS_PER_METER,
            ..IntegrationParameters::default()
        };
        let linear_damping = if damping > 0.0 && damping < 1.0 {
            -damping.ln()
        } else {
            0.0
        };
        Self {
            gravity,
            linear_damping,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            hooks: ContactHooks::default(),
            collector: ContactCollector::default(),
            touching: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn set_handler(&mut self, a: CollisionType, b: CollisionType, handler: CollisionHandler) {
        self.hooks.handlers.insert((a, b), handler);
    }

    pub fn add(&mut self, desc: BodyDesc) -> BodyHandle {
        let damping = if desc.body_type == RigidBodyType::Dynamic {
            self.linear_damping
        } else {
            0.0
        };
        let body = RigidBodyBuilder::new(desc.body_type)
            .translation(desc.position)
            .linvel(desc.velocity)
            .linear_damping(damping)
            .lock_rotations()
            .build();
        let handle = self.bodies.insert(body);

        let collider = desc
            .shape
            .collider()
            .mass(desc.mass)
            .friction(desc.friction)
            .sensor(desc.sensor)
            .user_data(desc.user_data())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(
                ActiveHooks::FILTER_CONTACT_PAIRS
                    | ActiveHooks::FILTER_INTERSECTION_PAIR
                    | ActiveHooks::MODIFY_SOLVER_CONTACTS,
            )
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Removes a body. Contacts it was part of report `Separate` right away.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let attached: Vec<ColliderHandle> = self.bodies.get(handle)?.colliders().to_vec();
        for collider in attached {
            self.report_separations(collider);
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        )
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances every body by `dt` seconds and queues the contact events of the step.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &self.hooks,
            &self.collector,
        );

        // Begin and separate events come before the contacts accepted this step, so a rider
        // that leaves one platform and stands on another ends up supported.
        for collision in self.collector.drain() {
            // Removals were already reported by `remove`.
            if collision.removed() {
                continue;
            }
            let pair = (collision.collider1(), collision.collider2());
            let phase = if collision.started() {
                self.touching.insert(pair);
                ContactPhase::Begin
            } else {
                if !self.touching.remove(&pair) {
                    self.touching.remove(&(pair.1, pair.0));
                }
                ContactPhase::Separate
            };
            self.queue(phase, pair.0, pair.1, Vec2::zeros());
        }

        let accepted: Vec<(ColliderHandle, ColliderHandle, Vec2)> = self
            .narrow_phase
            .contact_pairs()
            .filter_map(|pair| {
                let manifold = pair.manifolds.iter().find(|manifold| {
                    !manifold.data.solver_contacts.is_empty()
                        && manifold
                            .data
                            .solver_flags
                            .contains(SolverFlags::COMPUTE_IMPULSES)
                })?;
                Some((pair.collider1, pair.collider2, manifold.data.normal))
            })
            .collect();
        for (first, second, normal) in accepted {
            self.queue(ContactPhase::PreSolve, first, second, normal);
        }
    }

    fn report_separations(&mut self, collider: ColliderHandle) {
        let ended: Vec<(ColliderHandle, ColliderHandle)> = self
            .touching
            .iter()
            .filter(|(first, second)| *first == collider || *second == collider)
            .copied()
            .collect();
        for pair in ended {
            self.touching.remove(&pair);
            self.queue(ContactPhase::Separate, pair.0, pair.1, Vec2::zeros());
        }
    }

    // `normal` points from the first collider to the second.
    fn queue(
        &mut self,
        phase: ContactPhase,
        first: ColliderHandle,
        second: ColliderHandle,
        normal: Vec2,
    ) {
        let (Some(first), Some(second)) = (self.endpoint(first), self.endpoint(second)) else {
            return;
        };
        let Some((_, swapped)) = self.hooks.handler_for(first.1, second.1) else {
            return;
        };
        let (a, b, normal) = if swapped {
            (second, first, -normal)
        } else {
            (first, second, normal)
        };
        self.events.push(ContactEvent {
            phase,
            a: a.0,
            b: b.0,
            a_type: a.1,
            b_type: b.1,
            normal,
        });
    }

    fn endpoint(&self, collider: ColliderHandle) -> Option<(BodyHandle, CollisionType)> {
        let collider = self.colliders.get(collider)?;
        Some((collider.parent()?, collision_type(collider)?))
    }
}

fn collision_type(collider: &Collider) -> Option<CollisionType> {
    CollisionType::from_tag(collider.user_data)
}

fn surface(
    bodies: &RigidBodySet,
    colliders: &ColliderSet,
    handle: ColliderHandle,
) -> Option<Surface> {
    let collider = colliders.get(handle)?;
    let aabb = collider.compute_aabb();
    let velocity = collider
        .parent()
        .and_then(|parent| bodies.get(parent))
        .map(|body| *body.linvel())
        .unwrap_or_else(Vec2::zeros);
    Some(Surface {
        top: aabb.mins.y,
        bottom: aabb.maxs.y,
        velocity,
        one_way: collider.user_data & ONE_WAY_BIT != 0,
    })
}

/// Instant velocity change of `impulse / mass`. No effect on non-dynamic bodies.
pub fn apply_impulse(body: &mut RigidBody, impulse: Vec2, mass: f32) {
    if !body.is_dynamic() || mass <= 0.0 {
        return;
    }
    let velocity = *body.linvel() + impulse / mass;
    body.set_linvel(velocity, true);
}

/// Moves the body and stops it.
pub fn teleport(body: &mut RigidBody, position: Vec2) {
    body.set_translation(position, true);
    body.set_linvel(Vec2::zeros(), true);
}

pub fn is_finite(vector: &Vec2) -> bool {
    vector.iter().all(|component| component.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world() -> World {
        World::new(Vec2::new(0.0, 900.0), 0.9)
    }

    fn floor() -> BodyDesc {
        // Top edge at y = 90.
        BodyDesc::fixed(Shape::rect(200.0, 20.0), CollisionType::Platform)
            .at(Vec2::new(0.0, 100.0))
    }

    fn crate_box(position: Vec2) -> BodyDesc {
        BodyDesc::dynamic(Shape::rect(25.0, 45.0), CollisionType::Player, 10.0).at(position)
    }

    fn reject_all(_: &Arbiter) -> bool {
        false
    }

    fn bottom(world: &World, handle: BodyHandle) -> f32 {
        world.body(handle).expect("body").translation().y + 22.5
    }

    #[test]
    fn when_stepping_then_gravity_accelerates_dynamic_bodies_only() {
        let mut world = world();
        let falling = world.add(crate_box(Vec2::zeros()));
        let fixed = world.add(floor());

        world.step(DT);

        let body = world.body(falling).expect("falling body");
        assert!(body.linvel().y > 14.0 && body.linvel().y <= 15.0);
        assert!(body.translation().y > 0.0);
        assert_eq!(
            *world.body(fixed).expect("floor").translation(),
            Vec2::new(0.0, 100.0)
        );
    }

    #[test]
    fn when_body_lands_on_solid_platform_then_it_rests_on_top() {
        let mut world = world();
        world.set_handler(
            CollisionType::Platform,
            CollisionType::Player,
            CollisionHandler::solid(),
        );
        world.add(floor());
        let player = world.add(crate_box(Vec2::zeros()));

        for _ in 0..120 {
            world.step(DT);
        }

        let resting = bottom(&world, player);
        assert!((resting - 90.0).abs() < 1.0, "bottom = {resting}");
        assert!(world.body(player).expect("player").linvel().y.abs() < 20.0);
    }

    #[test]
    fn when_pre_solve_rejects_then_body_falls_through_but_begin_is_reported() {
        let mut world = world();
        world.set_handler(
            CollisionType::Platform,
            CollisionType::Player,
            CollisionHandler::solid().with_pre_solve(reject_all),
        );
        world.add(floor());
        let player = world.add(crate_box(Vec2::zeros()));

        let mut phases = Vec::new();
        for _ in 0..120 {
            world.step(DT);
            phases.extend(world.drain_events().into_iter().map(|e| e.phase));
        }

        assert!(bottom(&world, player) > 155.0);
        assert!(phases.contains(&ContactPhase::Begin));
        assert!(phases.contains(&ContactPhase::Separate));
        assert!(!phases.contains(&ContactPhase::PreSolve));
    }

    #[test]
    fn when_pair_has_no_handler_then_bodies_pass_through_silently() {
        let mut world = world();
        world.add(floor());
        let player = world.add(crate_box(Vec2::zeros()));

        for _ in 0..120 {
            world.step(DT);
        }

        assert!(bottom(&world, player) > 155.0);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn when_events_are_reported_then_first_tag_of_handler_is_side_a() {
        let mut world = world();
        world.set_handler(
            CollisionType::Player,
            CollisionType::Pickup,
            CollisionHandler::sensor(),
        );
        let pickup = world.add(
            BodyDesc::fixed(Shape::circle(10.0), CollisionType::Pickup)
                .at(Vec2::new(0.0, 30.0))
                .as_sensor(),
        );
        let player = world.add(crate_box(Vec2::zeros()));

        world.step(DT);

        let events = world.drain_events();
        let begin = events
            .iter()
            .find(|e| e.is(ContactPhase::Begin, CollisionType::Player, CollisionType::Pickup))
            .expect("begin event");
        assert_eq!(begin.a, player);
        assert_eq!(begin.b, pickup);
        // Sensors never push.
        assert!(world.body(player).expect("player").translation().y < 1.0);
    }

    #[test]
    fn when_body_is_removed_then_its_contacts_separate() {
        let mut world = world();
        world.set_handler(
            CollisionType::Platform,
            CollisionType::Player,
            CollisionHandler::solid(),
        );
        let platform = world.add(floor());
        world.add(crate_box(Vec2::new(0.0, 68.0)));
        world.step(DT);
        world.drain_events();

        world.remove(platform).expect("platform removed");

        let events = world.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, ContactPhase::Separate);
    }

    #[test]
    fn when_riding_kinematic_platform_then_rider_is_carried() {
        let mut world = world();
        world.set_handler(
            CollisionType::Platform,
            CollisionType::Player,
            CollisionHandler::solid(),
        );
        let platform = world.add(
            BodyDesc::kinematic_position_based(Shape::rect(200.0, 20.0), CollisionType::Platform)
                .at(Vec2::new(0.0, 100.0)),
        );
        let rider = world.add(crate_box(Vec2::new(0.0, 67.5)));

        for tick in 1..=60 {
            let x = 60.0 * tick as f32 * DT;
            world
                .body_mut(platform)
                .expect("platform")
                .set_next_kinematic_translation(Vec2::new(x, 100.0));
            world.step(DT);
        }

        let platform_x = world.body(platform).expect("platform").translation().x;
        let rider_x = world.body(rider).expect("rider").translation().x;
        assert!((platform_x - 60.0).abs() < 0.01);
        assert!(rider_x > 50.0 && rider_x <= 60.5, "rider at {rider_x}");
    }

    #[test]
    fn when_impulse_applied_then_velocity_changes_by_impulse_over_mass() {
        let mut world = world();
        let player = world.add(crate_box(Vec2::zeros()));
        let wall = world.add(floor());

        let body = world.body_mut(player).expect("player");
        apply_impulse(body, Vec2::new(2500.0, 0.0), 10.0);
        assert_eq!(*body.linvel(), Vec2::new(250.0, 0.0));

        let body = world.body_mut(wall).expect("wall");
        apply_impulse(body, Vec2::new(2500.0, 0.0), 10.0);
        assert_eq!(*body.linvel(), Vec2::zeros());
    }
}

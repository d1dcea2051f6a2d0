//! Strategies that delegate movement to an external navigator.
//!
//! Path finding and locomotion live outside this crate; the world only has to implement
//! [`Navigator`].

use core::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ActionStrategy, DeterministicRng, TickContext};

const WANDER_RNG_STREAM: u64 = 0x3A4D_E500;
const WANDER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Movement collaborator implemented by the host world.
pub trait Navigator {
    fn position(&self) -> Position;

    fn set_destination(&mut self, destination: Position);

    fn has_path(&self, _destination: Position) -> bool {
        true
    }

    fn is_at_destination(&self) -> bool;

    fn stop_movement(&mut self);
}

/// Walk to a target chosen at start time, then run `on_arrival` once.
pub struct MoveStrategy<W, T, A>
where
    T: Fn(&W) -> Option<Position>,
    A: FnMut(&mut W),
{
    target: T,
    on_arrival: A,
    arrived: bool,
    _world: PhantomData<fn(&mut W)>,
}

impl<W, T, A> MoveStrategy<W, T, A>
where
    T: Fn(&W) -> Option<Position>,
    A: FnMut(&mut W),
{
    pub fn new(target: T, on_arrival: A) -> Self {
        Self {
            target,
            on_arrival,
            arrived: false,
            _world: PhantomData,
        }
    }
}

impl<W, T, A> ActionStrategy<W> for MoveStrategy<W, T, A>
where
    W: Navigator,
    T: Fn(&W) -> Option<Position>,
    A: FnMut(&mut W),
{
    fn can_perform(&self, _world: &W) -> bool {
        !self.arrived
    }

    fn is_complete(&self, _world: &W) -> bool {
        self.arrived
    }

    fn start(&mut self, _ctx: &TickContext, world: &mut W) {
        self.arrived = false;
        match (self.target)(world) {
            Some(destination) => world.set_destination(destination),
            None => {
                tracing::warn!("move target unavailable, finishing without arrival");
                world.stop_movement();
                self.arrived = true;
            }
        }
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) {
        if world.is_at_destination() {
            self.arrived = true;
            (self.on_arrival)(world);
            world.stop_movement();
        }
    }

    fn stop(&mut self, _ctx: &TickContext, world: &mut W) {
        world.stop_movement();
    }
}

/// Walk to a random reachable point within `radius`.
#[derive(Debug, Clone, Copy)]
pub struct WanderStrategy {
    radius: f32,
}

impl WanderStrategy {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl<W> ActionStrategy<W> for WanderStrategy
where
    W: Navigator,
{
    fn can_perform(&self, world: &W) -> bool {
        !world.is_at_destination()
    }

    fn is_complete(&self, world: &W) -> bool {
        world.is_at_destination()
    }

    fn start(&mut self, ctx: &TickContext, world: &mut W) {
        let mut rng = ctx.rng(WANDER_RNG_STREAM);
        let origin = world.position();
        for _ in 0..WANDER_ATTEMPTS {
            let angle = rng.next_f32_unit() * core::f32::consts::TAU;
            let reach = rng.next_f32_unit().sqrt() * self.radius;
            let candidate = origin.offset(angle.cos() * reach, angle.sin() * reach);
            if world.has_path(candidate) {
                world.set_destination(candidate);
                return;
            }
        }
        world.stop_movement();
    }

    fn stop(&mut self, _ctx: &TickContext, world: &mut W) {
        world.stop_movement();
    }
}

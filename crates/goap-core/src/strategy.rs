use core::marker::PhantomData;

use crate::{CountdownTimer, TickContext};

/// How an action is carried out once the agent has committed to it.
///
/// The agent calls `start` once, `update` every tick while `can_perform` holds, and `stop` once when
/// the action completes or is preempted. It only ever reacts to `is_complete`.
pub trait ActionStrategy<W> {
    fn can_perform(&self, _world: &W) -> bool {
        true
    }

    fn is_complete(&self, world: &W) -> bool;

    fn start(&mut self, _ctx: &TickContext, _world: &mut W) {}

    fn update(&mut self, _ctx: &TickContext, _world: &mut W) {}

    fn stop(&mut self, _ctx: &TickContext, _world: &mut W) {}
}

/// Wait for a fixed duration.
#[derive(Debug, Clone)]
pub struct IdleStrategy {
    timer: CountdownTimer,
    complete: bool,
}

impl IdleStrategy {
    pub fn new(duration_seconds: f32) -> Self {
        Self {
            timer: CountdownTimer::new(duration_seconds),
            complete: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }
}

impl<W> ActionStrategy<W> for IdleStrategy {
    fn is_complete(&self, _world: &W) -> bool {
        self.complete
    }

    fn start(&mut self, _ctx: &TickContext, _world: &mut W) {
        self.complete = false;
        self.timer.stop();
        self.timer.start();
    }

    fn update(&mut self, ctx: &TickContext, _world: &mut W) {
        if self.timer.tick(ctx.dt_seconds) {
            self.complete = true;
        }
    }

    fn stop(&mut self, _ctx: &TickContext, _world: &mut W) {
        self.timer.stop();
    }
}

/// Run a closure every update until it reports completion.
///
/// Handy for instantaneous world edits and for tests.
pub struct FnStrategy<W, F>
where
    F: FnMut(&TickContext, &mut W) -> bool,
{
    step: F,
    complete: bool,
    _world: PhantomData<fn(&mut W)>,
}

impl<W, F> FnStrategy<W, F>
where
    F: FnMut(&TickContext, &mut W) -> bool,
{
    pub fn new(step: F) -> Self {
        Self {
            step,
            complete: false,
            _world: PhantomData,
        }
    }
}

impl<W, F> ActionStrategy<W> for FnStrategy<W, F>
where
    F: FnMut(&TickContext, &mut W) -> bool,
{
    fn can_perform(&self, _world: &W) -> bool {
        !self.complete
    }

    fn is_complete(&self, _world: &W) -> bool {
        self.complete
    }

    fn start(&mut self, _ctx: &TickContext, _world: &mut W) {
        self.complete = false;
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) {
        self.complete = (self.step)(ctx, world);
    }
}

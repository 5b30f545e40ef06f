use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};

#[derive(Debug)]
pub(super) enum LoopEvent {
    Tick,
    Render,
    Terminal(Event),
}

/// Yields ticks at a fixed rate, renders after every state change, and terminal
/// events in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_rate: f64) -> Self {
        let now = Instant::now();
        Self {
            tick_interval: Duration::from_secs_f64(1.0 / tick_rate),
            last_tick: now,
            dirty: true, // the first frame
        }
    }

    /// Requests a redraw on the next iteration.
    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Blocks until the next tick is due, a redraw is pending, or a terminal event
    /// arrives.
    pub(super) fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                return Ok(LoopEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(LoopEvent::Render);
            }

            let timeout = (self.last_tick + self.tick_interval).saturating_duration_since(now);
            if !event::poll(timeout)? {
                continue;
            }

            self.dirty = true;
            return Ok(LoopEvent::Terminal(event::read()?));
        }
    }
}

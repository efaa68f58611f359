//! Frame loop glue between queued commands, the arena and the scene.

use crossbeam_channel::{Receiver, TryRecvError};
use fishtank_core::{Command, Event};
use fishtank_rendering::{FrameControl, Scene};
use fishtank_world::{self as world, query, Arena};
use tracing::{debug, info};

/// Owns the arena and advances it once per presented frame.
#[derive(Debug)]
pub(crate) struct Driver {
    arena: Arena,
    commands: Receiver<Command>,
    frame_limit: Option<u64>,
    frames: u64,
    events: Vec<Event>,
}

impl Driver {
    pub(crate) fn new(arena: Arena, commands: Receiver<Command>, frame_limit: Option<u64>) -> Self {
        Self {
            arena,
            commands,
            frame_limit,
            frames: 0,
            events: Vec::new(),
        }
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Applies a command outside the frame loop, e.g. while stocking.
    pub(crate) fn submit(&mut self, command: Command) {
        world::apply(&mut self.arena, command, &mut self.events);
        self.flush_events();
    }

    /// Advances one frame: drains queued commands, ticks, refreshes the scene.
    ///
    /// Commands are never applied mid-tick. The loop ends on shutdown, when
    /// the command channel disconnects or when the frame limit is reached.
    pub(crate) fn step(&mut self, scene: &mut Scene) -> FrameControl {
        if !self.drain_pending_commands() {
            return FrameControl::Exit;
        }
        if self
            .frame_limit
            .is_some_and(|limit| self.frames >= limit)
        {
            info!(frames = self.frames, "frame limit reached");
            return FrameControl::Exit;
        }

        self.frames += 1;
        world::apply(&mut self.arena, Command::Tick, &mut self.events);
        self.flush_events();
        scene.refresh(
            &query::fish_view(&self.arena),
            &query::food_view(&self.arena),
            query::is_paused(&self.arena),
        );
        FrameControl::Continue
    }

    fn drain_pending_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    debug!(?command, "applying queued command");
                    self.submit(command);
                    if !query::is_running(&self.arena) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    info!("command channel closed");
                    return false;
                }
            }
        }
    }

    fn flush_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                Event::TimeAdvanced { .. } => {}
                Event::FoodEaten { .. } | Event::FishGrew { .. } | Event::FollowStarted { .. } => {
                    debug!(?event, "arena event");
                }
                other => info!(event = ?other, "arena event"),
            }
        }
    }
}

//! Rendering backends that write composed frames to a byte stream.

use std::{
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result as AnyResult};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use fishtank_rendering::{Frame, FrameControl, Presentation, RenderingBackend, Scene};
use tracing::info;

/// Redraws the tank in place on an ANSI terminal, paced to the frame interval.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W: Write> {
    out: W,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    fn drive<F>(&mut self, interval: Duration, scene: &mut Scene, update_scene: &mut F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        loop {
            let started = Instant::now();
            if update_scene(interval, scene) == FrameControl::Exit {
                return Ok(());
            }
            draw(&mut self.out, &Frame::compose(scene)).context("failed to draw frame")?;
            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let Presentation {
            title,
            frame_interval,
            mut scene,
        } = presentation;

        execute!(
            self.out,
            EnterAlternateScreen,
            SetTitle(&title),
            cursor::Hide,
            Clear(ClearType::All)
        )
        .context("failed to prepare terminal")?;
        info!(%title, ?frame_interval, "terminal backend started");

        let outcome = self.drive(frame_interval, &mut scene, &mut update_scene);
        let restored = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen);
        outcome?;
        restored.context("failed to restore terminal")
    }
}

/// Runs frames back to back without drawing, then prints the final frame.
#[derive(Debug)]
pub(crate) struct HeadlessBackend<W: Write> {
    out: W,
}

impl<W: Write> HeadlessBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for HeadlessBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let Presentation {
            title,
            frame_interval,
            mut scene,
        } = presentation;
        info!(%title, "headless backend started");

        let mut frames = 0_u64;
        while update_scene(frame_interval, &mut scene) == FrameControl::Continue {
            frames += 1;
        }
        info!(frames, "headless run finished");

        writeln!(self.out, "{}", Frame::compose(&scene).to_plain_text())
            .context("failed to write final frame")?;
        self.out.flush().context("failed to flush output")
    }
}

fn draw<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    queue!(out, BeginSynchronizedUpdate)?;
    let mut colour = None;
    for (row, cells) in (0_u16..).zip(frame.rows()) {
        queue!(out, cursor::MoveTo(0, row))?;
        for cell in cells {
            if cell.colour != colour {
                match cell.colour {
                    Some(index) => queue!(out, SetForegroundColor(Color::AnsiValue(index)))?,
                    None => queue!(out, ResetColor)?,
                }
                colour = cell.colour;
            }
            queue!(out, Print(cell.symbol))?;
        }
    }

    let below = u16::try_from(frame.height()).unwrap_or(u16::MAX);
    queue!(
        out,
        ResetColor,
        cursor::MoveTo(0, below),
        Clear(ClearType::CurrentLine),
        EndSynchronizedUpdate
    )?;
    out.flush()
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Wa-Tor adapters.
//!
//! Frames are plain text: one glyph per cell, rows joined by newlines and a
//! trailing newline after the last row. The glyph legend is the same one
//! accepted by preset fields, so a rendered frame can be pasted back into a
//! configuration as a starting layout.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use wator_core::{Cell, OceanView};

/// Renders the ocean using the glyph legend.
#[must_use]
pub fn render(view: &OceanView<'_>) -> String {
    let (width, height) = view.dimensions();
    let mut text = String::with_capacity((width as usize + 1) * height as usize);
    for row in view.rows() {
        text.extend(row.iter().map(Cell::glyph));
        text.push('\n');
    }
    text
}

/// Rendered snapshot of the ocean after a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Tick after which the frame was captured; zero is the starting ocean.
    pub tick: u64,
    /// Rendered text, terminated by a newline.
    pub text: String,
}

impl Frame {
    /// Captures a frame from the provided view.
    #[must_use]
    pub fn capture(tick: u64, view: &OceanView<'_>) -> Self {
        Self {
            tick,
            text: render(view),
        }
    }
}

/// Rendering backend capable of presenting ocean frames.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Backend that writes frames back to back into an output sink.
#[derive(Debug)]
pub struct TextBackend<W> {
    sink: W,
    presented: u64,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing into `sink`.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            presented: 0,
        }
    }

    /// Number of frames written so far.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Consumes the backend, yielding the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        self.sink
            .write_all(frame.text.as_bytes())
            .with_context(|| format!("failed to write frame for tick {}", frame.tick))?;
        self.sink.flush().context("failed to flush frame output")?;
        self.presented += 1;
        Ok(())
    }
}

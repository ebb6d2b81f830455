//! crossterm output for rendered lines.

use std::io::{self, Write};

use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

use super::palette::Theme;
use super::Line;

/// Writes lines with or without ANSI styling.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    theme: Theme,
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { theme: Theme::default(), color }
    }

    pub fn write_lines<W: Write>(&self, out: &mut W, lines: &[Line]) -> io::Result<()> {
        for line in lines {
            self.write_line(out, line)?;
        }
        out.flush()
    }

    fn write_line<W: Write>(&self, out: &mut W, line: &Line) -> io::Result<()> {
        if line.indent > 0 {
            queue!(out, Print(" ".repeat(line.indent)))?;
        }
        for span in &line.spans {
            if !self.color {
                queue!(out, Print(&span.text))?;
                continue;
            }
            if let Some(color) = self.theme.color(span.tone) {
                queue!(out, SetForegroundColor(color))?;
            }
            if span.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(out, Print(&span.text), SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(out, Print("\n"))
    }

    /// Clear the screen and home the cursor. No-op without colour, so piped
    /// output stays append-only.
    pub fn clear<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.color {
            queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        }
        Ok(())
    }
}

/// Terminal width, 100 columns when it can't be read.
pub fn width() -> usize {
    crossterm::terminal::size().map(|(w, _)| w as usize).unwrap_or(100)
}

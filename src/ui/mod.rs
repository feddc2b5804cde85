//! Terminal output.
//!
//! The output activity is the only writer to the terminal. It keeps a single
//! editable prompt (`<channel>> <typed text>`) on the bottom line and inserts
//! message lines above it as they arrive.

pub mod colors;
pub mod input;

use crate::app::event::{OutputEvent, OutputReceiver};
use crate::app::state::{PendingInput, Session};
use crossterm::cursor::{MoveToColumn, MoveToPreviousLine};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use std::io::{self, Write};
use std::thread;
use unicode_width::UnicodeWidthStr;

const FALLBACK_COLUMNS: u16 = 80;

/// Renders message lines and the prompt onto a writer.
pub struct Screen<W: Write> {
    out: W,
    session: Session,
    input: PendingInput,
    /// Extra rows the last prompt wrapped onto.
    prompt_rows: u16,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, session: Session, input: PendingInput) -> Self {
        Self {
            out,
            session,
            input,
            prompt_rows: 0,
        }
    }

    fn prompt_line(&self) -> String {
        let prompt = self.session.lock().prompt();
        format!("{}{}", prompt, self.input.text())
    }

    fn clear_prompt(&mut self) -> io::Result<()> {
        if self.prompt_rows > 0 {
            queue!(self.out, MoveToPreviousLine(self.prompt_rows))?;
        }
        queue!(self.out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        self.prompt_rows = 0;
        Ok(())
    }

    fn draw_prompt(&mut self) -> io::Result<()> {
        let line = self.prompt_line();
        let columns = terminal::size()
            .map(|(cols, _)| cols)
            .unwrap_or(FALLBACK_COLUMNS)
            .max(1) as usize;
        queue!(self.out, Print(&line))?;
        self.prompt_rows = (line.width().saturating_sub(1) / columns) as u16;
        self.out.flush()
    }

    /// Insert `text` above the prompt and repaint the prompt below it.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.clear_prompt()?;
        // Raw mode: no implicit carriage return on newline.
        queue!(self.out, Print(text), Print("\r\n"))?;
        self.draw_prompt()
    }

    pub fn redraw(&mut self) -> io::Result<()> {
        self.clear_prompt()?;
        self.draw_prompt()
    }

    /// Remove the prompt so the shell starts on a clean line.
    pub fn finish(&mut self) -> io::Result<()> {
        self.clear_prompt()?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Drain `rx` onto `screen` until `Shutdown` or until every sender is gone.
/// Runs of consecutive `Redraw` events collapse into one repaint.
pub fn run_output<W: Write>(rx: &mut OutputReceiver, screen: &mut Screen<W>) -> io::Result<()> {
    let mut pending: Option<OutputEvent> = None;
    loop {
        let event = match pending.take() {
            Some(event) => event,
            None => match rx.blocking_recv() {
                Some(event) => event,
                None => break,
            },
        };
        match event {
            OutputEvent::Text(line) => screen.write_line(&line)?,
            OutputEvent::Redraw => {
                while let Ok(next) = rx.try_recv() {
                    if next != OutputEvent::Redraw {
                        pending = Some(next);
                        break;
                    }
                }
                screen.redraw()?;
            }
            OutputEvent::Shutdown => break,
        }
    }
    screen.finish()
}

/// Start the output activity on its own thread.
pub fn spawn_output<W>(
    mut rx: OutputReceiver,
    mut screen: Screen<W>,
) -> io::Result<thread::JoinHandle<io::Result<()>>>
where
    W: Write + Send + 'static,
{
    thread::Builder::new()
        .name("output".into())
        .spawn(move || run_output(&mut rx, &mut screen))
}

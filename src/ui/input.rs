//! Input activity: reads keys one at a time, edits the pending line and hands
//! submitted lines to the interpreter.

use crate::app::event::OutputSink;
use crate::app::interpreter::{Flow, Interpreter};
use crate::app::state::PendingInput;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Submit,
    Quit,
    Ignored,
}

/// Map a terminal event to an editing operation. Ctrl-C always quits; Ctrl-D
/// quits only on an empty line.
pub fn classify(event: &Event, line_is_empty: bool) -> KeyInput {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return KeyInput::Ignored;
    };
    if *kind == KeyEventKind::Release {
        return KeyInput::Ignored;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => KeyInput::Quit,
            KeyCode::Char('d') if line_is_empty => KeyInput::Quit,
            _ => KeyInput::Ignored,
        };
    }

    match code {
        KeyCode::Enter => KeyInput::Submit,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Char(c) => KeyInput::Char(*c),
        _ => KeyInput::Ignored,
    }
}

/// Run until the user quits or the terminal stops delivering events.
pub fn run_input<F>(
    mut next_event: F,
    input: &PendingInput,
    sink: &OutputSink,
    interpreter: &Interpreter,
) -> io::Result<()>
where
    F: FnMut() -> io::Result<Event>,
{
    loop {
        let event = next_event()?;
        match classify(&event, input.text().is_empty()) {
            KeyInput::Char(c) => {
                input.insert_char(c);
                sink.redraw();
            }
            KeyInput::Backspace => {
                input.delete_back();
                sink.redraw();
            }
            KeyInput::Submit => {
                let line = input.take_text();
                sink.redraw();
                if interpreter.handle_line(&line) == Flow::Quit {
                    return Ok(());
                }
            }
            KeyInput::Quit => {
                input.take_text();
                interpreter.handle_line("/quit");
                return Ok(());
            }
            KeyInput::Ignored => {}
        }
    }
}

//! Executes submitted input lines.
//!
//! Channel and nickname changes are applied locally as soon as the request is
//! sent. They are never rolled back: the client has no way to tell that the
//! server refused a join, part or rename.
//!
//! Until the server's welcome arrives only `/quit`, `/nick` and `/help` run;
//! anything addressed to a channel or user is refused with a notice.

use crate::app::action::Action;
use crate::app::event::OutputSink;
use crate::app::state::Session;
use crate::irc::commands::{parse_command, ParsedCommand, HELP_LINES};
use crate::irc::transport::Outbox;
use crate::ui::colors::colorize;

const NOT_REGISTERED: &str = "Not connected yet: wait for the server welcome.";

/// What the input activity should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Interpreter {
    session: Session,
    sink: OutputSink,
    outbox: Outbox,
    quit_message: String,
}

impl Interpreter {
    pub fn new(session: Session, sink: OutputSink, outbox: Outbox, quit_message: String) -> Self {
        Self {
            session,
            sink,
            outbox,
            quit_message,
        }
    }

    pub fn handle_line(&self, line: &str) -> Flow {
        let Some(command) = parse_command(line) else {
            return Flow::Continue;
        };
        if command.needs_registration() && !self.session.lock().registered {
            self.sink.text(NOT_REGISTERED);
            return Flow::Continue;
        }

        match command {
            ParsedCommand::Quit { message } => {
                self.outbox.send(&Action::Quit {
                    message: message.unwrap_or_else(|| self.quit_message.clone()),
                });
                self.sink.shutdown();
                return Flow::Quit;
            }
            ParsedCommand::Join { channel } => {
                self.outbox.send(&Action::Join {
                    channel: channel.clone(),
                });
                self.session.lock().current_channel = channel;
                self.sink.redraw();
            }
            ParsedCommand::Part { channel } => {
                self.outbox.send(&Action::Part {
                    channel: channel.clone(),
                });
                self.session.lock().joined_channels.remove(&channel);
            }
            ParsedCommand::Nick { nick } => {
                self.session.lock().nickname = nick.clone();
                self.outbox.send(&Action::Nick { nick });
            }
            ParsedCommand::Msg { target, text } => {
                let echo = format!("[PM -> {}] {}", colorize(&target), text);
                self.outbox.send(&Action::Privmsg { target, text });
                self.sink.text(echo);
            }
            ParsedCommand::Notice { target, text } => {
                let echo = format!("[NOTICE -> {}] {}", colorize(&target), text);
                self.outbox.send(&Action::Notice { target, text });
                self.sink.text(echo);
            }
            ParsedCommand::Me { text } => {
                let (channel, nick) = self.channel_and_nick();
                if !channel.is_empty() && !text.is_empty() {
                    let echo = format!("* {} {}", nick, text);
                    self.outbox.send(&Action::CtcpAction {
                        target: channel,
                        text,
                    });
                    self.sink.text(echo);
                }
            }
            ParsedCommand::Topic { text } => {
                let (channel, _) = self.channel_and_nick();
                if !channel.is_empty() && !text.is_empty() {
                    self.outbox.send(&Action::Topic { channel, text });
                }
            }
            ParsedCommand::Say { text } => {
                let (channel, nick) = self.channel_and_nick();
                if !channel.is_empty() {
                    let echo = format!("{} {}", colorize(&nick), text);
                    self.outbox.send(&Action::Privmsg {
                        target: channel,
                        text,
                    });
                    self.sink.text(echo);
                }
            }
            ParsedCommand::Help => {
                for line in HELP_LINES {
                    self.sink.text(*line);
                }
            }
            ParsedCommand::Usage(usage) => self.sink.text(format!("Usage: {}", usage)),
            ParsedCommand::Unknown(cmd) => self.sink.text(format!("Unknown command: {}", cmd)),
        }
        Flow::Continue
    }

    fn channel_and_nick(&self) -> (String, String) {
        let state = self.session.lock();
        (state.current_channel.clone(), state.nickname.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::{drain, drain_text, OutputEvent, OutputReceiver};
    use crate::app::state::SessionState;
    use crate::irc::transport::RecordingTransport;
    use std::sync::Arc;

    fn registered(channel: &str) -> Session {
        let session = Session::new(SessionState::new("Guest", channel));
        session.lock().registered = true;
        session
    }

    fn fixture(channel: &str) -> (Interpreter, Session, Arc<RecordingTransport>, OutputReceiver) {
        let session = registered(channel);
        let transport = Arc::new(RecordingTransport::default());
        let (sink, rx) = OutputSink::channel();
        let outbox = Outbox::new(transport.clone(), sink.clone());
        let interpreter = Interpreter::new(session.clone(), sink, outbox, "bye".into());
        (interpreter, session, transport, rx)
    }

    #[test]
    fn test_msg_sends_once_and_echoes_once() {
        let (interp, _, transport, mut rx) = fixture("#test");
        assert_eq!(interp.handle_line("/msg alice hello there"), Flow::Continue);
        assert_eq!(transport.lines(), vec!["PRIVMSG alice :hello there"]);
        assert_eq!(
            drain_text(&mut rx),
            vec![format!("[PM -> {}] hello there", colorize("alice"))]
        );
    }

    #[test]
    fn test_msg_without_arguments_only_prints_usage() {
        let (interp, _, transport, mut rx) = fixture("#test");
        interp.handle_line("/msg");
        assert!(transport.lines().is_empty());
        assert_eq!(
            drain(&mut rx),
            vec![OutputEvent::Text("Usage: /msg <nick> <message>".into())]
        );
    }

    #[test]
    fn test_notice_usage_and_send() {
        let (interp, _, transport, mut rx) = fixture("#test");
        interp.handle_line("/notice bob");
        interp.handle_line("/notice bob see you at noon");
        assert_eq!(transport.lines(), vec!["NOTICE bob :see you at noon"]);
        assert_eq!(
            drain_text(&mut rx),
            vec![
                "Usage: /notice <nick> <message>".to_string(),
                format!("[NOTICE -> {}] see you at noon", colorize("bob")),
            ]
        );
    }

    #[test]
    fn test_join_is_optimistic_for_current_channel_only() {
        let (interp, session, transport, mut rx) = fixture("#test");
        interp.handle_line("/join #rust");
        let state = session.snapshot();
        assert_eq!(state.current_channel, "#rust");
        assert!(!state.joined_channels.contains("#rust"));
        assert_eq!(transport.lines(), vec!["JOIN #rust"]);
        assert_eq!(drain(&mut rx), vec![OutputEvent::Redraw]);
    }

    #[test]
    fn test_part_removes_locally() {
        let (interp, session, transport, _rx) = fixture("#test");
        session.lock().joined_channels.insert("#test".into());
        interp.handle_line("/part #test");
        assert!(session.snapshot().joined_channels.is_empty());
        assert_eq!(transport.lines(), vec!["PART #test"]);
    }

    #[test]
    fn test_nick_updates_immediately() {
        let (interp, session, transport, _rx) = fixture("#test");
        interp.handle_line("/nick ferris");
        assert_eq!(session.snapshot().nickname, "ferris");
        assert_eq!(transport.lines(), vec!["NICK ferris"]);
    }

    #[test]
    fn test_plain_text_goes_to_current_channel() {
        let (interp, _, transport, mut rx) = fixture("#test");
        interp.handle_line("hi all");
        assert_eq!(transport.lines(), vec!["PRIVMSG #test :hi all"]);
        assert_eq!(
            drain_text(&mut rx),
            vec![format!("{} hi all", colorize("Guest"))]
        );
    }

    #[test]
    fn test_plain_text_without_channel_is_dropped() {
        let (interp, _, transport, mut rx) = fixture("");
        interp.handle_line("anyone here?");
        interp.handle_line("/me shrugs");
        interp.handle_line("/topic nothing");
        assert!(transport.lines().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_me_and_topic() {
        let (interp, _, transport, mut rx) = fixture("#test");
        interp.handle_line("/me waves");
        interp.handle_line("/topic Rust all day");
        interp.handle_line("/me");
        assert_eq!(
            transport.lines(),
            vec![
                "PRIVMSG #test :\x01ACTION waves\x01",
                "TOPIC #test :Rust all day"
            ]
        );
        assert_eq!(drain_text(&mut rx), vec!["* Guest waves"]);
    }

    #[test]
    fn test_empty_line_does_nothing() {
        let (interp, _, transport, mut rx) = fixture("#test");
        assert_eq!(interp.handle_line(""), Flow::Continue);
        assert_eq!(interp.handle_line("   "), Flow::Continue);
        assert!(transport.lines().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_quit_sends_farewell_and_stops_output() {
        let (interp, _, transport, mut rx) = fixture("#test");
        assert_eq!(interp.handle_line("/quit"), Flow::Quit);
        assert_eq!(transport.lines(), vec!["QUIT :bye"]);
        assert_eq!(drain(&mut rx), vec![OutputEvent::Shutdown]);

        let (interp, _, transport, _rx) = fixture("#test");
        interp.handle_line("/quit gone fishing");
        assert_eq!(transport.lines(), vec!["QUIT :gone fishing"]);
    }

    #[test]
    fn test_unknown_command_sends_nothing() {
        let (interp, _, transport, mut rx) = fixture("#test");
        interp.handle_line("/whois alice");
        assert!(transport.lines().is_empty());
        assert_eq!(drain_text(&mut rx), vec!["Unknown command: /whois"]);
    }

    #[test]
    fn test_send_failure_is_reported_and_session_continues() {
        let session = registered("#test");
        let (sink, mut rx) = OutputSink::channel();
        let outbox = Outbox::new(Arc::new(RecordingTransport::failing()), sink.clone());
        let interp = Interpreter::new(session, sink, outbox, "bye".into());

        assert_eq!(interp.handle_line("hello"), Flow::Continue);
        assert_eq!(interp.handle_line("again"), Flow::Continue);
        let lines = drain_text(&mut rx);
        assert_eq!(lines[0], "[send error] connection closed");
        assert_eq!(lines[2], "[send error] connection closed");
    }

    #[test]
    fn test_channel_commands_wait_for_registration() {
        let (interp, session, transport, mut rx) = fixture("##chat");
        session.lock().registered = false;

        interp.handle_line("hello early");
        interp.handle_line("/join #rust");
        interp.handle_line("/msg alice hi");
        assert!(transport.lines().is_empty());
        assert_eq!(session.snapshot().current_channel, "##chat");
        assert_eq!(drain_text(&mut rx), vec![NOT_REGISTERED; 3]);

        interp.handle_line("/nick ferris");
        assert_eq!(transport.lines(), vec!["NICK ferris"]);

        session.lock().registered = true;
        interp.handle_line("hello now");
        assert_eq!(transport.lines()[1], "PRIVMSG ##chat :hello now");
    }

    #[test]
    fn test_quit_works_before_registration() {
        let (interp, session, transport, _rx) = fixture("##chat");
        session.lock().registered = false;
        assert_eq!(interp.handle_line("/quit"), Flow::Quit);
        assert_eq!(transport.lines(), vec!["QUIT :bye"]);
    }
}

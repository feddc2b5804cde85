//! Protocol event dispatch.
//!
//! Turns parsed server lines into session updates, replies and rendered
//! output. Lines are handled one at a time, in arrival order, on the receive
//! activity.

use crate::app::action::Action;
use crate::app::event::OutputSink;
use crate::app::state::Session;
use crate::config::AppConfig;
use crate::irc::codec::ProtocolMessage;
use crate::irc::transport::Outbox;
use crate::ui::colors::colorize;
use std::time::Duration;

/// Announce the nickname and user to the server. Sent once, right after the
/// connection is established and before anything is read.
pub fn register(outbox: &Outbox, nickname: &str) {
    outbox.send(&Action::Nick {
        nick: nickname.to_string(),
    });
    outbox.send(&Action::User {
        username: nickname.to_string(),
        realname: nickname.to_string(),
    });
}

pub struct Dispatcher {
    session: Session,
    sink: OutputSink,
    outbox: Outbox,
    password: Option<String>,
    initial_channel: String,
    identify_delay: Duration,
}

impl Dispatcher {
    pub fn new(session: Session, sink: OutputSink, outbox: Outbox, config: &AppConfig) -> Self {
        Self {
            session,
            sink,
            outbox,
            password: Some(config.password.clone()).filter(|p| !p.is_empty()),
            initial_channel: config.channel.clone(),
            identify_delay: Duration::from_millis(config.identify_delay_ms),
        }
    }

    pub fn handle_message(&self, msg: &ProtocolMessage) {
        match msg.command.as_str() {
            "" => {}
            "PING" => self.outbox.send(&Action::Pong {
                token: msg.last_arg().map(str::to_string),
            }),
            "001" => self.on_welcome(),
            "433" => self.on_nick_in_use(),
            "PRIVMSG" => self.on_privmsg(msg),
            "JOIN" => self.on_join(msg),
            "PART" => self.on_part(msg),
            "QUIT" => {
                let who = msg.origin_nick().unwrap_or("?");
                let reason = msg.arg(0).unwrap_or("");
                self.sink.text(format!("*** {} quit ({})", colorize(who), reason));
            }
            "NOTICE" => {
                let who = msg.origin_nick().unwrap_or("");
                let text = msg.last_arg().unwrap_or("");
                self.sink.text(format!("[NOTICE] {}: {}", who, text));
            }
            _ if msg.is_numeric() => {
                let args = msg.arguments.join(" ");
                self.sink.text(format!("<< {} {}", msg.command, args));
            }
            other => tracing::trace!(command = other, "ignored"),
        }
    }

    /// The receive activity has ended.
    pub fn disconnected(&self) {
        tracing::info!("connection closed");
        self.sink.text("Disconnected.");
    }

    fn on_welcome(&self) {
        {
            let mut state = self.session.lock();
            if state.registered {
                return;
            }
            state.registered = true;
        }
        tracing::info!("registered");
        self.sink.text("Connected.");

        if let Some(password) = &self.password {
            self.outbox.send(&Action::Identify {
                password: password.clone(),
            });
            // Give services a moment to apply the identification before the
            // join, so the join happens under the identified account.
            if !self.identify_delay.is_zero() {
                std::thread::sleep(self.identify_delay);
            }
        }

        self.outbox.send(&Action::Join {
            channel: self.initial_channel.clone(),
        });
        self.session
            .lock()
            .joined_channels
            .insert(self.initial_channel.clone());
    }

    fn on_nick_in_use(&self) {
        let nick = {
            let mut state = self.session.lock();
            let suffix = chrono::Utc::now().timestamp().rem_euclid(1000);
            state.nickname = format!("{}_{}", state.nickname, suffix);
            state.nickname.clone()
        };
        tracing::warn!(retry = %nick, "nickname in use");
        self.outbox.send(&Action::Nick { nick });
    }

    fn on_privmsg(&self, msg: &ProtocolMessage) {
        if msg.arguments.len() < 2 {
            return;
        }
        let (Some(target), Some(text)) = (msg.arg(0), msg.last_arg()) else {
            return;
        };
        let is_private = {
            let state = self.session.lock();
            if !state.registered {
                return;
            }
            state.is_self(target)
        };

        let who = colorize(msg.origin_nick().unwrap_or("?"));
        let body = match ctcp_action(text) {
            Some(action) => format!("* {} {}", who, action),
            None => format!("{} {}", who, text),
        };
        if is_private {
            self.sink.text(format!("[PM] {}", body));
        } else {
            self.sink.text(body);
        }
    }

    fn on_join(&self, msg: &ProtocolMessage) {
        let (Some(who), Some(channel)) = (msg.origin_nick(), msg.arg(0)) else {
            return;
        };
        let is_self = {
            let mut state = self.session.lock();
            let is_self = state.is_self(who);
            if is_self {
                state.joined_channels.insert(channel.to_string());
            }
            is_self
        };
        if is_self {
            self.sink.text(format!("*** joined {}", channel));
        } else {
            self.sink.text(format!("*** {} joined {}", colorize(who), channel));
        }
    }

    fn on_part(&self, msg: &ProtocolMessage) {
        let (Some(who), Some(channel)) = (msg.origin_nick(), msg.arg(0)) else {
            return;
        };
        {
            let mut state = self.session.lock();
            if state.is_self(who) {
                state.joined_channels.remove(channel);
            }
        }
        self.sink.text(format!("*** {} left {}", colorize(who), channel));
    }
}

/// Payload of a CTCP ACTION (`\x01ACTION text\x01`), if `text` is one.
fn ctcp_action(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("\x01ACTION ")?;
    Some(inner.strip_suffix('\x01').unwrap_or(inner))
}

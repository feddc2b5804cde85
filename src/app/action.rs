use std::fmt;

/// An outgoing protocol command. `Display` renders the wire line without its
/// terminator; framing happens in the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Nick { nick: String },
    User { username: String, realname: String },
    Pong { token: Option<String> },
    Identify { password: String },
    Join { channel: String },
    Part { channel: String },
    Privmsg { target: String, text: String },
    CtcpAction { target: String, text: String },
    Notice { target: String, text: String },
    Topic { channel: String, text: String },
    Quit { message: String },
}

impl Action {
    /// Line safe to write to a log: credentials are masked.
    pub fn redacted(&self) -> String {
        match self {
            Action::Identify { .. } => "PRIVMSG NickServ :IDENTIFY ********".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Nick { nick } => write!(f, "NICK {}", nick),
            Action::User { username, realname } => write!(f, "USER {} 0 * :{}", username, realname),
            Action::Pong { token: Some(token) } => write!(f, "PONG :{}", token),
            Action::Pong { token: None } => write!(f, "PONG"),
            Action::Identify { password } => write!(f, "PRIVMSG NickServ :IDENTIFY {}", password),
            Action::Join { channel } => write!(f, "JOIN {}", channel),
            Action::Part { channel } => write!(f, "PART {}", channel),
            Action::Privmsg { target, text } => write!(f, "PRIVMSG {} :{}", target, text),
            Action::CtcpAction { target, text } => {
                // No CTCP delimiters inside the payload
                let clean = text.replace('\x01', "");
                write!(f, "PRIVMSG {} :\x01ACTION {}\x01", target, clean)
            }
            Action::Notice { target, text } => write!(f, "NOTICE {} :{}", target, text),
            Action::Topic { channel, text } => write!(f, "TOPIC {} :{}", channel, text),
            Action::Quit { message } => write!(f, "QUIT :{}", message),
        }
    }
}

//! User input parser.
//!
//! Classifies a submitted input line as chat text or a `/command` and splits
//! its arguments. Command names are matched exactly (case-sensitive); the
//! last argument of `/msg` and `/notice` keeps its embedded spaces.

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Plain text for the current channel.
    Say { text: String },
    Quit { message: Option<String> },
    Join { channel: String },
    Part { channel: String },
    Nick { nick: String },
    Msg { target: String, text: String },
    Me { text: String },
    Topic { text: String },
    Notice { target: String, text: String },
    Help,
    /// A known command with missing arguments; carries the usage line.
    Usage(&'static str),
    /// A `/word` that is not a command.
    Unknown(String),
}

impl ParsedCommand {
    /// Whether the command addresses channels or users, which the server only
    /// accepts once registration has completed.
    pub fn needs_registration(&self) -> bool {
        !matches!(
            self,
            ParsedCommand::Quit { .. }
                | ParsedCommand::Nick { .. }
                | ParsedCommand::Help
                | ParsedCommand::Usage(_)
                | ParsedCommand::Unknown(_)
        )
    }
}

pub const HELP_LINES: &[&str] = &[
    "/join <channel>          join a channel and make it current",
    "/part <channel>          leave a channel",
    "/nick <nickname>         change nickname",
    "/msg <nick> <message>    send a private message",
    "/notice <nick> <message> send a notice",
    "/me <action>             send an action to the current channel",
    "/topic <text>            set the topic of the current channel",
    "/quit [message]          disconnect and exit",
];

/// Parse one submitted line. Returns `None` for blank input.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if !input.starts_with('/') {
        return Some(ParsedCommand::Say {
            text: input.to_string(),
        });
    }

    let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
    let rest = rest.trim();

    let parsed = match cmd {
        "/quit" => ParsedCommand::Quit {
            message: Some(rest.to_string()).filter(|m| !m.is_empty()),
        },
        "/join" => match first_token(rest) {
            Some(channel) => ParsedCommand::Join { channel },
            None => ParsedCommand::Usage("/join <channel>"),
        },
        "/part" => match first_token(rest) {
            Some(channel) => ParsedCommand::Part { channel },
            None => ParsedCommand::Usage("/part <channel>"),
        },
        "/nick" => match first_token(rest) {
            Some(nick) => ParsedCommand::Nick { nick },
            None => ParsedCommand::Usage("/nick <nickname>"),
        },
        "/msg" => match target_and_text(rest) {
            Some((target, text)) => ParsedCommand::Msg { target, text },
            None => ParsedCommand::Usage("/msg <nick> <message>"),
        },
        "/notice" => match target_and_text(rest) {
            Some((target, text)) => ParsedCommand::Notice { target, text },
            None => ParsedCommand::Usage("/notice <nick> <message>"),
        },
        "/me" => ParsedCommand::Me {
            text: rest.to_string(),
        },
        "/topic" => ParsedCommand::Topic {
            text: rest.to_string(),
        },
        "/help" => ParsedCommand::Help,
        other => ParsedCommand::Unknown(other.to_string()),
    };
    Some(parsed)
}

fn first_token(rest: &str) -> Option<String> {
    rest.split_whitespace().next().map(str::to_string)
}

/// Split `<target> <text...>`; the text is kept whole.
fn target_and_text(rest: &str) -> Option<(String, String)> {
    let (target, text) = rest.split_once(' ')?;
    let text = text.trim_start();
    if target.is_empty() || text.is_empty() {
        return None;
    }
    Some((target.to_string(), text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(
            parse_command("  hello there "),
            Some(ParsedCommand::Say {
                text: "hello there".into()
            })
        );
    }

    #[test]
    fn test_msg_keeps_text_whole() {
        assert_eq!(
            parse_command("/msg alice hello there"),
            Some(ParsedCommand::Msg {
                target: "alice".into(),
                text: "hello there".into()
            })
        );
    }

    #[test]
    fn test_msg_and_notice_without_text_show_usage() {
        assert_eq!(
            parse_command("/msg"),
            Some(ParsedCommand::Usage("/msg <nick> <message>"))
        );
        assert_eq!(
            parse_command("/msg alice"),
            Some(ParsedCommand::Usage("/msg <nick> <message>"))
        );
        assert_eq!(
            parse_command("/notice bob   "),
            Some(ParsedCommand::Usage("/notice <nick> <message>"))
        );
    }

    #[test]
    fn test_notice_parses() {
        assert_eq!(
            parse_command("/notice bob ping me later"),
            Some(ParsedCommand::Notice {
                target: "bob".into(),
                text: "ping me later".into()
            })
        );
    }

    #[test]
    fn test_single_token_commands() {
        assert_eq!(
            parse_command("/join #rust"),
            Some(ParsedCommand::Join {
                channel: "#rust".into()
            })
        );
        assert_eq!(
            parse_command("/part #rust"),
            Some(ParsedCommand::Part {
                channel: "#rust".into()
            })
        );
        assert_eq!(
            parse_command("/nick ferris"),
            Some(ParsedCommand::Nick {
                nick: "ferris".into()
            })
        );
        assert_eq!(
            parse_command("/join"),
            Some(ParsedCommand::Usage("/join <channel>"))
        );
        assert_eq!(
            parse_command("/nick "),
            Some(ParsedCommand::Usage("/nick <nickname>"))
        );
    }

    #[test]
    fn test_free_text_commands() {
        assert_eq!(
            parse_command("/me waves at everyone"),
            Some(ParsedCommand::Me {
                text: "waves at everyone".into()
            })
        );
        assert_eq!(
            parse_command("/topic"),
            Some(ParsedCommand::Topic {
                text: String::new()
            })
        );
    }

    #[test]
    fn test_quit_with_optional_message() {
        assert_eq!(
            parse_command("/quit"),
            Some(ParsedCommand::Quit { message: None })
        );
        assert_eq!(
            parse_command("/quit see you"),
            Some(ParsedCommand::Quit {
                message: Some("see you".into())
            })
        );
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(
            parse_command("/JOIN #rust"),
            Some(ParsedCommand::Unknown("/JOIN".into()))
        );
        assert_eq!(
            parse_command("/msgx a b"),
            Some(ParsedCommand::Unknown("/msgx".into()))
        );
    }

    #[test]
    fn test_registration_gate_covers_channel_and_user_commands() {
        let gated = [
            "hi",
            "/join #a",
            "/part #a",
            "/msg a b",
            "/me x",
            "/topic t",
            "/notice a b",
        ];
        for line in gated {
            assert!(parse_command(line).unwrap().needs_registration(), "{}", line);
        }
        let open = ["/quit", "/nick ferris", "/help", "/join", "/whois x"];
        for line in open {
            assert!(!parse_command(line).unwrap().needs_registration(), "{}", line);
        }
    }
}

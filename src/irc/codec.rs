//! IRC line codec.
//!
//! Splits the inbound byte stream on line terminators and parses each line
//! into a [`ProtocolMessage`]. Parsing is best-effort: malformed input yields
//! a partial message instead of an error, so nothing here can fail.

/// A parsed protocol line: `[:origin] COMMAND arg1 arg2 ... [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtocolMessage {
    pub origin: Option<String>,
    pub command: String,
    pub arguments: Vec<String>,
}

impl ProtocolMessage {
    /// Nickname part of the origin (`nick` in `nick!user@host`).
    pub fn origin_nick(&self) -> Option<&str> {
        self.origin
            .as_deref()
            .map(|o| o.split('!').next().unwrap_or(o))
    }

    /// Argument at `index`, if the server sent that many.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// The last argument, which is the trailing parameter when one was present.
    pub fn last_arg(&self) -> Option<&str> {
        self.arguments.last().map(String::as_str)
    }

    pub fn is_numeric(&self) -> bool {
        !self.command.is_empty() && self.command.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Parse one line (without its terminator).
pub fn parse(line: &str) -> ProtocolMessage {
    let mut rest = line;
    let mut origin = None;

    if let Some(stripped) = rest.strip_prefix(':') {
        match stripped.split_once(' ') {
            Some((prefix, remainder)) => {
                origin = Some(prefix.to_string());
                rest = remainder;
            }
            None => {
                return ProtocolMessage {
                    origin: Some(stripped.to_string()),
                    ..ProtocolMessage::default()
                };
            }
        }
    }

    let rest = rest.trim_start();
    let (command, params) = match rest.split_once(' ') {
        Some((cmd, params)) => (cmd, params),
        None => (rest, ""),
    };

    ProtocolMessage {
        origin,
        command: command.to_string(),
        arguments: split_arguments(params),
    }
}

fn split_arguments(params: &str) -> Vec<String> {
    if let Some(trailing) = params.strip_prefix(':') {
        return vec![trailing.to_string()];
    }
    match params.split_once(" :") {
        Some((middle, trailing)) => middle
            .split_whitespace()
            .map(str::to_string)
            .chain(std::iter::once(trailing.to_string()))
            .collect(),
        None => params.split_whitespace().map(str::to_string).collect(),
    }
}

/// Encode an outgoing line for the wire. Embedded CR/LF are dropped so user
/// text can never smuggle a second command onto the connection.
pub fn frame(line: &str) -> Vec<u8> {
    let mut out: Vec<u8> = line
        .bytes()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();
    out.extend_from_slice(b"\r\n");
    out
}

/// Accumulates raw bytes from the transport and yields complete lines.
///
/// Splitting happens on raw bytes before decoding, so a multi-byte UTF-8
/// sequence cut across two reads is reassembled intact. Invalid sequences are
/// replaced rather than rejected.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let mut raw: Vec<u8> = self.pending.drain(..=pos).collect();
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            lines.push(String::from_utf8_lossy(&raw).into_owned());
        }
        lines
    }
}

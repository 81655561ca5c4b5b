//! Incremental `text/event-stream` parser.
//!
//! Bytes arrive in arbitrary chunks; lines are buffered as raw bytes until a
//! terminator is seen, so multi-byte UTF-8 sequences and `\r\n` pairs split
//! across chunk boundaries decode correctly.

/// A dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type; `"message"` when the stream did not name one.
    pub event_type: String,
    /// Data lines joined with `\n`.
    pub data: String,
    /// Last event ID seen on the stream, if any.
    pub id: Option<String>,
}

impl SseEvent {
    /// `true` for events delivered to a default `message` listener.
    #[must_use]
    pub fn is_message(&self) -> bool {
        self.event_type == "message"
    }
}

/// Streaming parser state.
#[derive(Debug, Default)]
pub struct SseParser {
    line: Vec<u8>,
    skip_lf: bool,
    seen_first_line: bool,
    event_type: String,
    data: String,
    last_event_id: Option<String>,
    retry: Option<u64>,
}

impl SseParser {
    /// Creates an empty parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        for &byte in chunk {
            if self.skip_lf {
                self.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => self.end_line(&mut events),
                b'\r' => {
                    self.end_line(&mut events);
                    self.skip_lf = true;
                }
                other => self.line.push(other),
            }
        }
        events
    }

    /// Reconnection delay requested by the server, in milliseconds.
    #[must_use]
    pub const fn retry(&self) -> Option<u64> {
        self.retry
    }

    /// Last event ID seen on the stream.
    #[must_use]
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn end_line(&mut self, events: &mut Vec<SseEvent>) {
        let raw = std::mem::take(&mut self.line);
        let decoded = String::from_utf8_lossy(&raw);
        let mut line: &str = &decoded;
        if !self.seen_first_line {
            self.seen_first_line = true;
            line = line.strip_prefix('\u{feff}').unwrap_or(line);
        }

        if line.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => value.clone_into(&mut self.event_type),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_owned()),
            "retry" => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(ms);
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = std::mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return None;
        }
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        Some(SseEvent {
            event_type: if event_type.is_empty() {
                "message".to_string()
            } else {
                event_type
            },
            data,
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn single_message() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: {\"foo\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"foo\":1}");
        assert!(events[0].is_message());
    }

    #[test]
    fn multi_line_data_is_joined() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: first\ndata:second\n\n");
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn named_events_are_not_messages() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: ping\ndata: x\n\ndata: y\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "ping");
        assert!(!events[0].is_message());
        // event type resets after dispatch
        assert!(events[1].is_message());
    }

    #[test]
    fn comments_and_empty_data_do_not_dispatch() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": keep-alive\n\nevent: noop\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn chunk_boundaries_inside_lines_and_crlf() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"da").is_empty());
        assert!(parser.feed(b"ta: hel").is_empty());
        assert!(parser.feed(b"lo\r").is_empty());
        let events = parser.feed(b"\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn bare_cr_terminates_lines() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: a\r\rdata: b\r\r");
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].data, "b");
    }

    #[test]
    fn split_utf8_sequence() {
        let bytes = "data: caf\u{e9}\n\n".as_bytes();
        let (head, tail) = bytes.split_at(9);
        let mut parser = SseParser::new();
        assert!(parser.feed(head).is_empty());
        let events = parser.feed(tail);
        assert_eq!(events[0].data, "caf\u{e9}");
    }

    #[test]
    fn id_and_retry_fields() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"id: 42\nretry: 1500\ndata: x\n\nretry: soon\n");
        assert_eq!(events[0].id.as_deref(), Some("42"));
        assert_eq!(parser.last_event_id(), Some("42"));
        assert_eq!(parser.retry(), Some(1500));
    }

    #[test]
    fn leading_bom_is_ignored() {
        let mut parser = SseParser::new();
        let events = parser.feed("\u{feff}data: x\n\n".as_bytes());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn field_without_colon() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data\n\n");
        // a bare `data` line appends an empty line, which still dispatches
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "");
    }
}

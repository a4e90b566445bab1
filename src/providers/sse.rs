//! Incremental decoder for `text/event-stream` bodies.
//!
//! Only the `data` field matters for chat completions; `event`, `id` and
//! `retry` are ignored and `:` lines are comments (OpenRouter sends
//! `: OPENROUTER PROCESSING` keep-alives). Bytes are buffered until a full
//! line is available, so events may be split across chunks at any byte.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    Data(String),
    Done,
}

#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed one network chunk, returning every event it completed
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            self.process_line(line, &mut events);
        }
        events
    }

    /// Flush whatever is left once the body ends
    pub(crate) fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            let line = String::from_utf8_lossy(&rest);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            self.process_line(line, &mut events);
        }
        self.dispatch(&mut events);
        events
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data.push(value.to_string());
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.data.is_empty() {
            return;
        }
        let payload = self.data.join("\n");
        self.data.clear();

        if payload.trim() == "[DONE]" {
            events.push(SseEvent::Done);
        } else {
            events.push(SseEvent::Data(payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(s: &str) -> SseEvent {
        SseEvent::Data(s.to_string())
    }

    #[test]
    fn test_single_chunk() {
        let mut decoder = SseDecoder::default();
        let events = decoder.feed(b"data: {\"a\":1}\n\ndata: {\"a\":2}\n\ndata: [DONE]\n\n");
        assert_eq!(events, vec![data("{\"a\":1}"), data("{\"a\":2}"), SseEvent::Done]);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.feed(b"da").is_empty());
        assert!(decoder.feed(b"ta: {\"content\":\"Hel").is_empty());
        assert!(decoder.feed(b"lo\"}\n").is_empty());
        assert_eq!(decoder.feed(b"\n"), vec![data("{\"content\":\"Hello\"}")]);
    }

    #[test]
    fn test_multibyte_split() {
        let text = "data: caf\u{e9}\n\n".as_bytes();
        // split inside the two-byte é
        let split = text.len() - 3;
        let mut decoder = SseDecoder::default();
        assert!(decoder.feed(&text[..split]).is_empty());
        assert_eq!(decoder.feed(&text[split..]), vec![data("caf\u{e9}")]);
    }

    #[test]
    fn test_comments_crlf_and_other_fields() {
        let mut decoder = SseDecoder::default();
        let events = decoder.feed(
            b": OPENROUTER PROCESSING\r\n\r\nevent: message\r\nid: 7\r\ndata:{\"x\":true}\r\n\r\n",
        );
        assert_eq!(events, vec![data("{\"x\":true}")]);
    }

    #[test]
    fn test_multiline_data_joined() {
        let mut decoder = SseDecoder::default();
        let events = decoder.feed(b"data: one\ndata: two\n\n");
        assert_eq!(events, vec![data("one\ntwo")]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.feed(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), vec![data("tail")]);
        assert!(decoder.finish().is_empty());
    }
}

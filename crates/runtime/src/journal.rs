use std::io;

use crate::events::RuntimeEvent;

/// Sink for the engine's event stream.
pub trait EventJournal {
    fn append(&mut self, event: &RuntimeEvent);
}

/// Journal used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    events: Vec<RuntimeEvent>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RuntimeEvent] {
        &self.events
    }
}

impl EventJournal for InMemoryJournal {
    fn append(&mut self, event: &RuntimeEvent) {
        self.events.push(event.clone());
    }
}

/// Writes one JSON object per line. Serialization and write errors are
/// dropped; journaling must never take the simulator down.
#[derive(Debug)]
pub struct JsonLinesJournal<W: io::Write> {
    writer: W,
}

impl<W: io::Write> JsonLinesJournal<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> EventJournal for JsonLinesJournal<W> {
    fn append(&mut self, event: &RuntimeEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            let _ = writeln!(self.writer, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventJournal, InMemoryJournal, JsonLinesJournal};
    use crate::events::RuntimeEvent;

    #[test]
    fn in_memory_journal_keeps_events_in_order() {
        let mut journal = InMemoryJournal::new();

        journal.append(&RuntimeEvent::connected());
        journal.append(&RuntimeEvent::price_ticked(0.245, 0.005));

        assert_eq!(journal.events().len(), 2);
        assert_eq!(journal.events()[0], RuntimeEvent::Connected);
    }

    #[test]
    fn json_lines_journal_writes_one_line_per_event() {
        let mut journal = JsonLinesJournal::new(Vec::new());

        journal.append(&RuntimeEvent::price_ticked(0.245, 0.005));
        journal.append(&RuntimeEvent::AutoStopped);

        let written = String::from_utf8(journal.into_inner()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event_type\":\"price_ticked\""));
        assert!(lines[1].contains("auto_stopped"));
    }
}

//! Pointer input normalization
//!
//! Raw pointer/touch callbacks arrive whenever the platform delivers them.
//! They are buffered here and handed to the live session once per tick as a
//! [`FrameInput`]: the held flag plus the edges observed since the last tick.

/// Kind of press edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Start,
    End,
}

/// A single press edge with its capture timestamp (ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressEdge {
    pub kind: PressKind,
    pub at_ms: f64,
}

impl PressEdge {
    pub fn start(at_ms: f64) -> Self {
        Self {
            kind: PressKind::Start,
            at_ms,
        }
    }

    pub fn end(at_ms: f64) -> Self {
        Self {
            kind: PressKind::End,
            at_ms,
        }
    }
}

/// Input snapshot consumed by one simulation tick
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Whether the pointer is down at the end of the frame
    pub held: bool,
    /// Edges since the previous tick, in arrival order
    pub edges: Vec<PressEdge>,
}

impl FrameInput {
    /// Snapshot with no edges
    pub fn holding(held: bool) -> Self {
        Self {
            held,
            edges: Vec::new(),
        }
    }

    /// Press-start timestamps in this frame
    pub fn starts(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges
            .iter()
            .filter(|e| e.kind == PressKind::Start)
            .map(|e| e.at_ms)
    }

    /// Press-end timestamps in this frame
    pub fn ends(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges
            .iter()
            .filter(|e| e.kind == PressKind::End)
            .map(|e| e.at_ms)
    }
}

/// Buffers pointer callbacks between ticks
#[derive(Debug, Clone, Default)]
pub struct InputEventSource {
    held: bool,
    pending: Vec<PressEdge>,
}

impl InputEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down. Ignored while already held.
    pub fn press_start(&mut self, at_ms: f64) {
        if self.held {
            return;
        }
        self.held = true;
        self.pending.push(PressEdge::start(at_ms));
    }

    /// Pointer went up. Ignored unless a press is in progress, so each press
    /// releases exactly once.
    pub fn press_end(&mut self, at_ms: f64) {
        if !self.held {
            return;
        }
        self.held = false;
        self.pending.push(PressEdge::end(at_ms));
    }

    /// Pointer left the surface or the platform interrupted the gesture.
    pub fn press_cancel(&mut self, at_ms: f64) {
        self.press_end(at_ms);
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Take everything observed since the previous drain
    pub fn drain(&mut self) -> FrameInput {
        FrameInput {
            held: self.held,
            edges: std::mem::take(&mut self.pending),
        }
    }

    /// Drop buffered edges and release any held press.
    ///
    /// Called on variant switch so one game's input never reaches the next.
    pub fn reset(&mut self) {
        self.held = false;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_cycle() {
        let mut input = InputEventSource::new();
        input.press_start(10.0);
        let frame = input.drain();
        assert!(frame.held);
        assert_eq!(frame.edges, vec![PressEdge::start(10.0)]);

        input.press_end(20.0);
        let frame = input.drain();
        assert!(!frame.held);
        assert_eq!(frame.ends().collect::<Vec<_>>(), vec![20.0]);
    }

    #[test]
    fn test_cancel_releases_once() {
        let mut input = InputEventSource::new();
        input.press_start(0.0);
        input.press_cancel(5.0);
        // Platform delivers the pointerup after the cancel
        input.press_end(6.0);
        let frame = input.drain();
        assert_eq!(frame.ends().count(), 1);
        assert_eq!(frame.starts().count(), 1);
        assert!(!frame.held);
    }

    #[test]
    fn test_repeat_start_ignored() {
        let mut input = InputEventSource::new();
        input.press_start(0.0);
        input.press_start(1.0);
        assert_eq!(input.drain().edges.len(), 1);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut input = InputEventSource::new();
        input.press_start(0.0);
        input.drain();
        let frame = input.drain();
        assert!(frame.edges.is_empty());
        assert!(frame.held);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut input = InputEventSource::new();
        input.press_start(0.0);
        input.reset();
        let frame = input.drain();
        assert!(!frame.held);
        assert!(frame.edges.is_empty());
    }
}

use core::fmt;

use redcode::Point;

/// What a single observable engine action was.
///
/// The `Display` form uses the wire-style names (`I_READ`, `B_DEC`, ...)
/// that embedders log and match on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A process executed the instruction at its program counter
    Executed,
    /// A whole instruction was read
    IRead,
    /// A whole instruction was written
    IWrite,
    /// An A-field was read
    ARead,
    /// An A-field was written
    AWrite,
    /// A B-field was read
    BRead,
    /// A B-field was written
    BWrite,
    /// An A-field was decremented in place
    ADec,
    /// A B-field was decremented in place
    BDec,
    /// An A-field was incremented in place
    AInc,
    /// A B-field was incremented in place
    BInc,
    /// An arithmetic result was stored into an A-field
    AArith,
    /// An arithmetic result was stored into a B-field
    BArith,
    /// SPL enqueued a child process
    ProcessSplit,
    /// A process executed DAT or divided by zero and was not re-enqueued
    ProcessKilled,
    /// A warrior's queue became empty; it will never be scheduled again
    WarriorKilled,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::Executed => "EXECUTED",
            Self::IRead => "I_READ",
            Self::IWrite => "I_WRITE",
            Self::ARead => "A_READ",
            Self::AWrite => "A_WRITE",
            Self::BRead => "B_READ",
            Self::BWrite => "B_WRITE",
            Self::ADec => "A_DEC",
            Self::BDec => "B_DEC",
            Self::AInc => "A_INC",
            Self::BInc => "B_INC",
            Self::AArith => "A_ARITH",
            Self::BArith => "B_ARITH",
            Self::ProcessSplit => "PROCESS_SPLIT",
            Self::ProcessKilled => "PROCESS_KILLED",
            Self::WarriorKilled => "WARRIOR_KILLED",
        };
        write!(f, "{name}")
    }
}

/// One observable engine action, in execution order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// What happened
    pub kind: EventKind,
    /// The warrior whose slot the action happened in
    pub warrior: usize,
    /// The program counter of the process acting
    pub pc: Point,
    /// The cell the action applied to
    pub addr: Point,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} warrior={} pc={} addr={}",
            self.kind, self.warrior, self.pc, self.addr
        )
    }
}

/// Receives events synchronously as they are emitted.
///
/// Sinks run inside the engine's execution loop: they must return promptly
/// and must not call back into the round that is emitting.
pub trait EventSink {
    /// Observe one event
    fn emit(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: &Event) {
        self.push(*event);
    }
}

/// Per-step event recorder: tags each event with the acting process and
/// forwards it to the embedder's sink before buffering it for the caller.
pub(crate) struct Journal<'a> {
    /// The warrior whose slot is running
    warrior: usize,
    /// The program counter of the running process
    pc: Point,
    /// Cycle event buffer, returned from `step`
    events: &'a mut Vec<Event>,
    /// Optional embedder sink
    sink: Option<&'a mut (dyn EventSink + 'static)>,
}

impl<'a> Journal<'a> {
    /// Start recording a slot for one process
    pub fn new(
        warrior: usize,
        pc: Point,
        events: &'a mut Vec<Event>,
        sink: Option<&'a mut (dyn EventSink + 'static)>,
    ) -> Self {
        Self { warrior, pc, events, sink }
    }

    /// Record one action against a cell
    pub fn record(&mut self, kind: EventKind, addr: Point) {
        let event = Event {
            kind,
            warrior: self.warrior,
            pc: self.pc,
            addr,
        };
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.emit(&event);
        }
        self.events.push(event);
    }
}

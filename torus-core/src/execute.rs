use redcode::{FieldValue, Instruction, Modifier, Opcode, Point};

use crate::{
    core_mem::Core,
    events::{EventKind, Journal},
    operands::{offset_field, ResolvedOperand},
    processes::ProcessQueues,
};

/// The results of operand evaluation and the state an opcode body needs
pub(crate) struct OpInputs<'a, 'j> {
    /// Currently executing warrior
    pub warrior: usize,
    /// Program counter of the running process
    pub pc: Point,
    /// The instruction at `pc`, captured before any operand side effects
    pub current: Instruction,
    /// The evaluated A operand
    pub a: ResolvedOperand,
    /// The evaluated B operand
    pub b: ResolvedOperand,
    /// The core; opcode bodies mutate it in place
    pub core: &'a mut Core,
    /// Process queues; bodies enqueue successors but never pop
    pub queues: &'a mut ProcessQueues,
    /// The step's event recorder
    pub journal: &'a mut Journal<'j>,
}

impl OpInputs<'_, '_> {
    /// Where a normal step lands, following the instruction's stepping
    fn next_pc(&self) -> Point {
        let step = self.current.stepping.vector();
        (self.pc + step).normalize(self.core.extent())
    }

    /// Where a skip lands: two steps ahead
    fn skip_pc(&self) -> Point {
        let step = self.current.stepping.vector();
        (self.pc + step * 2).normalize(self.core.extent())
    }

    /// Enqueue a successor at the tail of this warrior's queue
    fn queue(&mut self, pc: Point) -> bool {
        self.queues.push(self.warrior, pc)
    }

    /// Enqueue either the skip or the normal successor
    fn queue_skip_if(&mut self, skip: bool) {
        let successor = if skip { self.skip_pc() } else { self.next_pc() };
        self.queue(successor);
    }
}

/// Execute the opcode body for an already-resolved instruction
pub(crate) fn perform(inputs: OpInputs) {
    match inputs.current.opcode {
        Opcode::Dat => dat_op(inputs),
        Opcode::Mov => mov_op(inputs),
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod => arithmetic_op(inputs),
        Opcode::Jmp => jmp_op(inputs),
        Opcode::Jmz => jmz_op(inputs),
        Opcode::Jmn => jmn_op(inputs),
        Opcode::Djn => djn_op(inputs),
        Opcode::Spl => spl_op(inputs),
        Opcode::Slt => slt_op(inputs),
        Opcode::Cmp | Opcode::Seq => seq_op(inputs),
        Opcode::Sne => sne_op(inputs),
        Opcode::Nop => nop_op(inputs),
    }
}

/// DAT removes the current process: no successor is queued
fn dat_op(inputs: OpInputs) {
    inputs.journal.record(EventKind::ProcessKilled, inputs.pc);
}

/// MOV copies the selected fields of the A target over the B target
fn mov_op(mut inputs: OpInputs) {
    let next = inputs.next_pc();
    let a = inputs.a;
    let b = inputs.b;
    match inputs.current.modifier {
        Modifier::A => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.core.cell_mut(b.addr).a_field = a.snapshot.a_field;
            inputs.journal.record(EventKind::AWrite, b.addr);
        }
        Modifier::B => {
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.core.cell_mut(b.addr).b_field = a.snapshot.b_field;
            inputs.journal.record(EventKind::BWrite, b.addr);
        }
        Modifier::AB => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.core.cell_mut(b.addr).b_field = a.snapshot.a_field;
            inputs.journal.record(EventKind::BWrite, b.addr);
        }
        Modifier::BA => {
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.core.cell_mut(b.addr).a_field = a.snapshot.b_field;
            inputs.journal.record(EventKind::AWrite, b.addr);
        }
        Modifier::F => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::BRead, a.addr);
            let target = inputs.core.cell_mut(b.addr);
            target.a_field = a.snapshot.a_field;
            target.b_field = a.snapshot.b_field;
            inputs.journal.record(EventKind::AWrite, b.addr);
            inputs.journal.record(EventKind::BWrite, b.addr);
        }
        Modifier::X => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::BRead, a.addr);
            let target = inputs.core.cell_mut(b.addr);
            target.b_field = a.snapshot.a_field;
            target.a_field = a.snapshot.b_field;
            inputs.journal.record(EventKind::BWrite, b.addr);
            inputs.journal.record(EventKind::AWrite, b.addr);
        }
        Modifier::I => {
            inputs.journal.record(EventKind::IRead, a.addr);
            inputs.core.write(b.addr, a.snapshot);
            inputs.journal.record(EventKind::IWrite, b.addr);
        }
    }
    inputs.queue(next);
}

/// Which field of the B target an arithmetic lane writes
#[derive(Copy, Clone)]
enum Lane {
    /// The A-field
    A,
    /// The B-field
    B,
}

/// ADD/SUB/MUL/DIV/MOD: paired field arithmetic modulo the x extent.
///
/// A lane whose divisor is zero writes nothing and removes the process,
/// while lanes with sound divisors still write their results.
fn arithmetic_op(mut inputs: OpInputs) {
    let size = inputs.core.size_x();
    let op = inputs.current.opcode;
    let a = inputs.a.snapshot;
    let b = inputs.b.snapshot;

    // (source value, destination value, destination lane) per modifier;
    // I behaves as F for arithmetic
    let lanes: Vec<(FieldValue, FieldValue, Lane)> =
        match inputs.current.modifier {
            Modifier::A => vec![(a.a_field, b.a_field, Lane::A)],
            Modifier::B => vec![(a.b_field, b.b_field, Lane::B)],
            Modifier::AB => vec![(a.a_field, b.b_field, Lane::B)],
            Modifier::BA => vec![(a.b_field, b.a_field, Lane::A)],
            Modifier::F | Modifier::I => vec![
                (a.a_field, b.a_field, Lane::A),
                (a.b_field, b.b_field, Lane::B),
            ],
            Modifier::X => vec![
                (a.a_field, b.b_field, Lane::B),
                (a.b_field, b.a_field, Lane::A),
            ],
        };

    let mut killed = false;
    for (source, dest, lane) in lanes {
        match combine(op, dest, source, size) {
            Some(result) => {
                let target = inputs.core.cell_mut(inputs.b.addr);
                let kind = match lane {
                    Lane::A => {
                        target.a_field = result;
                        EventKind::AArith
                    }
                    Lane::B => {
                        target.b_field = result;
                        EventKind::BArith
                    }
                };
                inputs.journal.record(kind, inputs.b.addr);
            }
            None => killed = true,
        }
    }

    if killed {
        inputs.journal.record(EventKind::ProcessKilled, inputs.a.addr);
    } else {
        let next = inputs.next_pc();
        inputs.queue(next);
    }
}

/// One arithmetic lane; `None` marks a division by zero
fn combine(
    op: Opcode,
    dest: FieldValue,
    source: FieldValue,
    size: u32,
) -> Option<FieldValue> {
    match op {
        Opcode::Add => Some(offset_field(dest, i64::from(source), size)),
        Opcode::Sub => Some(offset_field(dest, -i64::from(source), size)),
        Opcode::Mul => {
            let product = u64::from(dest) * u64::from(source);
            FieldValue::try_from(product % u64::from(size)).ok()
        }
        Opcode::Div => (source != 0).then(|| dest / source),
        Opcode::Mod => (source != 0).then(|| dest % source),
        // Dispatch only routes arithmetic opcodes here
        _ => None,
    }
}

/// JMP queues the A operand's effective address unconditionally
fn jmp_op(mut inputs: OpInputs) {
    let target = inputs.a.addr;
    inputs.queue(target);
}

/// The selected B-target fields an instruction tests, with read events
fn tested_fields(inputs: &mut OpInputs) -> Vec<FieldValue> {
    let b = inputs.b;
    match inputs.current.modifier {
        Modifier::A | Modifier::BA => {
            inputs.journal.record(EventKind::ARead, b.addr);
            vec![b.snapshot.a_field]
        }
        Modifier::B | Modifier::AB => {
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![b.snapshot.b_field]
        }
        Modifier::F | Modifier::X | Modifier::I => {
            inputs.journal.record(EventKind::ARead, b.addr);
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![b.snapshot.a_field, b.snapshot.b_field]
        }
    }
}

/// JMZ jumps when every tested field is zero
fn jmz_op(mut inputs: OpInputs) {
    let jump = tested_fields(&mut inputs).iter().all(|&field| field == 0);
    let target = inputs.a.addr;
    if jump {
        inputs.queue(target);
    } else {
        let next = inputs.next_pc();
        inputs.queue(next);
    }
}

/// JMN jumps when any tested field is not zero
fn jmn_op(mut inputs: OpInputs) {
    let jump = tested_fields(&mut inputs).iter().any(|&field| field != 0);
    let target = inputs.a.addr;
    if jump {
        inputs.queue(target);
    } else {
        let next = inputs.next_pc();
        inputs.queue(next);
    }
}

/// DJN decrements the selected B-target fields, then jumps when any
/// decremented value is not zero
fn djn_op(mut inputs: OpInputs) {
    let size = inputs.core.size_x();
    let b = inputs.b;
    let target = inputs.core.cell_mut(b.addr);
    let decremented: Vec<FieldValue> = match inputs.current.modifier {
        Modifier::A | Modifier::BA => {
            target.a_field = offset_field(target.a_field, -1, size);
            inputs.journal.record(EventKind::ADec, b.addr);
            vec![offset_field(b.snapshot.a_field, -1, size)]
        }
        Modifier::B | Modifier::AB => {
            target.b_field = offset_field(target.b_field, -1, size);
            inputs.journal.record(EventKind::BDec, b.addr);
            vec![offset_field(b.snapshot.b_field, -1, size)]
        }
        Modifier::F | Modifier::X | Modifier::I => {
            target.a_field = offset_field(target.a_field, -1, size);
            target.b_field = offset_field(target.b_field, -1, size);
            inputs.journal.record(EventKind::ADec, b.addr);
            inputs.journal.record(EventKind::BDec, b.addr);
            vec![
                offset_field(b.snapshot.a_field, -1, size),
                offset_field(b.snapshot.b_field, -1, size),
            ]
        }
    };
    let jump = decremented.iter().any(|&field| field != 0);
    let jump_target = inputs.a.addr;
    if jump {
        inputs.queue(jump_target);
    } else {
        let next = inputs.next_pc();
        inputs.queue(next);
    }
}

/// SPL queues the normal successor, then the A target as a new process.
/// A queue at capacity drops the child silently.
fn spl_op(mut inputs: OpInputs) {
    let next = inputs.next_pc();
    inputs.queue(next);
    let child = inputs.a.addr;
    if inputs.queue(child) {
        inputs.journal.record(EventKind::ProcessSplit, child);
    }
}

/// The (source, destination) field pairs a comparison inspects, with
/// read events for both sides
fn compared_fields(
    inputs: &mut OpInputs,
) -> Vec<(FieldValue, FieldValue)> {
    let a = inputs.a;
    let b = inputs.b;
    match inputs.current.modifier {
        Modifier::A => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::ARead, b.addr);
            vec![(a.snapshot.a_field, b.snapshot.a_field)]
        }
        Modifier::B => {
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![(a.snapshot.b_field, b.snapshot.b_field)]
        }
        Modifier::AB => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![(a.snapshot.a_field, b.snapshot.b_field)]
        }
        Modifier::BA => {
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.journal.record(EventKind::ARead, b.addr);
            vec![(a.snapshot.b_field, b.snapshot.a_field)]
        }
        Modifier::F => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.journal.record(EventKind::ARead, b.addr);
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![
                (a.snapshot.a_field, b.snapshot.a_field),
                (a.snapshot.b_field, b.snapshot.b_field),
            ]
        }
        Modifier::X => {
            inputs.journal.record(EventKind::ARead, a.addr);
            inputs.journal.record(EventKind::BRead, a.addr);
            inputs.journal.record(EventKind::ARead, b.addr);
            inputs.journal.record(EventKind::BRead, b.addr);
            vec![
                (a.snapshot.a_field, b.snapshot.b_field),
                (a.snapshot.b_field, b.snapshot.a_field),
            ]
        }
        Modifier::I => {
            inputs.journal.record(EventKind::IRead, a.addr);
            inputs.journal.record(EventKind::IRead, b.addr);
            vec![]
        }
    }
}

/// SLT skips the next instruction when every source field is strictly
/// less than its destination counterpart
fn slt_op(mut inputs: OpInputs) {
    // I behaves as F: whole-instruction comparison has no ordering
    if inputs.current.modifier == Modifier::I {
        inputs.current.modifier = Modifier::F;
    }
    let skip = compared_fields(&mut inputs)
        .iter()
        .all(|&(source, dest)| source < dest);
    inputs.queue_skip_if(skip);
}

/// CMP/SEQ skips the next instruction when the compared values are equal
fn seq_op(mut inputs: OpInputs) {
    let pairs = compared_fields(&mut inputs);
    let equal = if inputs.current.modifier == Modifier::I {
        inputs.a.snapshot == inputs.b.snapshot
    } else {
        pairs.iter().all(|&(source, dest)| source == dest)
    };
    inputs.queue_skip_if(equal);
}

/// SNE skips the next instruction when any compared value differs
fn sne_op(mut inputs: OpInputs) {
    let pairs = compared_fields(&mut inputs);
    let not_equal = if inputs.current.modifier == Modifier::I {
        inputs.a.snapshot != inputs.b.snapshot
    } else {
        pairs.iter().any(|&(source, dest)| source != dest)
    };
    inputs.queue_skip_if(not_equal);
}

/// NOP steps and does nothing else
fn nop_op(mut inputs: OpInputs) {
    let next = inputs.next_pc();
    inputs.queue(next);
}

#[cfg(test)]
mod tests {
    use redcode::{AddrMode, Stepping};

    use super::*;
    use crate::{events::Event, operands::field_offset};

    /// Run one opcode body against a tiny core with direct operands
    fn run_op(
        core: &mut Core,
        queues: &mut ProcessQueues,
        pc: Point,
        current: Instruction,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        let mut journal = Journal::new(0, pc, &mut events, None);
        let extent = core.extent();
        let a_addr =
            (pc + field_offset(current.a_field)).normalize(extent);
        let b_addr =
            (pc + field_offset(current.b_field)).normalize(extent);
        let a = ResolvedOperand { addr: a_addr, snapshot: core.read(a_addr) };
        let b = ResolvedOperand { addr: b_addr, snapshot: core.read(b_addr) };
        perform(OpInputs {
            warrior: 0,
            pc,
            current,
            a,
            b,
            core,
            queues,
            journal: &mut journal,
        });
        events
    }

    fn direct(
        opcode: Opcode,
        modifier: Modifier,
        a_field: FieldValue,
        b_field: FieldValue,
    ) -> Instruction {
        Instruction {
            opcode,
            modifier,
            stepping: Stepping::D,
            a_mode: AddrMode::Direct,
            a_field,
            b_mode: AddrMode::Direct,
            b_field,
        }
    }

    #[test]
    fn dat_queues_nothing() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let events = run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Dat, Modifier::F, 0, 0),
        );
        assert_eq!(queues.len(0), 0);
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![EventKind::ProcessKilled]
        );
    }

    #[test]
    fn mov_i_copies_a_whole_cell() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let imp = direct(Opcode::Mov, Modifier::I, 0, 1);
        core.write(Point::new(0, 0), imp);
        run_op(&mut core, &mut queues, Point::new(0, 0), imp);
        assert_eq!(core.read(Point::new(1, 0)), imp);
        assert_eq!(queues.queue(0), vec![Point::new(1, 0)]);
    }

    #[test]
    fn mov_x_crosses_fields() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let source = Instruction {
            a_field: 3,
            b_field: 4,
            ..Instruction::default()
        };
        core.write(Point::new(1, 0), source);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Mov, Modifier::X, 1, 2),
        );
        let written = core.read(Point::new(2, 0));
        assert_eq!(written.a_field, 4);
        assert_eq!(written.b_field, 3);
    }

    #[test]
    fn add_ab_accumulates_into_the_b_field() {
        let mut core = Core::new(Point::new(8000, 1));
        let mut queues = ProcessQueues::new(1, 8);
        // ADD.AB #4, $3 in immediate form: the A operand resolves to the
        // instruction itself, whose a_field carries the literal
        let add = Instruction {
            a_mode: AddrMode::Immediate,
            ..direct(Opcode::Add, Modifier::AB, 4, 3)
        };
        core.write(Point::new(0, 0), add);
        let mut events = Vec::new();
        let mut journal = Journal::new(0, Point::new(0, 0), &mut events, None);
        let a = ResolvedOperand {
            addr: Point::new(0, 0),
            snapshot: core.read(Point::new(0, 0)),
        };
        let b = ResolvedOperand {
            addr: Point::new(3, 0),
            snapshot: core.read(Point::new(3, 0)),
        };
        perform(OpInputs {
            warrior: 0,
            pc: Point::new(0, 0),
            current: add,
            a,
            b,
            core: &mut core,
            queues: &mut queues,
            journal: &mut journal,
        });
        assert_eq!(core.read(Point::new(3, 0)).b_field, 4);
        assert_eq!(
            events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![EventKind::BArith]
        );
    }

    #[test]
    fn subtraction_wraps_modulo_core_size() {
        let mut core = Core::new(Point::new(8000, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let source = Instruction { b_field: 5, ..Instruction::default() };
        core.write(Point::new(1, 0), source);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Sub, Modifier::B, 1, 2),
        );
        assert_eq!(core.read(Point::new(2, 0)).b_field, 7995);
    }

    #[test]
    fn division_by_zero_kills_but_writes_the_sound_lane() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let source = Instruction { b_field: 2, ..Instruction::default() };
        core.write(Point::new(1, 0), source);
        let dest = Instruction {
            a_field: 6,
            b_field: 6,
            ..Instruction::default()
        };
        core.write(Point::new(2, 0), dest);
        let events = run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Div, Modifier::F, 1, 2),
        );
        // The A lane divided by zero; the B lane still wrote 6/2
        assert_eq!(core.read(Point::new(2, 0)).a_field, 6);
        assert_eq!(core.read(Point::new(2, 0)).b_field, 3);
        assert_eq!(queues.len(0), 0);
        assert!(events
            .iter()
            .any(|e| e.kind == EventKind::ProcessKilled));
    }

    #[test]
    fn jmz_tests_all_selected_fields() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Jmz, Modifier::F, 5, 2),
        );
        // The empty cell at +2 is all zero, so the jump lands at +5
        assert_eq!(queues.queue(0), vec![Point::new(5, 0)]);

        let target = Instruction { b_field: 1, ..Instruction::default() };
        core.write(Point::new(2, 0), target);
        let mut queues = ProcessQueues::new(1, 8);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Jmz, Modifier::F, 5, 2),
        );
        assert_eq!(queues.queue(0), vec![Point::new(1, 0)]);
    }

    #[test]
    fn djn_tests_the_decremented_value() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let counter = Instruction { b_field: 1, ..Instruction::default() };
        core.write(Point::new(3, 0), counter);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Djn, Modifier::B, 6, 3),
        );
        // 1 decrements to 0: fall through, and the target is written back
        assert_eq!(core.read(Point::new(3, 0)).b_field, 0);
        assert_eq!(queues.queue(0), vec![Point::new(1, 0)]);

        let mut queues = ProcessQueues::new(1, 8);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Djn, Modifier::B, 6, 3),
        );
        // 0 decrements to the wrapped top value: jump
        assert_eq!(core.read(Point::new(3, 0)).b_field, 7);
        assert_eq!(queues.queue(0), vec![Point::new(6, 0)]);
    }

    #[test]
    fn spl_queues_parent_then_child() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let events = run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Spl, Modifier::B, 4, 0),
        );
        assert_eq!(
            queues.queue(0),
            vec![Point::new(1, 0), Point::new(4, 0)]
        );
        assert!(events
            .iter()
            .any(|e| e.kind == EventKind::ProcessSplit));
    }

    #[test]
    fn spl_at_capacity_drops_the_child_silently() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 2);
        queues.push(0, Point::new(7, 0));
        let events = run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Spl, Modifier::B, 4, 0),
        );
        assert_eq!(
            queues.queue(0),
            vec![Point::new(7, 0), Point::new(1, 0)]
        );
        assert!(!events
            .iter()
            .any(|e| e.kind == EventKind::ProcessSplit));
    }

    #[test]
    fn comparisons_skip_one_extra_step() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        // Two empty cells are equal under .I
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Seq, Modifier::I, 2, 3),
        );
        assert_eq!(queues.queue(0), vec![Point::new(2, 0)]);

        let mut queues = ProcessQueues::new(1, 8);
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Sne, Modifier::I, 2, 3),
        );
        assert_eq!(queues.queue(0), vec![Point::new(1, 0)]);
    }

    #[test]
    fn slt_requires_every_lane_below() {
        let mut core = Core::new(Point::new(8, 1));
        let mut queues = ProcessQueues::new(1, 8);
        let low = Instruction {
            a_field: 1,
            b_field: 1,
            ..Instruction::default()
        };
        let high = Instruction {
            a_field: 2,
            b_field: 1,
            ..Instruction::default()
        };
        core.write(Point::new(1, 0), low);
        core.write(Point::new(2, 0), high);
        // a=(1,1) vs b=(2,1): the B lane is not strictly below
        run_op(
            &mut core,
            &mut queues,
            Point::new(0, 0),
            direct(Opcode::Slt, Modifier::F, 1, 2),
        );
        assert_eq!(queues.queue(0), vec![Point::new(1, 0)]);
    }

    #[test]
    fn stepping_controls_the_successor() {
        let mut core = Core::new(Point::new(8, 4));
        let mut queues = ProcessQueues::new(1, 8);
        let mut nop = direct(Opcode::Nop, Modifier::B, 0, 0);
        nop.stepping = Stepping::W;
        run_op(&mut core, &mut queues, Point::new(0, 0), nop);
        // One step up from the top row wraps to the bottom row
        assert_eq!(queues.queue(0), vec![Point::new(0, 3)]);
    }
}

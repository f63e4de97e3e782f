use redcode::{AddrMode, FieldValue, Instruction, Point};

use crate::{
    core_mem::Core,
    events::{EventKind, Journal},
};

/// A resolved operand: where it points and what was there when it resolved.
///
/// The other operand's predecrement or the opcode body may rewrite the
/// cell afterwards, so `snapshot` is not guaranteed to match the in-core
/// value by the time the step finishes.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ResolvedOperand {
    /// Effective address
    pub addr: Point,
    /// The instruction at `addr`, captured at resolution time
    pub snapshot: Instruction,
}

/// Evaluate `value + delta` with modulo-coresize arithmetic
pub(crate) fn offset_field(
    value: FieldValue,
    delta: i64,
    size: u32,
) -> FieldValue {
    let sum = i64::from(value).wrapping_add(delta);
    let reduced = sum.rem_euclid(i64::from(size));
    FieldValue::try_from(reduced).unwrap_or(0)
}

/// Reinterpret a canonical field as a signed x offset.
///
/// Canonical fields are reduced below the x extent, which fits in i32.
pub(crate) fn field_offset(value: FieldValue) -> i32 {
    i32::try_from(value).unwrap_or(0)
}

/// Evaluate one operand against the current core state.
///
/// Predecrements write through immediately, so a later resolution or the
/// opcode body observes them.  Postincrements are deferred: the returned
/// cell address must be incremented by [`apply_increment`] once the opcode
/// body has run.
pub(crate) fn resolve(
    pc: Point,
    mode: AddrMode,
    value: FieldValue,
    core: &mut Core,
    journal: &mut Journal<'_>,
) -> (ResolvedOperand, Option<Point>) {
    let extent = core.extent();
    match mode {
        AddrMode::Immediate => {
            // The literal is carried by the instruction itself
            let operand = ResolvedOperand {
                addr: pc,
                snapshot: core.read(pc),
            };
            (operand, None)
        }
        AddrMode::Direct => {
            let addr = (pc + field_offset(value)).normalize(extent);
            let operand = ResolvedOperand {
                addr,
                snapshot: core.read(addr),
            };
            (operand, None)
        }
        AddrMode::IndirectB => {
            let inter = (pc + field_offset(value)).normalize(extent);
            let hop = core.read(inter).b_field;
            journal.record(EventKind::BRead, inter);
            let addr = (inter + field_offset(hop)).normalize(extent);
            let operand = ResolvedOperand {
                addr,
                snapshot: core.read(addr),
            };
            (operand, None)
        }
        AddrMode::PredecB => {
            let inter = (pc + field_offset(value)).normalize(extent);
            let size = core.size_x();
            let cell = core.cell_mut(inter);
            cell.b_field = offset_field(cell.b_field, -1, size);
            journal.record(EventKind::BDec, inter);
            let hop = core.read(inter).b_field;
            journal.record(EventKind::BRead, inter);
            let addr = (inter + field_offset(hop)).normalize(extent);
            let operand = ResolvedOperand {
                addr,
                snapshot: core.read(addr),
            };
            (operand, None)
        }
        AddrMode::PostincB => {
            let inter = (pc + field_offset(value)).normalize(extent);
            let hop = core.read(inter).b_field;
            journal.record(EventKind::BRead, inter);
            let addr = (inter + field_offset(hop)).normalize(extent);
            let operand = ResolvedOperand {
                addr,
                snapshot: core.read(addr),
            };
            (operand, Some(inter))
        }
    }
}

/// Apply one deferred postincrement and publish it
pub(crate) fn apply_increment(
    core: &mut Core,
    cell: Point,
    journal: &mut Journal<'_>,
) {
    let size = core.size_x();
    let target = core.cell_mut(cell);
    target.b_field = offset_field(target.b_field, 1, size);
    journal.record(EventKind::BInc, cell);
}

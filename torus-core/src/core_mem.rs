use redcode::{Instruction, Point};

/// The shared memory warriors fight in: a dense array of instructions
/// addressed by [`Point`]s.
///
/// Every accessor normalizes its coordinate argument, so any signed point
/// is a valid address and out-of-bounds access is impossible by
/// construction.  Cells start as the dead instruction `DAT.F $0, $0` and
/// are only ever overwritten, never removed.
pub struct Core {
    /// The core extent; `extent.x * extent.y` cells
    extent: Point,
    /// Backing row-major storage, only ever indexed through `Point::index`
    cells: Vec<Instruction>,
}

impl Core {
    /// An empty core of the given extent, every cell dead
    #[must_use]
    pub fn new(extent: Point) -> Self {
        Self {
            extent,
            cells: vec![Instruction::default(); extent.area()],
        }
    }

    /// The extent this core wraps at
    #[must_use]
    pub const fn extent(&self) -> Point {
        self.extent
    }

    /// The number of columns, which field arithmetic reduces against
    #[must_use]
    pub const fn size_x(&self) -> u32 {
        self.extent.x as u32
    }

    /// Copy out the instruction at a point
    #[must_use]
    pub fn read(&self, p: Point) -> Instruction {
        self.cells
            .get(p.index(self.extent))
            .copied()
            .unwrap_or_default()
    }

    /// Overwrite the instruction at a point
    pub fn write(&mut self, p: Point, value: Instruction) {
        let index = p.index(self.extent);
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
        }
    }

    /// Mutable access to the cell at a point, for field-level updates
    #[allow(
        clippy::indexing_slicing,
        reason = "Point::index is bounded below the backing length"
    )]
    pub(crate) fn cell_mut(&mut self, p: Point) -> &mut Instruction {
        &mut self.cells[p.index(self.extent)]
    }

    /// Copy of the entire core for observers, in row-major order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Instruction> {
        self.cells.clone()
    }
}

#[cfg(test)]
mod tests {
    use redcode::{AddrMode, Modifier, Opcode, Stepping};

    use super::*;

    fn bomb() -> Instruction {
        Instruction {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            stepping: Stepping::D,
            a_mode: AddrMode::Immediate,
            a_field: 9,
            b_mode: AddrMode::Immediate,
            b_field: 9,
        }
    }

    #[test]
    fn new_core_is_dead() {
        let core = Core::new(Point::new(16, 2));
        assert_eq!(core.snapshot().len(), 32);
        assert!(core
            .snapshot()
            .iter()
            .all(|cell| *cell == Instruction::default()));
    }

    #[test]
    fn reads_and_writes_wrap() {
        let mut core = Core::new(Point::new(8, 4));
        core.write(Point::new(-1, -1), bomb());
        assert_eq!(core.read(Point::new(7, 3)), bomb());
        assert_eq!(core.read(Point::new(15, 7)), bomb());
        assert_eq!(core.read(Point::new(0, 0)), Instruction::default());
    }

    #[test]
    fn cell_mut_edits_in_place() {
        let mut core = Core::new(Point::new(8, 1));
        core.cell_mut(Point::new(3, 0)).b_field = 77;
        assert_eq!(core.read(Point::new(3, 0)).b_field, 77);
    }
}

use itertools::Itertools;
use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};
use redcode::{Instruction, Point, RelaxedWarrior};
use thiserror::Error;

use crate::{
    config::{ConfigError, RoundConfig},
    core_mem::Core,
    events::{Event, EventKind, EventSink, Journal},
    execute::{self, OpInputs},
    operands,
    placement::{self, PlacementError},
    processes::ProcessQueues,
};

/// Why a round could not be constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// The configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The warriors could not be loaded into the core
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// How a finished round came out
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The warrior that outlived every other
    Winner(usize),
    /// No single survivor: the cycle cap was reached, or the last warriors
    /// died on the same cycle
    Tie,
}

impl Outcome {
    /// The winning warrior, if there was one
    #[must_use]
    pub const fn winner(self) -> Option<usize> {
        match self {
            Self::Winner(warrior) => Some(warrior),
            Self::Tie => None,
        }
    }
}

/// What one call to [`Round::step`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleResult {
    /// Set once a single warrior has won
    pub winner: Option<usize>,
    /// Set once the round settled without a winner
    pub tied: bool,
    /// The events of this cycle, in execution order
    pub events: Vec<Event>,
}

/// One battle: a core, the warriors loaded into it, and their process
/// queues, stepped cycle by cycle until a winner emerges or the cap hits.
pub struct Round {
    /// The active configuration
    config: RoundConfig,
    /// Core memory
    core: Core,
    /// Display names, indexed by warrior id
    names: Vec<String>,
    /// Chosen placement origin per warrior
    origins: Vec<Point>,
    /// Process queues per warrior
    queues: ProcessQueues,
    /// Completed cycles
    cycle: u32,
    /// Set once the round has settled
    outcome: Option<Outcome>,
    /// Optional synchronous event observer
    sink: Option<Box<dyn EventSink>>,
}

impl Round {
    /// Build a round: validate the configuration, place every warrior, and
    /// seed one process each at its start offset.
    ///
    /// # Errors
    ///
    /// Returns a [`RoundError`] for invalid configurations and for warrior
    /// sets that cannot be placed.
    pub fn new(
        config: RoundConfig,
        warriors: &[RelaxedWarrior],
    ) -> Result<Self, RoundError> {
        config.validate()?;

        let mut rng = config.rng_seed.map_or_else(
            StdRng::from_entropy,
            StdRng::seed_from_u64,
        );
        let lengths = warriors.iter().map(|w| w.code.len()).collect_vec();
        let origins = placement::choose_origins(&config, &lengths, &mut rng)?;

        let extent = config.extent();
        let mut core = Core::new(extent);
        let mut queues =
            ProcessQueues::new(warriors.len(), config.max_processes);
        for (id, (warrior, &origin)) in
            warriors.iter().zip(&origins).enumerate()
        {
            for (offset, relaxed) in warrior.code.iter().enumerate() {
                let cell = origin + i32::try_from(offset).unwrap_or(0);
                core.write(cell, relaxed.normalize(config.core_size_x));
            }
            let start = i32::try_from(
                warrior.start.rem_euclid(i64::from(config.core_size_x)),
            )
            .unwrap_or(0);
            queues.push(id, (origin + start).normalize(extent));
        }

        let names = warriors
            .iter()
            .enumerate()
            .map(|(id, warrior)| {
                warrior
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("warrior {id}"))
            })
            .collect_vec();
        debug!("round ready: {}", names.iter().join(" vs "));

        Ok(Self {
            config,
            core,
            names,
            origins,
            queues,
            cycle: 0,
            outcome: None,
            sink: None,
        })
    }

    /// Execute one cycle: one slot for every warrior that is alive as the
    /// cycle begins.
    ///
    /// Calling `step` on a settled round is a no-op that reports the
    /// outcome again with no events.
    pub fn step(&mut self) -> CycleResult {
        if self.outcome.is_some() {
            return self.settled(vec![]);
        }

        let mut events = Vec::new();
        let live_at_start = (0..self.names.len())
            .filter(|&warrior| self.queues.is_alive(warrior))
            .collect_vec();

        for &warrior in &live_at_start {
            let Some(pc) = self.queues.pop(warrior) else {
                continue;
            };
            self.step_process(warrior, pc, &mut events);
            if !self.queues.is_alive(warrior) {
                debug!(
                    "warrior {warrior} lost its last process on cycle {}",
                    self.cycle
                );
                let event = Event {
                    kind: EventKind::WarriorKilled,
                    warrior,
                    pc,
                    addr: pc,
                };
                if let Some(sink) = self.sink.as_deref_mut() {
                    sink.emit(&event);
                }
                events.push(event);
            }
        }

        self.cycle = self.cycle.saturating_add(1);
        self.outcome = self.decide(&live_at_start);
        self.settled(events)
    }

    /// Step every cycle until the round settles
    pub fn run(&mut self) -> Outcome {
        loop {
            self.step();
            if let Some(outcome) = self.outcome {
                return outcome;
            }
        }
    }

    /// One process slot: fetch, resolve, execute, finalize increments
    fn step_process(
        &mut self,
        warrior: usize,
        pc: Point,
        events: &mut Vec<Event>,
    ) {
        let cycle = self.cycle;
        let core = &mut self.core;
        let queues = &mut self.queues;
        let mut journal =
            Journal::new(warrior, pc, events, self.sink.as_deref_mut());

        let current = core.read(pc);
        trace!("cycle {cycle}: warrior {warrior} runs `{current}` at {pc}");
        journal.record(EventKind::Executed, pc);

        let (a, inc_a) = operands::resolve(
            pc,
            current.a_mode,
            current.a_field,
            core,
            &mut journal,
        );
        let (b, inc_b) = operands::resolve(
            pc,
            current.b_mode,
            current.b_field,
            core,
            &mut journal,
        );

        execute::perform(OpInputs {
            warrior,
            pc,
            current,
            a,
            b,
            core: &mut *core,
            queues: &mut *queues,
            journal: &mut journal,
        });

        for cell in [inc_a, inc_b].into_iter().flatten() {
            operands::apply_increment(core, cell, &mut journal);
        }
    }

    /// Termination rules, applied after a full cycle
    fn decide(&self, live_at_start: &[usize]) -> Option<Outcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        let live_after = (0..self.names.len())
            .filter(|&warrior| self.queues.is_alive(warrior))
            .collect_vec();

        let outcome = if live_after.is_empty() {
            // A sole survivor that dies still outlived the others; a
            // multi-warrior wipeout on one cycle is a draw
            if live_at_start.len() == 1 {
                live_at_start.first().copied().map(Outcome::Winner)
            } else {
                Some(Outcome::Tie)
            }
        } else if live_after.len() == 1 && self.names.len() > 1 {
            live_after.first().copied().map(Outcome::Winner)
        } else if self.cycle >= self.config.cycles {
            Some(Outcome::Tie)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            match outcome {
                Outcome::Winner(warrior) => debug!(
                    "round over after {} cycles: {} wins",
                    self.cycle,
                    self.names.get(warrior).map_or("?", String::as_str)
                ),
                Outcome::Tie => {
                    debug!("round over after {} cycles: tie", self.cycle);
                }
            }
        }
        outcome
    }

    /// Package the current settlement state with this cycle's events
    fn settled(&self, events: Vec<Event>) -> CycleResult {
        CycleResult {
            winner: self.outcome.and_then(Outcome::winner),
            tied: self.outcome == Some(Outcome::Tie),
            events,
        }
    }

    /// The instruction at a point, for observers
    #[must_use]
    pub fn read_cell(&self, p: Point) -> Instruction {
        self.core.read(p)
    }

    /// Copy of the whole core, row-major
    #[must_use]
    pub fn snapshot(&self) -> Vec<Instruction> {
        self.core.snapshot()
    }

    /// Replace the next program counter a warrior will execute
    pub fn set_pc(&mut self, warrior: usize, pc: Point) {
        let normalized = pc.normalize(self.config.extent());
        self.queues.set_head(warrior, normalized);
    }

    /// Copy of every process queue, indexed by warrior id, next process
    /// first
    #[must_use]
    pub fn queues(&self) -> Vec<Vec<Point>> {
        (0..self.names.len())
            .map(|warrior| self.queues.queue(warrior))
            .collect_vec()
    }

    /// Warrior display names, indexed by warrior id
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The placement origin chosen for each warrior
    #[must_use]
    pub fn origins(&self) -> &[Point] {
        &self.origins
    }

    /// Completed cycles
    #[must_use]
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// The settled result, if the round is over
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The configuration the round was built with
    #[must_use]
    pub const fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Attach a synchronous event observer.
    ///
    /// The sink sees every event from later `step` calls, before the
    /// following process slot begins.  It must not call back into the
    /// round.
    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }
}

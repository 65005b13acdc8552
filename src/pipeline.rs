//! The retimed pipeline.
//!
//! The register file has [`STAGES`] operation registers and one output register:
//!
//! - stage 0 holds the decoded operation admitted this tick,
//! - stages 1 through 5 sit after the iterations the [`PipelineSchedule`] retimes,
//! - stage 6 holds the operation after its last iteration,
//! - the output register holds the selected result of whatever left stage 6.
//!
//! Each stage register holds an [`Operation`], which carries its own [`ControlTag`](crate::ControlTag),
//! so an operation's tag crosses exactly the registers its accumulators cross.

use crate::{
	Error,
	engine::{ITERATIONS, Operation},
	fixed::Q14,
	function::{Function, decode},
	select::select,
};

pub const RETIMED_BOUNDARIES: usize = 5;

pub const STAGES: usize = RETIMED_BOUNDARIES + 2;

/// Ticks from admission until the result is in the output register.
pub const LATENCY: usize = STAGES;

pub type Segments = [core::ops::Range<usize>; STAGES - 1];

/// Which iterations are followed by a pipeline register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipelineSchedule {
	retimed: [bool; ITERATIONS],
}

impl PipelineSchedule {
	pub fn new(retimed: [bool; ITERATIONS]) -> Result<Self, Error> {
		// The last iteration always feeds the final stage register.
		if retimed[ITERATIONS - 1] {
			return Err(Error::FinalIterationRetimed);
		}

		let actual = retimed.iter().filter(|&&retimed| retimed).count();
		if actual != RETIMED_BOUNDARIES {
			return Err(Error::RetimedBoundaryCount { expected: RETIMED_BOUNDARIES, actual });
		}

		Ok(Self { retimed })
	}

	pub fn from_boundaries(boundaries: &[usize]) -> Result<Self, Error> {
		let mut retimed = [false; ITERATIONS];
		for &i in boundaries {
			let Some(entry) = retimed.get_mut(i) else { return Err(Error::BoundaryOutOfRange(i)); };
			*entry = true;
		}
		Self::new(retimed)
	}

	pub fn is_retimed(&self, i: usize) -> bool {
		self.retimed.get(i).copied().unwrap_or_default()
	}

	/// The iterations computed between consecutive stage registers.
	pub fn segments(&self) -> Segments {
		let mut segments: Segments = Default::default();
		let mut segment = 0;
		let mut start = 0;
		for (i, &retimed) in self.retimed.iter().enumerate() {
			if retimed || i == ITERATIONS - 1 {
				segments[segment] = start..(i + 1);
				segment += 1;
				start = i + 1;
			}
		}
		segments
	}
}

impl Default for PipelineSchedule {
	/// Registers after iterations 3, 7, 11, 14 and 17, so the stages run 4, 4, 4, 3, 3 and 3 iterations.
	fn default() -> Self {
		let mut retimed = [false; ITERATIONS];
		for i in [3, 7, 11, 14, 17] {
			retimed[i] = true;
		}
		Self { retimed }
	}
}

/// One tick's worth of input ports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Input {
	pub x: Q14,
	pub y: Q14,
	pub code: u8,
}

impl Input {
	/// Admits nothing.
	pub const BUBBLE: Self = Self { x: Q14(0), y: Q14(0), code: 0 };

	pub fn new(function: Function, x: Q14, y: Q14) -> Self {
		Self { x, y, code: function.code() }
	}
}

impl core::fmt::Display for Input {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match Function::try_from(self.code) {
			Ok(function) if function.uses_y() => write!(f, "{function:<5} x={} y={}", self.x, self.y),
			Ok(function) => write!(f, "{function:<5} x={}", self.x),
			Err(_) => write!(f, "0b{:05b} (bubble)", self.code),
		}
	}
}

/// A snapshot of every pipeline register.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
	stages: [Option<Operation>; STAGES],
	result: Q14,
}

impl Registers {
	/// The registers after one clock edge. `self` is not modified, so no stage can observe
	/// a value written during the same tick.
	pub fn advance(&self, segments: &Segments, admitted: Option<Operation>) -> Self {
		let mut next = Self { stages: [None; STAGES], result: self.result };

		next.stages[0] = admitted;
		for (stage, segment) in segments.iter().enumerate() {
			next.stages[stage + 1] = self.stages[stage].map(|op| op.run(segment.clone()));
		}

		// Bubbles leave the previous result in place.
		if let Some(op) = &self.stages[STAGES - 1] {
			next.result = select(op);
		}

		next
	}

	pub fn stage(&self, stage: usize) -> Option<&Operation> {
		self.stages.get(stage)?.as_ref()
	}

	pub fn result(&self) -> Q14 {
		self.result
	}

	pub fn in_flight(&self) -> usize {
		self.stages.iter().filter(|stage| stage.is_some()).count()
	}
}

impl core::fmt::Display for Registers {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		for (i, stage) in self.stages.iter().enumerate() {
			match stage {
				Some(op) => writeln!(f, "stage {i}: {op}")?,
				None => writeln!(f, "stage {i}: -")?,
			}
		}
		write!(f, "result:  0x{:04x} ({})", self.result.0.cast_unsigned(), self.result)
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
	pub ticks: u64,
	pub admitted: u64,
	pub bubbles: u64,
	pub retired: u64,
}

impl core::fmt::Display for Statistics {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		writeln!(f, "ticks:    {}", self.ticks)?;
		writeln!(f, "admitted: {}", self.admitted)?;
		writeln!(f, "bubbles:  {}", self.bubbles)?;
		writeln!(f, "retired:  {}", self.retired)?;
		Ok(())
	}
}

#[derive(Debug)]
pub struct Pipeline {
	schedule: PipelineSchedule,
	segments: Segments,
	registers: Registers,
	statistics: Statistics,
}

impl Pipeline {
	pub fn new(schedule: PipelineSchedule) -> Self {
		Self {
			schedule,
			segments: schedule.segments(),
			registers: Default::default(),
			statistics: Default::default(),
		}
	}

	/// Admits `input` and returns the output register, which holds the result of the input admitted
	/// [`LATENCY`] ticks ago.
	///
	/// An input with an invalid function code admits a bubble.
	pub fn tick(&mut self, input: Input) -> Q14 {
		let tick = self.statistics.ticks;

		let admitted = match decode(input.x, input.y, input.code) {
			Ok(op) => {
				self.statistics.admitted += 1;
				Some(op)
			},

			Err(err) => {
				log::debug!("tick {tick}: {err}, admitting a bubble");
				self.statistics.bubbles += 1;
				None
			},
		};

		if self.registers.stage(STAGES - 1).is_some() {
			self.statistics.retired += 1;
		}

		let next = self.registers.advance(&self.segments, admitted);
		self.registers = next;
		self.statistics.ticks += 1;

		log::trace!("===== {tick} =====\n{}", self.registers);

		self.registers.result()
	}

	pub fn schedule(&self) -> &PipelineSchedule {
		&self.schedule
	}

	pub fn registers(&self) -> &Registers {
		&self.registers
	}

	pub fn statistics(&self) -> &Statistics {
		&self.statistics
	}
}

impl Default for Pipeline {
	fn default() -> Self {
		Self::new(Default::default())
	}
}

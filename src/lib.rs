//! A pipelined CORDIC engine over 16-bit Q1.14 operands.
//!
//! Eight functions share one 21-iteration shift-add recurrence. The recurrence is retimed into a pipeline
//! that admits one operation per tick and returns each result exactly [`LATENCY`] ticks later.

#![no_std]

mod adder;
pub use adder::add_with_carry;

mod engine;
pub use engine::{Decision, ITERATIONS, IterationState, Operation, evaluate};

mod fixed;
pub use fixed::{LOAD_SHIFT, Q14, Word};

mod function;
pub use function::{Accumulator, ControlTag, Function, Kind, Mode, ModeConfig, SkipMask, decode};

mod pipeline;
pub use pipeline::{Input, LATENCY, Pipeline, PipelineSchedule, RETIMED_BOUNDARIES, Registers, STAGES, Segments, Statistics};

mod rom;
pub use rom::table as rom_table;

mod select;
pub use select::select;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid function code 0b{0:05b}")]
	InvalidFunctionCode(u8),

	#[error("function code {0:#x} does not fit in 5 bits")]
	FunctionCodeOutOfRange(u8),

	#[error("unknown function name")]
	UnknownFunctionName,

	#[error("pipeline schedule retimes {actual} boundaries, expected {expected}")]
	RetimedBoundaryCount { expected: usize, actual: usize },

	#[error("pipeline schedule cannot retime the last iteration")]
	FinalIterationRetimed,

	#[error("iteration {0} is out of range")]
	BoundaryOutOfRange(usize),
}

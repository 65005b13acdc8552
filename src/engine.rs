//! The shift-add-subtract recurrence.

use crate::{
	adder,
	fixed::Word,
	function::{ControlTag, Kind, Mode, ModeConfig},
	rom,
};

pub const ITERATIONS: usize = 21;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
	Add,
	Subtract,
}

impl Decision {
	pub fn opposite(self) -> Self {
		match self {
			Self::Add => Self::Subtract,
			Self::Subtract => Self::Add,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IterationState {
	/// The next iteration to run. [`ITERATIONS`] once the recurrence is done.
	pub index: usize,
	pub x: Word,
	pub y: Word,
	pub z: Word,
	pub decision: Decision,
}

impl IterationState {
	pub fn initial(x: Word, y: Word, z: Word, decision: Decision) -> Self {
		Self { index: 0, x, y, z, decision }
	}

	pub fn is_complete(&self) -> bool {
		self.index == ITERATIONS
	}

	/// Runs iteration `self.index`.
	pub fn step(self, config: ModeConfig) -> Self {
		let i = self.index;
		assert!(i < ITERATIONS, "recurrence already complete");

		let (x, y, z) =
			if config.skip_mask().contains(i) {
				(self.x, self.y, self.z)
			}
			else {
				let d = self.decision;
				let shift_x = self.x >> i;
				let shift_y = self.y >> i;

				let x = match config.mode {
					Mode::Circular => accumulate(self.x, shift_y, d.opposite()),
					Mode::Linear => self.x,
					Mode::Hyperbolic => accumulate(self.x, shift_y, d),
				};
				let y = accumulate(self.y, shift_x, d);
				let z = accumulate(self.z, rom::entry(config.mode, i), d.opposite());
				(x, y, z)
			};

		let decision = match config.kind {
			Kind::Rotation => if z.is_negative() { Decision::Subtract } else { Decision::Add },
			Kind::Vectoring => if y.is_negative() { Decision::Add } else { Decision::Subtract },
		};

		Self { index: i + 1, x, y, z, decision }
	}
}

fn accumulate(acc: Word, operand: Word, decision: Decision) -> Word {
	match decision {
		Decision::Add => adder::add(acc, operand),
		Decision::Subtract => adder::sub(acc, operand),
	}
}

/// An admitted operation: its accumulators and the tag that governs them, always moved together.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Operation {
	pub state: IterationState,
	pub tag: ControlTag,
}

impl Operation {
	/// Runs `iterations`, which must start at the operation's next iteration.
	pub fn run(self, iterations: core::ops::Range<usize>) -> Self {
		assert_eq!(self.state.index, iterations.start, "operation is not at the start of {iterations:?}");
		let config = self.tag.config;
		let state = iterations.fold(self.state, |state, _| state.step(config));
		Self { state, tag: self.tag }
	}
}

impl core::fmt::Display for Operation {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let IterationState { index, x, y, z, decision } = self.state;
		let decision = match decision {
			Decision::Add => '+',
			Decision::Subtract => '-',
		};
		write!(f, "{} i={index:>2} x={x} y={y} z={z} d={decision}", self.tag)
	}
}

/// Runs the rest of the recurrence with no registers in between.
pub fn evaluate(op: Operation) -> Operation {
	op.run(op.state.index..ITERATIONS)
}

#[cfg(test)]
mod tests {
	use super::{Decision, ITERATIONS, evaluate};
	use crate::{
		fixed::{Q14, Word},
		function::{Function, decode},
		select::select,
	};

	fn compute(function: Function, x: i16, y: i16) -> i16 {
		let op = decode(Q14(x), Q14(y), function.code()).unwrap();
		let op = evaluate(op);
		assert!(op.state.is_complete());
		select(&op).0
	}

	#[test]
	fn golden() {
		const TESTS: &[(Function, i16, i16, i16)] = &[
			// cos(0.78) ~ 0.7109
			(Function::Cos, 12779, 0, 11647),
			(Function::Cos, 0, 0, 16384),
			(Function::Sin, 12779, 0, 11522),
			(Function::Sin, 0, 0, 0),
			// 0.99 * 0.99 ~ 0.9801
			(Function::Mul, 16220, 16220, 16057),
			(Function::Mul, 8192, 4096, 2048),
			(Function::Cosh, 8192, 0, 18475),
			(Function::Cosh, 0, 0, 16399),
			(Function::Sinh, 8192, 0, 8537),
			(Function::Sinh, 17039, 0, 20281),
			// 0.74 / 1.0
			(Function::Div, 16384, 12124, 12124),
			(Function::Div, 9830, 6553, 10922),
			(Function::Atan, 8192, 0, 7596),
			// atanh(0.8) ~ 1.0986
			(Function::Atanh, 13107, 0, 17292),
			(Function::Atanh, 8192, 0, 9076),
		];
		for &(function, x, y, expected) in TESTS {
			assert_eq!(compute(function, x, y), expected, "{function}({x}, {y})");
		}
	}

	#[test]
	fn single_operand_functions_ignore_y() {
		for function in [Function::Cos, Function::Sin, Function::Cosh, Function::Sinh, Function::Atan, Function::Atanh] {
			assert!(!function.uses_y());
			assert_eq!(compute(function, 8192, 0), compute(function, 8192, -12345), "{function}");
		}
	}

	#[test]
	fn out_of_domain_wraps() {
		// atan(1.1): the X accumulator leaves the word's range and wraps.
		assert_eq!(compute(Function::Atan, 18022, 0), 28561);
	}

	#[test]
	fn hyperbolic_skips_first_iteration() {
		let op = decode(Q14(8192), Q14(0), Function::Sinh.code()).unwrap();
		let next = op.state.step(op.tag.config);
		assert_eq!(next.index, 1);
		assert_eq!((next.x, next.y, next.z), (op.state.x, op.state.y, op.state.z));
		assert_eq!(next.decision, Decision::Add);

		// Vectoring still recomputes its decision from the unchanged y.
		let op = decode(Q14(-8192), Q14(0), Function::Atanh.code()).unwrap();
		assert_eq!(op.state.decision, Decision::Subtract);
		let next = op.state.step(op.tag.config);
		assert_eq!((next.x, next.y, next.z), (op.state.x, op.state.y, op.state.z));
		assert_eq!(next.decision, Decision::Add);
	}

	#[test]
	fn first_iteration() {
		// cos(0.5): y += x, x -= y (zero), z -= atan(1)
		let op = decode(Q14(8192), Q14(0), Function::Cos.code()).unwrap();
		let next = op.state.step(op.tag.config);
		assert_eq!(next.x.to_raw(), 636_750);
		assert_eq!(next.y.to_raw(), 636_750);
		assert_eq!(next.z.to_raw(), (8192 << 6) - 823_549);
		assert_eq!(next.decision, Decision::Subtract);

		// div(0.5, 1.0): y -= x, z += 1, x untouched
		let op = decode(Q14(16384), Q14(8192), Function::Div.code()).unwrap();
		let next = op.state.step(op.tag.config);
		assert_eq!(next.x, op.state.x);
		assert_eq!(next.y.to_raw(), (8192 << 6) - (16384 << 6));
		assert_eq!(next.z, Word::from_raw(1 << 20));
		assert_eq!(next.decision, Decision::Add);
	}

	#[test]
	fn run_in_pieces_matches_evaluate() {
		for function in Function::ALL {
			let op = decode(Q14(7000), Q14(5000), function.code()).unwrap();
			let pieces = op.run(0..4).run(4..13).run(13..ITERATIONS);
			assert_eq!(pieces, evaluate(op), "{function}");
		}
	}

	#[test]
	#[should_panic = "recurrence already complete"]
	fn step_past_the_end() {
		let op = evaluate(decode(Q14(0), Q14(0), Function::Cos.code()).unwrap());
		_ = op.state.step(op.tag.config);
	}
}

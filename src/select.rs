use crate::{
	engine::Operation,
	fixed::Q14,
	function::Accumulator,
};

/// Reads a completed operation's result.
pub fn select(op: &Operation) -> Q14 {
	debug_assert!(op.state.is_complete(), "selecting from an operation at iteration {}", op.state.index);

	let word = match op.tag.function.output() {
		Accumulator::X => op.state.x,
		Accumulator::Y => op.state.y,
		Accumulator::Z => op.state.z,
	};
	word.truncate()
}

#[cfg(test)]
mod tests {
	use super::select;
	use crate::{
		engine::{Decision, ITERATIONS, IterationState, Operation},
		fixed::{Q14, Word},
		function::{ControlTag, Function},
	};

	#[test]
	fn reads_accumulator_per_function() {
		let state = IterationState {
			index: ITERATIONS,
			x: Word::from_raw(0x1000 << 6),
			y: Word::from_raw((0x2000 << 6) | 0x3f),
			z: Word::from_raw(-0x3000 << 6),
			decision: Decision::Add,
		};
		for function in Function::ALL {
			let op = Operation { state, tag: ControlTag { function, config: function.config() } };
			let expected = match function {
				Function::Cos | Function::Cosh => 0x1000,
				Function::Sin | Function::Sinh | Function::Mul => 0x2000,
				Function::Div | Function::Atan | Function::Atanh => -0x3000,
			};
			assert_eq!(select(&op), Q14(expected), "{function}");
		}
	}
}

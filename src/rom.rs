//! Per-iteration constants, scaled by 2^20 and truncated.

use crate::{
	engine::ITERATIONS,
	fixed::Word,
	function::Mode,
};

/// `atan(2^-i)`
const CIRCULAR: [i32; ITERATIONS] = [
	823_549, 486_169, 256_878, 130_395, 65_450, 32_757, 16_382, 8_191, 4_095, 2_047, 1_023,
	511, 255, 127, 63, 31, 15, 7, 3, 1, 0,
];

/// `2^-i`
const LINEAR: [i32; ITERATIONS] = [
	1_048_576, 524_288, 262_144, 131_072, 65_536, 32_768, 16_384, 8_192, 4_096, 2_048, 1_024,
	512, 256, 128, 64, 32, 16, 8, 4, 2, 1,
];

/// `atanh(2^-i)`. Entry 0 is never read since hyperbolic operations skip iteration 0.
const HYPERBOLIC: [i32; ITERATIONS] = [
	0, 575_989, 267_819, 131_761, 65_621, 32_778, 16_385, 8_192, 4_096, 2_048, 1_024,
	512, 256, 128, 64, 32, 16, 8, 4, 2, 1,
];

pub fn table(mode: Mode) -> &'static [i32; ITERATIONS] {
	match mode {
		Mode::Circular => &CIRCULAR,
		Mode::Linear => &LINEAR,
		Mode::Hyperbolic => &HYPERBOLIC,
	}
}

pub(crate) fn entry(mode: Mode, i: usize) -> Word {
	Word::from_raw(table(mode)[i])
}

#[cfg(test)]
mod tests {
	use super::table;
	use crate::{engine::ITERATIONS, function::Mode};

	#[allow(clippy::cast_possible_truncation)]
	fn scaled(value: f64) -> i32 {
		(value * f64::from(1 << 20)) as i32
	}

	#[test]
	fn tables_match_their_functions() {
		for i in 0..ITERATIONS {
			let exp = libm::exp2(-f64::from(u8::try_from(i).unwrap()));
			assert_eq!(table(Mode::Circular)[i], scaled(libm::atan(exp)), "circular {i}");
			assert_eq!(table(Mode::Linear)[i], scaled(exp), "linear {i}");
			if i > 0 {
				assert_eq!(table(Mode::Hyperbolic)[i], scaled(libm::atanh(exp)), "hyperbolic {i}");
			}
		}
		assert_eq!(table(Mode::Hyperbolic)[0], 0);
	}

	#[test]
	fn hyperbolic_converges_to_linear() {
		for i in 7..ITERATIONS {
			assert_eq!(table(Mode::Hyperbolic)[i], table(Mode::Linear)[i]);
		}
	}
}

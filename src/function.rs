//! Function codes and the decoder that turns an admitted input into an initial operation.

use crate::{
	Error,
	engine::{Decision, ITERATIONS, IterationState, Operation},
	fixed::{Q14, Word},
};

/// Circular gain compensation, 0.607253.
const K: i32 = 636_750;

/// Hyperbolic gain compensation, 1.20514.
///
/// This is the inverse gain of the hyperbolic sequence without repeated iterations.
/// It is not the circular inverse gain 1.6467.
const K_INV: i32 = 1_263_680;

const ONE: i32 = 1 << Word::FRAC_BITS;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Function {
	Cos,
	Sin,
	Mul,
	Cosh,
	Sinh,
	Div,
	Atan,
	Atanh,
}

impl Function {
	pub const ALL: [Self; 8] = [
		Self::Cos,
		Self::Sin,
		Self::Mul,
		Self::Cosh,
		Self::Sinh,
		Self::Div,
		Self::Atan,
		Self::Atanh,
	];

	pub fn code(self) -> u8 {
		match self {
			Self::Cos => 0b00001,
			Self::Sin => 0b00101,
			Self::Mul => 0b00100,
			Self::Cosh => 0b00010,
			Self::Sinh => 0b00110,
			Self::Div => 0b01100,
			Self::Atan => 0b01101,
			Self::Atanh => 0b01110,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Cos => "cos",
			Self::Sin => "sin",
			Self::Mul => "mul",
			Self::Cosh => "cosh",
			Self::Sinh => "sinh",
			Self::Div => "div",
			Self::Atan => "atan",
			Self::Atanh => "atanh",
		}
	}

	pub fn config(self) -> ModeConfig {
		let (mode, kind) = match self {
			Self::Cos | Self::Sin => (Mode::Circular, Kind::Rotation),
			Self::Mul => (Mode::Linear, Kind::Rotation),
			Self::Cosh | Self::Sinh => (Mode::Hyperbolic, Kind::Rotation),
			Self::Div => (Mode::Linear, Kind::Vectoring),
			Self::Atan => (Mode::Circular, Kind::Vectoring),
			Self::Atanh => (Mode::Hyperbolic, Kind::Vectoring),
		};
		ModeConfig { mode, kind }
	}

	/// The accumulator the result is read from once all iterations are done.
	pub fn output(self) -> Accumulator {
		match self {
			Self::Cos | Self::Cosh => Accumulator::X,
			Self::Sin | Self::Sinh | Self::Mul => Accumulator::Y,
			Self::Div | Self::Atan | Self::Atanh => Accumulator::Z,
		}
	}

	/// The single-operand functions ignore `y`.
	pub fn uses_y(self) -> bool {
		matches!(self, Self::Mul | Self::Div)
	}
}

impl TryFrom<u8> for Function {
	type Error = Error;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		Ok(match code {
			0b00001 => Self::Cos,
			0b00101 => Self::Sin,
			0b00100 => Self::Mul,
			0b00010 => Self::Cosh,
			0b00110 => Self::Sinh,
			0b01100 => Self::Div,
			0b01101 => Self::Atan,
			0b01110 => Self::Atanh,
			0b00000..=0b11111 => return Err(Error::InvalidFunctionCode(code)),
			_ => return Err(Error::FunctionCodeOutOfRange(code)),
		})
	}
}

impl core::str::FromStr for Function {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter()
			.find(|function| function.name() == s)
			.ok_or(Error::UnknownFunctionName)
	}
}

impl core::fmt::Display for Function {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.pad(self.name())
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
	Circular,
	Linear,
	Hyperbolic,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
	/// Drives Z to zero.
	Rotation,
	/// Drives Y to zero.
	Vectoring,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Accumulator {
	X,
	Y,
	Z,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModeConfig {
	pub mode: Mode,
	pub kind: Kind,
}

impl ModeConfig {
	pub fn skip_mask(self) -> SkipMask {
		match self.mode {
			// atanh(2^0) does not exist.
			Mode::Hyperbolic => SkipMask::FIRST,
			Mode::Circular | Mode::Linear => SkipMask::NONE,
		}
	}

	pub fn initial_decision(self) -> Decision {
		match self.kind {
			Kind::Rotation => Decision::Add,
			Kind::Vectoring => Decision::Subtract,
		}
	}
}

/// Iterations that pass the accumulators through unchanged. Bit `i` is iteration `i`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct SkipMask(u32);

impl SkipMask {
	pub const NONE: Self = Self(0);
	pub const FIRST: Self = Self(1);

	pub fn contains(self, i: usize) -> bool {
		i < ITERATIONS && self.0 & (1 << i) != 0
	}
}

/// Everything about an operation that stays fixed between admission and retirement.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ControlTag {
	pub function: Function,
	pub config: ModeConfig,
}

impl core::fmt::Display for ControlTag {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{:<5} 0b{:05b}", self.function, self.function.code())
	}
}

/// Loads the accumulators for function `code` and attaches its tag.
pub fn decode(x: Q14, y: Q14, code: u8) -> Result<Operation, Error> {
	let function = Function::try_from(code)?;
	let config = function.config();

	let x = Word::load(x);
	let y = Word::load(y);
	let zero = Word::zero();

	let (x0, y0, z0) = match function {
		Function::Cos | Function::Sin => (Word::from_raw(K), zero, x),
		Function::Mul => (x, zero, y),
		Function::Cosh | Function::Sinh => (Word::from_raw(K_INV), zero, x),
		Function::Div => (x, y, zero),
		Function::Atan | Function::Atanh => (Word::from_raw(ONE), x, zero),
	};

	Ok(Operation {
		state: IterationState::initial(x0, y0, z0, config.initial_decision()),
		tag: ControlTag { function, config },
	})
}

//! Input vectors: parsed from a file, or generated inside each function's accuracy domain.
//!
//! File format, one vector per line:
//!
//!     # comment
//!     cos 0.78
//!     mul 0.99 0.99
//!     0b00011 0.5

use cordic::{Function, Input, Q14};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
	#[error("line {line}: expected `<function> <x> [<y>]`")]
	MissingOperand { line: usize },

	#[error("line {line}: unknown function {token:?}")]
	UnknownFunction { line: usize, token: String },

	#[error("line {line}: malformed operand {token:?}")]
	MalformedOperand { line: usize, token: String },

	#[error("line {line}: operand {value} is outside [-2, 2)")]
	OperandOutOfRange { line: usize, value: f64 },

	#[error("line {line}: trailing garbage {token:?}")]
	TrailingGarbage { line: usize, token: String },
}

pub(crate) fn parse(source: &str) -> Result<Vec<Input>, ParseError> {
	let mut inputs = vec![];

	for (line, text) in (1..).zip(source.lines()) {
		let text = text.split_once('#').map_or(text, |(text, _)| text);
		let mut tokens = text.split_whitespace();

		let Some(function) = tokens.next() else { continue; };
		let code = parse_code(function).ok_or_else(|| ParseError::UnknownFunction { line, token: function.to_owned() })?;

		let x = tokens.next().ok_or(ParseError::MissingOperand { line })?;
		let x = parse_operand(x, line)?;

		let y = match tokens.next() {
			Some(y) => parse_operand(y, line)?,
			None if Function::try_from(code).is_ok_and(Function::uses_y) => return Err(ParseError::MissingOperand { line }),
			None => Q14(0),
		};

		if let Some(token) = tokens.next() {
			return Err(ParseError::TrailingGarbage { line, token: token.to_owned() });
		}

		inputs.push(Input { x, y, code });
	}

	Ok(inputs)
}

// A function name, or any 5-bit code written as `0bNNNNN`.
fn parse_code(token: &str) -> Option<u8> {
	if let Some(bits) = token.strip_prefix("0b") {
		u8::from_str_radix(bits, 2).ok().filter(|&code| code <= 0b11111)
	}
	else {
		token.parse::<Function>().ok().map(Function::code)
	}
}

fn parse_operand(token: &str, line: usize) -> Result<Q14, ParseError> {
	let value: f64 = token.parse().map_err(|_| ParseError::MalformedOperand { line, token: token.to_owned() })?;
	if !(-2.0..2.0).contains(&value) {
		return Err(ParseError::OperandOutOfRange { line, value });
	}
	Ok(Q14::from_f64(value))
}

/// A random vector inside the domain where `function` is expected to meet its tolerance.
pub(crate) fn random(rng: &mut impl rand::Rng, function: Function) -> Input {
	let (x, y) = match function {
		Function::Cos | Function::Sin => (rng.gen_range(0.0..1.45), 0.0),
		Function::Mul => (rng.gen_range(0.0..1.99), rng.gen_range(0.0..1.0)),
		Function::Cosh | Function::Sinh => (rng.gen_range(0.0..1.05), 0.0),
		Function::Div => {
			let x = rng.gen_range(0.25..1.99);
			(x, rng.gen_range(0.0..(1.99 * x).min(1.99)))
		},
		// Beyond ~0.68 the X accumulator outgrows the word and wraps.
		Function::Atan => (rng.gen_range(0.0..=0.68), 0.0),
		Function::Atanh => (rng.gen_range(-0.8..=0.8), 0.0),
	};
	Input::new(function, Q14::from_f64(x), Q14::from_f64(y))
}

/// The edges of every function's domain.
pub(crate) fn boundary() -> Vec<Input> {
	const VECTORS: &[(Function, f64, f64)] = &[
		(Function::Cos, 0.0, 0.0),
		(Function::Cos, 1.449, 0.0),
		(Function::Sin, 0.0, 0.0),
		(Function::Sin, 1.449, 0.0),
		(Function::Mul, 0.99, 0.99),
		(Function::Mul, 1.99, 0.99),
		(Function::Mul, 0.0, 0.99),
		(Function::Cosh, 0.0, 0.0),
		(Function::Cosh, 1.049, 0.0),
		(Function::Sinh, 0.0, 0.0),
		(Function::Sinh, 1.049, 0.0),
		(Function::Div, 1.0, 0.74),
		(Function::Div, 1.0, 1.98),
		(Function::Div, 1.99, 0.0),
		(Function::Div, 0.25, 0.49),
		(Function::Atan, 0.0, 0.0),
		(Function::Atan, 0.68, 0.0),
		(Function::Atanh, 0.0, 0.0),
		(Function::Atanh, 0.8, 0.0),
		(Function::Atanh, -0.8, 0.0),
	];

	VECTORS.iter()
		.map(|&(function, x, y)| Input::new(function, Q14::from_f64(x), Q14::from_f64(y)))
		.collect()
}

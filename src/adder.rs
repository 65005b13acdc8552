//! The two-operand add-with-carry primitive behind every accumulator update.

use crate::fixed::Word;

/// `a + b + carry_in` over the datapath width, and the carry out of the top bit.
///
/// There is no overflow signal beyond the carry. Signed overflow wraps.
pub fn add_with_carry(a: Word, b: Word, carry_in: bool) -> (Word, bool) {
	a.cin_sum(b, carry_in)
}

pub(crate) fn add(a: Word, b: Word) -> Word {
	add_with_carry(a, b, false).0
}

// a + !b + 1
pub(crate) fn sub(a: Word, b: Word) -> Word {
	add_with_carry(a, b.not(), true).0
}

//! Fixed-point formats.
//!
//! Operands and results are Q1.14 in 16 bits. The datapath works on a 22-bit word scaled by 2^20,
//! so operands are shifted left by [`LOAD_SHIFT`] on load and results are the top 16 bits of the word.

mod awint {
	use awint::{Bits, InlAwi};

	type Awi22 = awint::inlawi_ty!(22);
	type Awi32 = awint::inlawi_ty!(32);

	/// A 22-bit two's-complement datapath word. All arithmetic on it wraps.
	#[derive(Clone, Copy, Debug)]
	#[repr(transparent)]
	pub struct Word(Awi22);

	impl Word {
		pub const WIDTH: usize = 22;

		pub fn zero() -> Self {
			Self(Awi22::zero())
		}

		/// Keeps the low 22 bits of `raw`.
		pub fn from_raw(raw: i32) -> Self {
			let raw: Awi32 = raw.into();
			let mut result = Awi22::zero();
			result.zero_resize_(&raw);
			Self(result)
		}

		/// Sign-extends the word to an `i32`.
		pub fn to_raw(self) -> i32 {
			let mut result = Awi32::zero();
			result.sign_resize_(&self.0);
			result.to_i32()
		}

		pub fn is_negative(self) -> bool {
			self.0.msb()
		}

		pub(crate) fn not(self) -> Self {
			let mut inner = self.0;
			inner.not_();
			Self(inner)
		}

		// (self + rhs + carry_in, carry_out)
		pub(crate) fn cin_sum(self, rhs: Self, carry_in: bool) -> (Self, bool) {
			let mut sum = Awi22::zero();
			let (carry_out, _signed_overflow) = sum.cin_sum_(carry_in, &self.0, &rhs.0).unwrap();
			(Self(sum), carry_out)
		}
	}

	impl core::ops::Shr<usize> for Word {
		type Output = Self;

		fn shr(self, rhs: usize) -> Self::Output {
			let mut inner = self.0;
			inner.ashr_(rhs).unwrap();
			Self(inner)
		}
	}
}
pub use awint::Word;

/// Left shift applied to a Q1.14 operand to place it in the 2^20-scaled datapath word.
pub const LOAD_SHIFT: u32 = 6;

/// A 16-bit two's-complement operand or result, scaled by 2^14.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Q14(pub i16);

impl Q14 {
	pub const FRAC_BITS: u32 = 14;

	const SCALE: f64 = 16384.0;

	/// Truncates toward zero, saturating outside [-2, 2).
	#[allow(clippy::cast_possible_truncation)]
	pub fn from_f64(value: f64) -> Self {
		Self((value * Self::SCALE) as i16)
	}

	pub fn to_f64(self) -> f64 {
		f64::from(self.0) / Self::SCALE
	}
}

impl core::fmt::Display for Q14 {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{:.5}", self.to_f64())
	}
}

impl Word {
	pub const FRAC_BITS: u32 = Q14::FRAC_BITS + LOAD_SHIFT;

	pub fn load(operand: Q14) -> Self {
		Self::from_raw(i32::from(operand.0) << LOAD_SHIFT)
	}

	/// The top 16 bits of the word. Not rounded.
	#[allow(clippy::cast_possible_truncation)]
	pub fn truncate(self) -> Q14 {
		Q14((self.to_raw() >> LOAD_SHIFT) as i16)
	}
}

impl PartialEq for Word {
	fn eq(&self, other: &Self) -> bool {
		self.to_raw() == other.to_raw()
	}
}

impl Eq for Word {}

impl core::fmt::Display for Word {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "0x{:06x}", self.to_raw().cast_unsigned() & 0x3f_ffff)
	}
}

#[cfg(test)]
mod tests {
	use super::{Q14, Word};

	#[test]
	fn wraps_to_width() {
		assert_eq!(Word::from_raw(0x1f_ffff).to_raw(), 0x1f_ffff);
		assert_eq!(Word::from_raw(0x20_0000).to_raw(), -0x20_0000);
		assert_eq!(Word::from_raw(0x40_0001).to_raw(), 1);
		assert_eq!(Word::from_raw(-1).to_raw(), -1);
		assert!(Word::from_raw(-1).is_negative());
		assert!(!Word::zero().is_negative());
	}

	#[test]
	fn load_and_truncate() {
		for raw in [0_i16, 1, -1, 0x4000, -0x4000, i16::MAX, i16::MIN, 12779] {
			let word = Word::load(Q14(raw));
			assert_eq!(word.to_raw(), i32::from(raw) << 6);
			assert_eq!(word.truncate(), Q14(raw));
		}

		// Low six bits are dropped, not rounded.
		assert_eq!(Word::from_raw(0x3f).truncate(), Q14(0));
		assert_eq!(Word::from_raw(-1).truncate(), Q14(-1));
		assert_eq!(Word::from_raw((5 << 6) | 0x3f).truncate(), Q14(5));
	}

	#[test]
	fn arithmetic_shift() {
		assert_eq!((Word::from_raw(-0x10_0000) >> 4).to_raw(), -0x1_0000);
		assert_eq!((Word::from_raw(0x10_0000) >> 20).to_raw(), 1);
		assert_eq!((Word::from_raw(-1) >> 20).to_raw(), -1);
		assert_eq!((Word::from_raw(-3) >> 1).to_raw(), -2);
	}

	#[allow(clippy::float_cmp)]
	#[test]
	fn q14_conversions() {
		assert_eq!(Q14::from_f64(1.0), Q14(16384));
		assert_eq!(Q14::from_f64(0.99), Q14(16220));
		assert_eq!(Q14::from_f64(-0.5), Q14(-8192));
		assert_eq!(Q14::from_f64(2.5), Q14(i16::MAX));
		assert_eq!(Q14(16384).to_f64(), 1.0);
		assert_eq!(Q14(-8192).to_f64(), -0.5);
	}
}

//! Drives the pipeline and checks its results against double-precision references.

use cordic::{Function, Input, LATENCY, Pipeline, Q14};

pub(crate) fn reference(function: Function, x: f64, y: f64) -> f64 {
	match function {
		Function::Cos => x.cos(),
		Function::Sin => x.sin(),
		Function::Mul => x * y,
		Function::Cosh => x.cosh(),
		Function::Sinh => x.sinh(),
		Function::Div => y / x,
		Function::Atan => x.atan(),
		Function::Atanh => x.atanh(),
	}
}

pub(crate) fn tolerance(function: Function) -> f64 {
	match function {
		Function::Cos | Function::Sin | Function::Mul | Function::Div => 0.1,
		Function::Cosh | Function::Sinh | Function::Atan | Function::Atanh => 0.2,
	}
}

/// Admits `inputs` on consecutive ticks, then ticks until the last of them is out.
///
/// `retire` sees every input together with the result that left the pipeline for it.
pub(crate) fn drive(
	pipeline: &mut Pipeline,
	inputs: impl IntoIterator<Item = Input>,
	mut retire: impl FnMut(u64, Input, Q14),
) {
	let mut in_flight = std::collections::VecDeque::with_capacity(LATENCY + 1);

	for input in inputs.into_iter().chain(std::iter::repeat_n(Input::BUBBLE, LATENCY)) {
		let tick = pipeline.statistics().ticks;
		let result = pipeline.tick(input);

		in_flight.push_back(input);
		if in_flight.len() > LATENCY && let Some(admitted) = in_flight.pop_front() {
			retire(tick, admitted, result);
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct Summary {
	pub(crate) checked: usize,
	pub(crate) failures: usize,
	pub(crate) max_error: f64,
}

#[derive(Debug, Default)]
pub(crate) struct Report {
	summaries: std::collections::BTreeMap<Function, Summary>,
}

impl Report {
	/// Returns whether `result` is within tolerance. Bubbles are not checked.
	pub(crate) fn check(&mut self, input: Input, result: Q14) -> bool {
		let Ok(function) = Function::try_from(input.code) else { return true; };

		let expected = reference(function, input.x.to_f64(), input.y.to_f64());
		let error = (result.to_f64() - expected).abs();

		let summary = self.summaries.entry(function).or_default();
		summary.checked += 1;
		summary.max_error = summary.max_error.max(error);

		let passed = error <= tolerance(function);
		if !passed {
			summary.failures += 1;
			log::warn!("{input} -> {result}, expected {expected:.5} (error {error:.5})");
		}
		passed
	}

	pub(crate) fn checked(&self) -> usize {
		self.summaries.values().map(|summary| summary.checked).sum()
	}

	pub(crate) fn failures(&self) -> usize {
		self.summaries.values().map(|summary| summary.failures).sum()
	}
}

impl std::fmt::Display for Report {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "function  checked  failures  max error  tolerance")?;
		for (function, summary) in &self.summaries {
			writeln!(
				f,
				"{function:<8}  {:>7}  {:>8}  {:>9.5}  {:>9.1}",
				summary.checked,
				summary.failures,
				summary.max_error,
				tolerance(*function),
			)?;
		}
		Ok(())
	}
}

pub(crate) fn verify(pipeline: &mut Pipeline, inputs: impl IntoIterator<Item = Input>) -> Report {
	let mut report: Report = Default::default();
	drive(pipeline, inputs, |_, input, result| { report.check(input, result); });
	report
}

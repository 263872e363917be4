// self
use crate::obs::{FlowKind, FlowOutcome};

/// Increments `renault_session_flow_total` for `kind` and `outcome` on the global recorder.
///
/// Without the `metrics` feature this compiles to nothing.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"renault_session_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

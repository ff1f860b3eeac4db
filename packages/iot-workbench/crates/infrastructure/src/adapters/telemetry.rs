use domain::ports::Telemetry;

/// Telemetry sink that logs events through tracing. Emission is strictly
/// best-effort; there is nothing here that can fail the caller.
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn send_event(&self, name: &str, context: &serde_json::Value) {
        tracing::debug!(target: "telemetry", event = name, %context, "event");
    }
}

use crate::SensingState;
use vigil_com::EventServer;

/// Emission policy for derived events.
///
/// Wraps the broadcast transport with the two rules the wire protocol
/// promises: brightness is edge-triggered (a value equal to the last
/// published one is suppressed) and movement is gated by the configured
/// threshold. Everything that passes the policy is handed to the transport
/// fire-and-forget.
pub struct EventPublisher {
    server: EventServer,
}

impl EventPublisher {
    pub fn new(server: EventServer) -> Self {
        Self { server }
    }

    /// Publish `"brightness <value>"` if the value changed since the last
    /// emission. Returns whether an event went out.
    pub fn publish_brightness(&self, state: &mut SensingState, value: i64) -> bool {
        if value == state.last_brightness {
            return false;
        }

        state.last_brightness = value;
        self.server.publish(&format!("brightness {value}"));
        true
    }

    /// Publish `"movement <score>"` if the score reaches the threshold.
    /// Returns whether an event went out.
    pub fn publish_movement(&self, state: &SensingState, score: i64) -> bool {
        if score < state.threshold {
            return false;
        }

        self.server.publish(&format!("movement {score}"));
        true
    }

    /// The transport underneath, for address lookup and subscriptions.
    pub fn server(&self) -> &EventServer {
        &self.server
    }
}

//! Session lifecycle state machine
//!
//! Tracks one connection from accept to disconnect. Transitions are guarded:
//! a call made from the wrong phase is a no-op, so racing disconnect paths
//! cannot drive the machine backwards.

use crate::protocol::Role;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// TCP connected, I/O established, handshake not started
    Connecting,
    /// Waiting for the role line
    AwaitingRole,
    /// Role recorded, waiting for the topic line
    AwaitingTopic,
    /// Registered; relaying (publisher) or receiving (subscriber)
    Active(Role),
    /// Terminal; cleanup has been triggered
    Terminated,
}

impl SessionPhase {
    /// Phase for a freshly accepted connection
    pub fn new() -> Self {
        SessionPhase::Connecting
    }

    /// Begin the handshake
    pub fn begin_handshake(&mut self) {
        if *self == SessionPhase::Connecting {
            *self = SessionPhase::AwaitingRole;
        }
    }

    /// Record that a valid role line arrived
    pub fn role_received(&mut self) {
        if *self == SessionPhase::AwaitingRole {
            *self = SessionPhase::AwaitingTopic;
        }
    }

    /// Enter the active phase under the registered role
    pub fn activate(&mut self, role: Role) {
        if *self == SessionPhase::AwaitingTopic {
            *self = SessionPhase::Active(role);
        }
    }

    /// Enter the terminal phase (from any phase)
    pub fn terminate(&mut self) {
        *self = SessionPhase::Terminated;
    }

    /// Role, once active
    pub fn role(&self) -> Option<Role> {
        match self {
            SessionPhase::Active(role) => Some(*role),
            _ => None,
        }
    }

    /// Check if the session is active
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Active(_))
    }

    /// Check if the session has terminated
    pub fn is_terminated(&self) -> bool {
        *self == SessionPhase::Terminated
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut phase = SessionPhase::new();
        assert_eq!(phase, SessionPhase::Connecting);

        phase.begin_handshake();
        assert_eq!(phase, SessionPhase::AwaitingRole);

        phase.role_received();
        assert_eq!(phase, SessionPhase::AwaitingTopic);

        phase.activate(Role::Subscriber);
        assert!(phase.is_active());
        assert_eq!(phase.role(), Some(Role::Subscriber));

        phase.terminate();
        assert!(phase.is_terminated());
        assert_eq!(phase.role(), None);
    }

    #[test]
    fn test_out_of_order_transitions_ignored() {
        let mut phase = SessionPhase::new();

        // Activation before the handshake completes does nothing.
        phase.activate(Role::Publisher);
        assert_eq!(phase, SessionPhase::Connecting);

        phase.role_received();
        assert_eq!(phase, SessionPhase::Connecting);
    }

    #[test]
    fn test_terminate_from_any_phase() {
        let mut phase = SessionPhase::new();
        phase.terminate();
        assert!(phase.is_terminated());

        let mut phase = SessionPhase::new();
        phase.begin_handshake();
        phase.terminate();
        assert!(phase.is_terminated());
    }
}

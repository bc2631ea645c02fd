//! Simulated host-page behaviour and the event log.

use ego_tree::NodeId;
use pagebridge_protocols::DomEvent;

/// How the simulated page reacts to editing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostBehavior {
    /// A rich editor on the page consumes synthetic `paste` events inside a
    /// contenteditable region, inserts the payload and prevents default.
    pub paste_handled: bool,
    /// `execCommand` style editing is available.
    pub exec_command_supported: bool,
}

impl Default for HostBehavior {
    /// A plain browser page: edit commands work, nothing listens for paste.
    fn default() -> Self {
        Self {
            paste_handled: false,
            exec_command_supported: true,
        }
    }
}

impl HostBehavior {
    /// A page whose editor only accepts input through paste handling.
    pub fn paste_only() -> Self {
        Self {
            paste_handled: true,
            exec_command_supported: false,
        }
    }

    /// A page that ignores both paste and edit commands.
    pub fn inert() -> Self {
        Self {
            paste_handled: false,
            exec_command_supported: false,
        }
    }
}

/// One entry in the document's event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub event: DomEvent,
    pub default_prevented: bool,
}

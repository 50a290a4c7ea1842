//! Commands accepted by the call state machine

use crate::domain::call::value_object::OperatorStatus;
use crate::domain::shared::value_objects::CallId;

/// A request to change call or operator state
///
/// `ConnectCall` and `AutoIncoming` are issued by timers; everything else
/// arrives from the command intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dial { phone: Option<String> },
    ConnectCall { call_id: CallId },
    Answer,
    Hangup,
    SetOperatorStatus { status: OperatorStatus },
    Logout,
    AutoIncoming { number: String },
}

impl Command {
    /// Stable name used in logs and metrics labels
    pub fn name(&self) -> &'static str {
        match self {
            Command::Dial { .. } => "dial",
            Command::ConnectCall { .. } => "connect_call",
            Command::Answer => "answer",
            Command::Hangup => "hangup",
            Command::SetOperatorStatus { .. } => "set_operator_status",
            Command::Logout => "logout",
            Command::AutoIncoming { .. } => "auto_incoming",
        }
    }

    pub fn is_timer_issued(&self) -> bool {
        matches!(self, Command::ConnectCall { .. } | Command::AutoIncoming { .. })
    }
}

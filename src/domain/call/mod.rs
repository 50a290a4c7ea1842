//! Call bounded context - the single tracked call and operator status

pub mod aggregate;
pub mod command;
pub mod event;
pub mod machine;
pub mod value_object;

pub use aggregate::Call;
pub use command::Command;
pub use event::{CallConnected, CallEnded, CallIncoming, PhoneEvent, StatusChanged};
pub use machine::{FollowUp, PhoneState, Transition};
pub use value_object::{CallState, OperatorStatus};

//! Task board core: snapshot reconciliation, role-based permissions,
//! selection for bulk deletion, due-date/stall flags and the write
//! operations behind the board view.

pub mod error;
pub mod ops;
pub mod permissions;
pub mod schedule;
pub mod selection;
pub mod state;
pub mod user;
pub mod watch;

pub use error::BoardError;
pub use ops::{MoveRequest, TaskDraft, TaskOps};
pub use schedule::CardFlags;
pub use selection::Selection;
pub use state::{BoardState, Column, ColumnId};
pub use user::{Role, RosterUser, UserContext};
pub use watch::{BoardPhase, BoardWatcher};

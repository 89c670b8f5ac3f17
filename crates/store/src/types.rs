use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Column bucket a task lives in.
///
/// The wire format is an open string, so the catch-all keeps documents with
/// an unknown status readable: such a task stays addressable by id but joins
/// no column.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    #[serde(other)]
    Unrecognized,
}

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// School roles, closed so a typo can never silently grant or deny a
/// capability. Wire strings match the stored profile documents.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Coordenador,
    Diretor,
    Professor,
    ProfessorApoio,
    AuxiliarCoordenacao,
    /// Guardians can see the board but never write to it.
    Responsavel,
}

/// Caller-supplied identity. Without one the board renders an
/// unauthenticated placeholder and performs no store calls at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

/// One entry of the assignable-user universe the caller provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterUser {
    pub id: Uuid,
    pub name: String,
}

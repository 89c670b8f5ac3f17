//! Pure capability checks over the closed role set. No I/O, no state.

use store::TaskDocument;
use uuid::Uuid;

use crate::user::{Role, RosterUser, UserContext};

/// Who may create tasks.
pub fn can_add(role: Role) -> bool {
    match role {
        Role::Coordenador
        | Role::Diretor
        | Role::Professor
        | Role::ProfessorApoio
        | Role::AuxiliarCoordenacao => true,
        Role::Responsavel => false,
    }
}

/// Who may edit or delete any task, select all and bulk-delete.
pub fn can_manage(role: Role) -> bool {
    matches!(role, Role::Coordenador | Role::Diretor)
}

/// Managers drag anything; everyone else only their own cards.
pub fn can_drag(role: Role, task: &TaskDocument, user_id: Uuid) -> bool {
    can_manage(role) || task.assignee_id == user_id
}

/// Privileged roles may assign to anyone on the roster; everyone else only
/// to themselves.
pub fn assignable_users(ctx: &UserContext, roster: &[RosterUser]) -> Vec<RosterUser> {
    if can_manage(ctx.role) {
        roster.to_vec()
    } else {
        vec![RosterUser {
            id: ctx.id,
            name: ctx.name.clone(),
        }]
    }
}

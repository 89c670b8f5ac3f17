use board::permissions::{assignable_users, can_add, can_drag, can_manage};
use board::{Role, RosterUser};
use store::TaskStatus;
use test_support::{task_doc, user};
use uuid::Uuid;

#[test]
fn all_staff_roles_can_add_but_guardians_cannot() {
    for role in [
        Role::Coordenador,
        Role::Diretor,
        Role::Professor,
        Role::ProfessorApoio,
        Role::AuxiliarCoordenacao,
    ] {
        assert!(can_add(role), "{role} should be able to add tasks");
    }
    assert!(!can_add(Role::Responsavel));
}

#[test]
fn only_coordination_and_direction_manage() {
    assert!(can_manage(Role::Coordenador));
    assert!(can_manage(Role::Diretor));
    assert!(!can_manage(Role::Professor));
    assert!(!can_manage(Role::ProfessorApoio));
    assert!(!can_manage(Role::AuxiliarCoordenacao));
    assert!(!can_manage(Role::Responsavel));
}

#[test]
fn can_drag_iff_manager_or_assignee() {
    let task = task_doc("t", TaskStatus::Todo);
    let other = Uuid::new_v4();

    for role in [
        Role::Coordenador,
        Role::Diretor,
        Role::Professor,
        Role::ProfessorApoio,
        Role::AuxiliarCoordenacao,
        Role::Responsavel,
    ] {
        assert_eq!(can_drag(role, &task, other), can_manage(role));
        // The assignee can always drag their own card.
        assert!(can_drag(role, &task, task.assignee_id));
    }
}

#[test]
fn privileged_roles_assign_anyone_others_only_themselves() {
    let roster = vec![
        RosterUser {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
        },
        RosterUser {
            id: Uuid::new_v4(),
            name: "Bruno".to_string(),
        },
    ];

    let coordinator = user(Role::Coordenador);
    assert_eq!(assignable_users(&coordinator, &roster), roster);

    let teacher = user(Role::Professor);
    let allowed = assignable_users(&teacher, &roster);
    assert_eq!(allowed.len(), 1);
    assert_eq!(allowed[0].id, teacher.id);
    assert_eq!(allowed[0].name, teacher.name);
}

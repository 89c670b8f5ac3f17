//! Selection of done-column cards queued for bulk deletion. A plain value
//! object owned by the board session; volatile, cleared after a successful
//! bulk delete or a board reload.

use std::collections::HashSet;

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<Uuid>,
}

impl Selection {
    pub fn toggle(&mut self, id: Uuid) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Column-header checkbox semantics: when every given id is already
    /// selected, clear everything; otherwise the selection becomes exactly
    /// the given ids (a replacement, not a union).
    pub fn select_all(&mut self, ids: &[Uuid]) {
        let all_selected = !ids.is_empty() && ids.iter().all(|id| self.ids.contains(id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = ids.iter().copied().collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.ids.iter().copied().collect()
    }
}

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationId, AnnotationKind, Appearance, Geometry};
use crate::error::{DrawingError, DrawingResult};

/// Position of an annotation inside its kind's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationRef {
    pub kind: AnnotationKind,
    pub index: usize,
}

impl AnnotationRef {
    #[must_use]
    pub const fn new(kind: AnnotationKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Immutable copy of every annotation collection.
///
/// Used both as a history entry and as the host-facing persistence payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationSnapshot {
    pub collections: IndexMap<AnnotationKind, Vec<Annotation>>,
}

impl AnnotationSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn collection(&self, kind: AnnotationKind) -> &[Annotation] {
        self.collections.get(&kind).map_or(&[], Vec::as_slice)
    }
}

/// Per-kind ordered annotation collections.
///
/// Insertion order inside a collection is z-order; ids grow monotonically so
/// they order annotations across kinds by creation time.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    collections: IndexMap<AnnotationKind, Vec<Annotation>>,
    next_id: u64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: empty_collections(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn collection(&self, kind: AnnotationKind) -> &[Annotation] {
        self.collections.get(&kind).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates all annotations kind by kind, each collection in z-order.
    pub fn iter(&self) -> impl Iterator<Item = (AnnotationRef, &Annotation)> {
        self.collections.iter().flat_map(|(kind, items)| {
            items
                .iter()
                .enumerate()
                .map(move |(index, annotation)| (AnnotationRef::new(*kind, index), annotation))
        })
    }

    #[must_use]
    pub fn get(&self, reference: AnnotationRef) -> Option<&Annotation> {
        self.collections.get(&reference.kind)?.get(reference.index)
    }

    #[must_use]
    pub fn find(&self, id: AnnotationId) -> Option<AnnotationRef> {
        self.iter()
            .find(|(_, annotation)| annotation.id == id)
            .map(|(reference, _)| reference)
    }

    #[must_use]
    pub fn get_by_id(&self, id: AnnotationId) -> Option<&Annotation> {
        self.find(id).and_then(|reference| self.get(reference))
    }

    /// Appends a new annotation on top of its kind's collection.
    pub fn insert(&mut self, geometry: Geometry, appearance: Appearance) -> DrawingResult<AnnotationRef> {
        geometry.validate()?;
        let appearance = appearance.validate()?;
        let kind = geometry.kind();
        let id = AnnotationId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| DrawingError::InvalidData("annotation ids exhausted".to_owned()))?;

        let collection = self.collections.entry(kind).or_default();
        collection.push(Annotation::new(id, geometry, appearance));
        Ok(AnnotationRef::new(kind, collection.len() - 1))
    }

    /// Replaces the geometry of `id`. The kind is fixed at creation, so a
    /// geometry of another kind is rejected.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn replace_geometry(&mut self, id: AnnotationId, geometry: Geometry) -> DrawingResult<bool> {
        geometry.validate()?;
        let Some(annotation) = self.annotation_mut(id) else {
            return Ok(false);
        };
        if annotation.kind() != geometry.kind() {
            return Err(DrawingError::InvalidData(format!(
                "cannot replace {} geometry of {id} with {} geometry",
                annotation.kind(),
                geometry.kind()
            )));
        }
        annotation.geometry = geometry;
        Ok(true)
    }

    /// Returns `false` when `id` is unknown.
    pub fn replace_appearance(&mut self, id: AnnotationId, appearance: Appearance) -> DrawingResult<bool> {
        let appearance = appearance.validate()?;
        let Some(annotation) = self.annotation_mut(id) else {
            return Ok(false);
        };
        annotation.appearance = appearance;
        Ok(true)
    }

    fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.collections
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|annotation| annotation.id == id)
    }

    /// Currently selected annotations as `(kind, index)` pairs.
    #[must_use]
    pub fn selection(&self) -> IndexSet<AnnotationRef> {
        self.iter()
            .filter(|(_, annotation)| annotation.selected)
            .map(|(reference, _)| reference)
            .collect()
    }

    #[must_use]
    pub fn selected_ids(&self) -> Vec<AnnotationId> {
        self.iter()
            .filter(|(_, annotation)| annotation.selected)
            .map(|(_, annotation)| annotation.id)
            .collect()
    }

    #[must_use]
    pub fn is_selected(&self, id: AnnotationId) -> bool {
        self.get_by_id(id).is_some_and(|annotation| annotation.selected)
    }

    /// Sets the selection flag of `id`. Returns `true` when it changed.
    pub fn set_selected(&mut self, id: AnnotationId, selected: bool) -> bool {
        match self.annotation_mut(id) {
            Some(annotation) if annotation.selected != selected => {
                annotation.selected = selected;
                true
            }
            _ => false,
        }
    }

    /// Selects only `id`. Returns `true` when the selection set changed.
    pub fn select_only(&mut self, id: AnnotationId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        let mut changed = false;
        for annotation in self.collections.values_mut().flat_map(|items| items.iter_mut()) {
            let selected = annotation.id == id;
            if annotation.selected != selected {
                annotation.selected = selected;
                changed = true;
            }
        }
        changed
    }

    /// Returns `true` when anything was selected before.
    pub fn clear_selection(&mut self) -> bool {
        let mut changed = false;
        for annotation in self.collections.values_mut().flat_map(|items| items.iter_mut()) {
            if annotation.selected {
                annotation.selected = false;
                changed = true;
            }
        }
        changed
    }

    /// Removes every selected annotation and returns them.
    ///
    /// Safe to call with nothing selected or with empty collections.
    pub fn remove_selected(&mut self) -> Vec<Annotation> {
        let mut removed = Vec::new();
        for items in self.collections.values_mut() {
            let mut index = 0;
            while index < items.len() {
                if items[index].selected {
                    removed.push(items.remove(index));
                } else {
                    index += 1;
                }
            }
        }
        removed
    }

    #[must_use]
    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot {
            collections: self.collections.clone(),
        }
    }

    /// Replaces every collection with `snapshot`.
    ///
    /// Ids keep growing past the largest restored id so restored and new
    /// annotations never collide.
    pub fn restore(&mut self, snapshot: AnnotationSnapshot) {
        let mut collections = empty_collections();
        for (kind, items) in snapshot.collections {
            collections.entry(kind).or_default().extend(items);
        }
        let max_id = collections
            .values()
            .flat_map(|items| items.iter())
            .map(|annotation| annotation.id.0)
            .max()
            .unwrap_or(0);
        self.collections = collections;
        self.next_id = self.next_id.max(max_id.saturating_add(1));
    }
}

fn empty_collections() -> IndexMap<AnnotationKind, Vec<Annotation>> {
    AnnotationKind::ALL
        .into_iter()
        .map(|kind| (kind, Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::AnnotationStore;
    use crate::annotation::{Annotation, AnnotationId, AnnotationKind, Appearance, Geometry};
    use crate::core::DataPoint;

    fn line(x: f64) -> Geometry {
        Geometry::Line {
            start: DataPoint::new(x, 1.0),
            end: DataPoint::new(x + 1.0, 2.0),
        }
    }

    #[test]
    fn ids_are_not_reused_after_restore() {
        let mut store = AnnotationStore::new();
        let empty = store.snapshot();
        let first = store.insert(line(0.0), Appearance::default()).expect("insert");
        let first_id = store.get(first).expect("first").id;

        store.restore(empty);
        let second = store.insert(line(5.0), Appearance::default()).expect("insert");
        assert!(store.get(second).expect("second").id > first_id);
    }

    #[test]
    fn remove_selected_keeps_unselected_order() {
        let mut store = AnnotationStore::new();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                let reference = store.insert(line(i as f64), Appearance::default()).expect("insert");
                store.get(reference).expect("annotation").id
            })
            .collect();
        store.set_selected(ids[1], true);

        let removed = store.remove_selected();
        assert_eq!(removed.len(), 1);
        let remaining: Vec<_> = store
            .collection(AnnotationKind::Line)
            .iter()
            .map(|annotation| annotation.id)
            .collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn insert_fails_once_ids_run_out() {
        let mut store = AnnotationStore::new();
        let mut snapshot = store.snapshot();
        snapshot
            .collections
            .entry(AnnotationKind::Line)
            .or_default()
            .push(Annotation::new(
                AnnotationId(u64::MAX - 1),
                line(0.0),
                Appearance::default(),
            ));
        store.restore(snapshot);

        assert!(store.insert(line(3.0), Appearance::default()).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn restore_with_largest_id_does_not_overflow() {
        let mut store = AnnotationStore::new();
        let mut snapshot = store.snapshot();
        snapshot
            .collections
            .entry(AnnotationKind::Line)
            .or_default()
            .push(Annotation::new(
                AnnotationId(u64::MAX),
                line(0.0),
                Appearance::default(),
            ));
        store.restore(snapshot);

        assert!(store.insert(line(3.0), Appearance::default()).is_err());
        assert_eq!(store.len(), 1);
    }
}

//! Checklist view model: the template joined with persisted checked state.
//!
//! [`ChecklistView::merge`] rebuilds the whole view from a row set;
//! [`ChecklistView::set_checked`] patches a single item in place. Both take
//! the template as the authority on which items exist, so rows naming
//! unknown sections or items never add anything to the view.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::template::SectionTemplate;

/// A template item augmented with its current checked state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// A template section with its items' checked states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: &'static str,
    pub title: &'static str,
    pub items: Vec<ItemView>,
}

/// The in-memory, UI-facing checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChecklistView {
    pub sections: Vec<SectionView>,
}

impl ChecklistView {
    /// Join `template` with persisted `(section_id, item_id, is_checked)` rows.
    ///
    /// Every template item appears exactly once, in template order. Items
    /// with no matching row are unchecked. If the same key appears more than
    /// once the last row wins.
    pub fn merge<'a, I>(template: &'static [SectionTemplate], rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, bool)>,
    {
        let states: HashMap<(&str, &str), bool> = rows
            .into_iter()
            .map(|(section_id, item_id, checked)| ((section_id, item_id), checked))
            .collect();

        let sections = template
            .iter()
            .map(|section| SectionView {
                id: section.id,
                title: section.title,
                items: section
                    .items
                    .iter()
                    .map(|item| ItemView {
                        id: item.id,
                        label: item.label,
                        checked: states
                            .get(&(section.id, item.id))
                            .copied()
                            .unwrap_or(false),
                    })
                    .collect(),
            })
            .collect();

        Self { sections }
    }

    /// The view with every template item unchecked.
    pub fn unchecked(template: &'static [SectionTemplate]) -> Self {
        Self::merge(template, std::iter::empty())
    }

    /// Set one item's checked state.
    ///
    /// Returns `false` (and changes nothing) when the key is not part of the
    /// view.
    pub fn set_checked(&mut self, section_id: &str, item_id: &str, checked: bool) -> bool {
        let item = self
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .and_then(|s| s.items.iter_mut().find(|i| i.id == item_id));

        match item {
            Some(item) => {
                item.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Current checked state of one item, or `None` for an unknown key.
    pub fn is_checked(&self, section_id: &str, item_id: &str) -> Option<bool> {
        self.sections
            .iter()
            .find(|s| s.id == section_id)?
            .items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.checked)
    }

    /// Number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Number of checked items across all sections.
    pub fn checked_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|i| i.checked)
            .count()
    }
}

/// Template `(section_id, item_id)` pairs that have no persisted row yet.
///
/// Returned in template order.
pub fn missing_pairs<'a, I>(
    template: &'static [SectionTemplate],
    existing: I,
) -> Vec<(&'static str, &'static str)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let existing: HashSet<(&str, &str)> = existing.into_iter().collect();

    template
        .iter()
        .flat_map(|section| section.items.iter().map(move |item| (section.id, item.id)))
        .filter(|key| !existing.contains(key))
        .collect()
}

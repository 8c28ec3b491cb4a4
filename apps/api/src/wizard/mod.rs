//! Wizard state machine. Owns the working document and the step cursor, which
//! on the Personal step also tracks the sub-field.
//!
//! Every successful mutation writes the document through to the store. Refused
//! transitions are returned as [`Refusal`] values and leave the session unchanged.

pub mod handlers;
pub mod steps;
pub mod validation;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::document::{
    Document, Education, EntryId, EntryKind, EntryPatch, PersonalData, PersonalField,
    SkillCategory, Skills, WorkExperience,
};
use crate::persistence::{DocumentStore, StoreError};

pub use steps::Step;

const LAST_PERSONAL_FIELD: usize = PersonalField::ALL.len() - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("{} must not be empty", .0.label())]
    FieldIncomplete(PersonalField),

    #[error("step '{step}' is incomplete: {}", .missing.join(", "))]
    StepIncomplete { step: Step, missing: Vec<String> },

    #[error("at least one {0} entry is required")]
    LastEntry(EntryKind),

    #[error("no {kind} entry with id {id}")]
    UnknownEntry { kind: EntryKind, id: EntryId },

    #[error("{kind} entry id {id} appears more than once")]
    DuplicateEntryId { kind: EntryKind, id: EntryId },

    #[error("the document changed while it was being improved")]
    DocumentChanged,

    #[error("skill must not be empty")]
    EmptySkill,

    #[error("skill '{0}' is already listed")]
    DuplicateSkill(String),

    #[error("skill '{0}' is not listed")]
    UnknownSkill(String),
}

/// Where the cursor sits. `field` is only set on the Personal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub step: Step,
    pub field: Option<PersonalField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Moved(Position),
    Unchanged,
}

/// Replacement payload for the subtree a step owns. Review owns the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum StepData {
    Personal(PersonalData),
    Experience(Vec<WorkExperience>),
    Education(Vec<Education>),
    Skills(Skills),
    Review(Document),
}

impl StepData {
    /// Decodes a JSON payload as the subtree owned by `step`.
    pub fn from_json(step: Step, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match step {
            Step::Personal => StepData::Personal(serde_json::from_value(value)?),
            Step::Experience => StepData::Experience(serde_json::from_value(value)?),
            Step::Education => StepData::Education(serde_json::from_value(value)?),
            Step::Skills => StepData::Skills(serde_json::from_value(value)?),
            Step::Review => StepData::Review(serde_json::from_value(value)?),
        })
    }
}

/// Serializable snapshot handed to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub step: Step,
    pub step_index: usize,
    pub step_labels: Vec<&'static str>,
    pub personal_field: Option<PersonalField>,
    pub personal_field_index: usize,
    pub personal_field_label: Option<&'static str>,
    pub progress_percent: f32,
    pub can_go_next: bool,
    pub can_go_back: bool,
    pub can_improve: bool,
    pub can_export: bool,
    pub improved: bool,
    pub document: Document,
}

/// In-flight state of the two long-running actions, supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityFlags {
    pub improving: bool,
    pub exporting: bool,
}

pub struct WizardSession {
    document: Document,
    step: Step,
    field_index: usize,
    /// Set by a successful improve batch, cleared by the next edit.
    improved: bool,
    /// Bumped on every commit; lets a detached improve detect edits made meanwhile.
    revision: u64,
    store: Arc<dyn DocumentStore>,
}

impl WizardSession {
    /// Restores the last saved document, or starts empty.
    pub fn start(store: Arc<dyn DocumentStore>) -> Self {
        let document = match store.load() {
            Ok(Some(doc)) => {
                info!("restored saved document");
                doc
            }
            Ok(None) => Document::default(),
            Err(e) => {
                warn!("could not load saved document, starting empty: {e}");
                Document::default()
            }
        };
        Self {
            document,
            step: Step::Personal,
            field_index: 0,
            improved: false,
            revision: 0,
            store,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    #[cfg(test)]
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn position(&self) -> Position {
        Position {
            step: self.step,
            field: (self.step == Step::Personal).then(|| PersonalField::ALL[self.field_index]),
        }
    }

    #[cfg(test)]
    pub fn is_improved(&self) -> bool {
        self.improved
    }

    // ────────────────────────────────────────────────────────────────────────
    // Navigation
    // ────────────────────────────────────────────────────────────────────────

    pub fn can_go_next(&self) -> bool {
        match self.step {
            Step::Review => false,
            Step::Personal if self.field_index < LAST_PERSONAL_FIELD => {
                validation::personal_field_valid(
                    &self.document.personal,
                    PersonalField::ALL[self.field_index],
                )
            }
            step => validation::step_valid(step, &self.document),
        }
    }

    pub fn can_go_back(&self) -> bool {
        !(self.step == Step::Personal && self.field_index == 0)
    }

    pub fn go_next(&mut self) -> Result<Navigation, Refusal> {
        match self.step {
            Step::Review => Ok(Navigation::Unchanged),
            Step::Personal if self.field_index < LAST_PERSONAL_FIELD => {
                let field = PersonalField::ALL[self.field_index];
                if !validation::personal_field_valid(&self.document.personal, field) {
                    return Err(Refusal::FieldIncomplete(field));
                }
                self.field_index += 1;
                Ok(Navigation::Moved(self.position()))
            }
            step => {
                let missing = validation::step_issues(step, &self.document);
                if !missing.is_empty() {
                    return Err(Refusal::StepIncomplete { step, missing });
                }
                let Some(next) = step.next() else {
                    return Ok(Navigation::Unchanged);
                };
                self.enter(next, 0);
                Ok(Navigation::Moved(self.position()))
            }
        }
    }

    pub fn go_back(&mut self) -> Navigation {
        match self.step {
            Step::Personal if self.field_index == 0 => Navigation::Unchanged,
            Step::Personal => {
                self.field_index -= 1;
                Navigation::Moved(self.position())
            }
            step => {
                let Some(prev) = step.prev() else {
                    return Navigation::Unchanged;
                };
                let field_index = if prev == Step::Personal {
                    LAST_PERSONAL_FIELD
                } else {
                    0
                };
                self.enter(prev, field_index);
                Navigation::Moved(self.position())
            }
        }
    }

    fn enter(&mut self, step: Step, field_index: usize) {
        debug!(from = %self.step, to = %step, "step change");
        self.step = step;
        self.field_index = field_index;

        let seeded = match step {
            Step::Experience if self.document.work_experience.is_empty() => {
                self.document.work_experience.push(WorkExperience::empty());
                true
            }
            Step::Education if self.document.education.is_empty() => {
                self.document.education.push(Education::empty());
                true
            }
            _ => false,
        };
        if seeded {
            self.commit();
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutations
    // ────────────────────────────────────────────────────────────────────────

    pub fn update_step_data(&mut self, data: StepData) -> Result<(), Refusal> {
        match data {
            StepData::Personal(personal) => self.document.personal = personal,
            StepData::Experience(list) => {
                check_entry_list(&list, EntryKind::Experience, |e| &e.id)?;
                self.document.work_experience = list;
            }
            StepData::Education(list) => {
                check_entry_list(&list, EntryKind::Education, |e| &e.id)?;
                self.document.education = list;
            }
            StepData::Skills(skills) => self.document.skills = skills.normalized(),
            StepData::Review(document) => {
                check_unique_ids(&document.work_experience, EntryKind::Experience, |e| &e.id)?;
                check_unique_ids(&document.education, EntryKind::Education, |e| &e.id)?;
                self.document = Document {
                    skills: document.skills.clone().normalized(),
                    ..document
                };
            }
        }
        self.commit();
        Ok(())
    }

    pub fn set_personal_field(&mut self, field: PersonalField, value: String) {
        self.document.personal.set(field, value);
        self.commit();
    }

    /// Appends an empty entry and returns its id.
    pub fn add_entry(&mut self, kind: EntryKind) -> EntryId {
        let id = match kind {
            EntryKind::Experience => {
                let entry = WorkExperience::empty();
                let id = entry.id.clone();
                self.document.work_experience.push(entry);
                id
            }
            EntryKind::Education => {
                let entry = Education::empty();
                let id = entry.id.clone();
                self.document.education.push(entry);
                id
            }
        };
        self.commit();
        id
    }

    pub fn update_entry(
        &mut self,
        kind: EntryKind,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<(), Refusal> {
        let found = match kind {
            EntryKind::Experience => self
                .document
                .work_experience
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch.apply_to_experience(e)),
            EntryKind::Education => self
                .document
                .education
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| patch.apply_to_education(e)),
        };
        if found.is_none() {
            return Err(Refusal::UnknownEntry { kind, id });
        }
        self.commit();
        Ok(())
    }

    pub fn remove_entry(&mut self, kind: EntryKind, id: EntryId) -> Result<(), Refusal> {
        match kind {
            EntryKind::Experience => {
                remove_by_id(&mut self.document.work_experience, kind, id, |e| &e.id)?
            }
            EntryKind::Education => {
                remove_by_id(&mut self.document.education, kind, id, |e| &e.id)?
            }
        }
        self.commit();
        Ok(())
    }

    pub fn add_skill(&mut self, category: SkillCategory, text: &str) -> Result<(), Refusal> {
        let skill = text.trim();
        if skill.is_empty() {
            return Err(Refusal::EmptySkill);
        }
        let list = self.document.skills.list_mut(category);
        if list.iter().any(|s| s == skill) {
            return Err(Refusal::DuplicateSkill(skill.to_string()));
        }
        list.push(skill.to_string());
        self.commit();
        Ok(())
    }

    /// Removes the first exact match.
    pub fn remove_skill(&mut self, category: SkillCategory, text: &str) -> Result<(), Refusal> {
        let list = self.document.skills.list_mut(category);
        let Some(pos) = list.iter().position(|s| s == text) else {
            return Err(Refusal::UnknownSkill(text.to_string()));
        };
        list.remove(pos);
        self.commit();
        Ok(())
    }

    /// Swaps in the result of an improve batch computed from the document at
    /// `based_on`. Refused when anything was committed since. The cursor does not move.
    pub fn apply_improved(&mut self, document: Document, based_on: u64) -> Result<(), Refusal> {
        if self.revision != based_on {
            warn!(
                based_on,
                current = self.revision,
                "discarding improve result computed from a stale document"
            );
            return Err(Refusal::DocumentChanged);
        }
        self.document = document;
        self.commit();
        self.improved = true;
        Ok(())
    }

    /// Clears the stored slot and starts over at the first Personal sub-field.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.document = Document::default();
        self.step = Step::Personal;
        self.field_index = 0;
        self.improved = false;
        self.revision += 1;
        info!("session reset");
        Ok(())
    }

    fn commit(&mut self) {
        self.improved = false;
        self.revision += 1;
        if let Err(e) = self.store.save(&self.document) {
            warn!("failed to save document: {e}");
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // View
    // ────────────────────────────────────────────────────────────────────────

    pub fn view(&self, activity: ActivityFlags) -> SessionView {
        let step_index = self.step.index();
        let position = self.position();
        SessionView {
            step: self.step,
            step_index,
            step_labels: Step::labels(),
            personal_field: position.field,
            personal_field_index: self.field_index,
            personal_field_label: position.field.map(|f| f.label()),
            progress_percent: progress_percent(step_index, Step::ALL.len()),
            can_go_next: self.can_go_next(),
            can_go_back: self.can_go_back(),
            can_improve: !activity.improving && !self.improved,
            can_export: !activity.exporting,
            improved: self.improved,
            document: self.document.clone(),
        }
    }
}

fn remove_by_id<T>(
    list: &mut Vec<T>,
    kind: EntryKind,
    id: EntryId,
    id_of: impl Fn(&T) -> &EntryId,
) -> Result<(), Refusal> {
    let Some(pos) = list.iter().position(|e| *id_of(e) == id) else {
        return Err(Refusal::UnknownEntry { kind, id });
    };
    if list.len() <= 1 {
        return Err(Refusal::LastEntry(kind));
    }
    list.remove(pos);
    Ok(())
}

/// A replacement entry list must keep at least one entry and unique ids.
fn check_entry_list<T>(
    list: &[T],
    kind: EntryKind,
    id_of: impl Fn(&T) -> &EntryId,
) -> Result<(), Refusal> {
    if list.is_empty() {
        return Err(Refusal::LastEntry(kind));
    }
    check_unique_ids(list, kind, id_of)
}

fn check_unique_ids<T>(
    list: &[T],
    kind: EntryKind,
    id_of: impl Fn(&T) -> &EntryId,
) -> Result<(), Refusal> {
    let mut seen = HashSet::with_capacity(list.len());
    for entry in list {
        let id = id_of(entry);
        if !seen.insert(id) {
            return Err(Refusal::DuplicateEntryId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

pub fn progress_percent(step_index: usize, step_count: usize) -> f32 {
    if step_count <= 1 {
        return 100.0;
    }
    step_index as f32 / (step_count - 1) as f32 * 100.0
}

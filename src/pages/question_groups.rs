//! Question groups and the questions nested under each group.
//!
//! Groups and questions are appended or removed locally on success; neither
//! list is refetched. The question slices belong to this controller, so they
//! go away with it.

use serde_json::{Value, json};
use wire::{Attachment, FormPayload, Question, QuestionGroup, RecordId};

use crate::net::ClientError;
use crate::state::nested::ScopedSlices;
use crate::state::slice::{ListQuery, ResourceSlice};

pub const DEFAULT_QUESTION_TYPE: &str = "multiple_choice";

/// One answer option as typed into the question form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerForm {
    pub description_en: String,
    pub description_ar: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionForm {
    pub kind: String,
    pub description_en: String,
    pub description_ar: String,
    pub answers: Vec<AnswerForm>,
    pub image: Option<Attachment>,
}

impl Default for QuestionForm {
    /// A blank multiple-choice question with two empty answers.
    fn default() -> Self {
        Self {
            kind: DEFAULT_QUESTION_TYPE.to_owned(),
            description_en: String::new(),
            description_ar: String::new(),
            answers: vec![AnswerForm::default(), AnswerForm::default()],
            image: None,
        }
    }
}

impl QuestionForm {
    /// Multipart body: `type`, `description[ar|en]`,
    /// `answers[i][description][en|ar]`, and the optional image.
    #[must_use]
    pub fn into_payload(self) -> FormPayload {
        let answers: Vec<Value> = self
            .answers
            .iter()
            .map(|answer| json!({ "description": { "en": answer.description_en, "ar": answer.description_ar } }))
            .collect();
        let payload = FormPayload::new()
            .field("type", self.kind)
            .field("description", json!({ "ar": self.description_ar, "en": self.description_en }))
            .field("answers", answers)
            .multipart();
        match self.image {
            Some(image) => payload.file("image", image),
            None => payload,
        }
    }
}

/// Multipart body for a new group.
#[must_use]
pub fn group_form(title_en: &str, title_ar: &str) -> FormPayload {
    FormPayload::new()
        .field("title_ar", title_ar)
        .field("title_en", title_en)
        .multipart()
}

pub struct QuestionGroupsPage {
    groups: ResourceSlice<QuestionGroup>,
    questions: ScopedSlices<Question>,
    open: Option<RecordId>,
}

impl QuestionGroupsPage {
    #[must_use]
    pub fn new(groups: ResourceSlice<QuestionGroup>, questions: ScopedSlices<Question>) -> Self {
        Self { groups, questions, open: None }
    }

    #[must_use]
    pub fn groups(&self) -> &ResourceSlice<QuestionGroup> {
        &self.groups
    }

    /// Question slice of `group`, if it was ever opened.
    #[must_use]
    pub fn questions(&self, group: RecordId) -> Option<&ResourceSlice<Question>> {
        self.questions.get(group)
    }

    #[must_use]
    pub fn open_group_id(&self) -> Option<RecordId> {
        self.open
    }

    /// # Errors
    ///
    /// The list failure, also recorded in the groups list slot.
    pub async fn mount(&self) -> Result<Vec<QuestionGroup>, ClientError> {
        self.groups.list(ListQuery::default()).await
    }

    /// Groups whose title in `lang` contains `term`, case-insensitively.
    #[must_use]
    pub fn filter(&self, term: &str, lang: &str) -> Vec<QuestionGroup> {
        let needle = term.trim().to_lowercase();
        self.groups
            .items()
            .into_iter()
            .filter(|group| needle.is_empty() || group.display_title(lang).to_lowercase().contains(&needle))
            .collect()
    }

    /// # Errors
    ///
    /// The create failure, also recorded in the groups create slot.
    pub async fn create_group(&self, payload: FormPayload) -> Result<QuestionGroup, ClientError> {
        self.groups.create(payload).await
    }

    /// Delete a group and forget its questions.
    ///
    /// # Errors
    ///
    /// The delete failure, also recorded in the groups delete slot.
    pub async fn delete_group(&mut self, group: RecordId) -> Result<(), ClientError> {
        self.groups.delete(group).await?;
        self.questions.drop_scope(group);
        if self.open == Some(group) {
            self.open = None;
        }
        Ok(())
    }

    /// Switch to the questions of `group` and fetch them.
    ///
    /// # Errors
    ///
    /// The list failure, also recorded in that group's list slot.
    pub async fn open_group(&mut self, group: RecordId) -> Result<Vec<Question>, ClientError> {
        self.open = Some(group);
        self.questions.scope(group).list(ListQuery::default()).await
    }

    pub fn close_group(&mut self) {
        self.open = None;
    }

    /// # Errors
    ///
    /// The create failure, also recorded in that group's create slot.
    pub async fn create_question(&mut self, group: RecordId, form: QuestionForm) -> Result<Question, ClientError> {
        self.questions.scope(group).create(form.into_payload()).await
    }

    /// # Errors
    ///
    /// The delete failure, also recorded in that group's delete slot.
    pub async fn delete_question(&mut self, group: RecordId, question: RecordId) -> Result<(), ClientError> {
        self.questions.scope(group).delete(question).await
    }

    pub fn unmount(&self) {
        self.groups.clear_all_errors();
        self.questions.clear_all_errors();
    }
}

#[cfg(test)]
#[path = "question_groups_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use super::Resource;
use crate::error::StoreError;

/// A task owned by a project through `user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Resource for Task {
    const COLLECTION: &'static str = "tasks_data";
    const ENDPOINT: &'static str = "todos";
    const PARENT_PARAM: Option<&'static str> = Some("userId");

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn parent_id(&self) -> Option<u64> {
        Some(self.user_id)
    }
}

impl Task {
    /// Merges the fields present in `patch`; absent fields keep their values.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    /// Status label shown in task listings.
    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "done"
        } else {
            "in progress"
        }
    }
}

/// Task form input. The owning project must be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(user_id: u64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// The title is required.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Invalid("task title is required".into()));
        }
        Ok(())
    }

    pub(crate) fn into_task(self) -> Task {
        Task {
            user_id: self.user_id,
            id: 0,
            title: self.title,
            completed: self.completed,
        }
    }
}

/// Partial task update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.title.is_none() && self.completed.is_none()
    }

    /// A present title must not be blank.
    pub fn validate(&self) -> Result<(), StoreError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(StoreError::Invalid("task title is required".into()))
            }
            _ => Ok(()),
        }
    }
}

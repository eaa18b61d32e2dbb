use serde::{Deserialize, Serialize};

use super::Resource;
use crate::error::StoreError;

const NEW_PROJECT_EMAIL: &str = "new@project.com";

/// A project, shaped like the seed API's user record.
///
/// `company.catch_phrase` is the project's user-facing description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

impl Resource for Project {
    const COLLECTION: &'static str = "projects_data";
    const ENDPOINT: &'static str = "users";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Project {
    /// Builds a new project from form input. The id is assigned by the store.
    pub fn from_draft(draft: &ProjectDraft) -> Self {
        Project {
            id: 0,
            name: draft.name.clone(),
            username: username_for(&draft.name),
            email: NEW_PROJECT_EMAIL.to_string(),
            address: Address::default(),
            phone: String::new(),
            website: String::new(),
            company: Company {
                name: draft.name.clone(),
                catch_phrase: draft.description.clone(),
                bs: String::new(),
            },
        }
    }

    /// The user-facing description.
    pub fn description(&self) -> &str {
        &self.company.catch_phrase
    }

    /// Applies form input onto an existing project, keeping every other field.
    pub fn apply_draft(&mut self, draft: &ProjectDraft) {
        self.name = draft.name.clone();
        self.company.catch_phrase = draft.description.clone();
    }

    /// Case-insensitive match over name, client (company) name and description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.company.name.as_str(),
            self.company.catch_phrase.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Project form input: a name and a description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The name is required.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Invalid("project name is required".into()));
        }
        Ok(())
    }
}

/// Returns the projects matching `term` (see [`Project::matches`]).
pub fn filter_projects<'a>(projects: &'a [Project], term: &str) -> Vec<&'a Project> {
    projects.iter().filter(|p| p.matches(term)).collect()
}

fn username_for(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

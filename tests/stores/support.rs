//! Test doubles: a scripted remote source and store builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use taskdeck::{
    InMemoryKeyValueStore, KeyValueStore, Project, ProjectStore, RemoteError, RemoteSource,
    Resource, Task, TaskStore,
};

/// Remote source answering from canned data and counting calls.
pub struct ScriptedRemote<M> {
    lists: Mutex<HashMap<Option<u64>, Vec<M>>>,
    singles: Mutex<HashMap<u64, M>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    offline: AtomicBool,
}

impl<M: Resource> ScriptedRemote<M> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lists: Mutex::new(HashMap::new()),
            singles: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        })
    }

    /// Answer `list(parent)` with `items`.
    pub fn serve_list(&self, parent: Option<u64>, items: Vec<M>) {
        self.lists.lock().unwrap().insert(parent, items);
    }

    /// Answer `get(id)` with `item`.
    pub fn serve_one(&self, item: M) {
        self.singles.lock().unwrap().insert(item.id(), item);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport {
                url: format!("scripted://{}", M::ENDPOINT),
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<M: Resource> RemoteSource<M> for ScriptedRemote<M> {
    async fn list(&self, parent: Option<u64>) -> Result<Vec<M>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(&parent)
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, id: u64) -> Result<Option<M>, RemoteError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.singles.lock().unwrap().get(&id).cloned())
    }
}

pub struct ProjectFixture {
    pub backend: Arc<InMemoryKeyValueStore>,
    pub remote: Arc<ScriptedRemote<Project>>,
    pub store: ProjectStore,
}

pub fn project_fixture() -> ProjectFixture {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let remote = ScriptedRemote::<Project>::new();
    let store = ProjectStore::new(
        backend.clone() as Arc<dyn KeyValueStore>,
        remote.clone() as Arc<dyn RemoteSource<Project>>,
    );
    ProjectFixture {
        backend,
        remote,
        store,
    }
}

pub struct TaskFixture {
    pub backend: Arc<InMemoryKeyValueStore>,
    pub remote: Arc<ScriptedRemote<Task>>,
    pub store: TaskStore,
}

pub fn task_fixture() -> TaskFixture {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let remote = ScriptedRemote::<Task>::new();
    let store = TaskStore::new(
        backend.clone() as Arc<dyn KeyValueStore>,
        remote.clone() as Arc<dyn RemoteSource<Task>>,
    );
    TaskFixture {
        backend,
        remote,
        store,
    }
}

/// Seed record shaped like `GET /users` output.
pub fn seed_project(id: u64, name: &str, catch_phrase: &str) -> Project {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "username": "Antonette",
        "email": "Shanna@melissa.tv",
        "address": {
            "street": "Victor Plains",
            "suite": "Suite 879",
            "city": "Wisokyburgh",
            "zipcode": "90566-7771",
            "geo": { "lat": "-43.9509", "lng": "-34.4618" }
        },
        "phone": "010-692-6593 x09125",
        "website": "anastasia.net",
        "company": { "name": "X", "catchPhrase": catch_phrase, "bs": "Y" }
    }))
    .unwrap()
}

pub fn task(id: u64, user_id: u64, title: &str, completed: bool) -> Task {
    Task {
        user_id,
        id,
        title: title.to_string(),
        completed,
    }
}

/// Collects every value a subscriber receives.
pub fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
}

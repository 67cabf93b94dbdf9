//! Storage seam for the executor layer.
//!
//! Executors talk to a `Backend` trait rather than a concrete store, so the
//! gateway is testable without a database and the real deployment can plug
//! in its relational store behind the same surface. `MemoryBackend` is the
//! in-process implementation used by tests and local development.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ===== Records =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub type_key: Option<String>,
    pub state_key: String,
    pub priority: Option<i64>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub type_key: Option<String>,
    pub state_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub parent_id: Option<String>,
    pub position: i64,
    pub title: String,
    pub body_markdown: Option<String>,
    pub type_key: Option<String>,
    pub state_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentTreeNode {
    pub id: String,
    pub title: String,
    pub position: i64,
    pub children: Vec<DocumentTreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub entity_type: String,
    pub title: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

// ===== Request shapes =====

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub state_key: Option<String>,
    #[serde(default)]
    pub include_done: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub type_key: Option<String>,
    pub state_key: Option<String>,
    pub priority: Option<i64>,
    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state_key: Option<String>,
    pub priority: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub state_key: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub type_key: Option<String>,
    pub state_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub state_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    pub project_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub project_id: String,
    pub body_markdown: Option<String>,
    pub parent_id: Option<String>,
    pub type_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub body_markdown: Option<String>,
    pub state_key: Option<String>,
}

/// Where to re-parent a moved document. `Keep` leaves the parent alone;
/// `Root` detaches the document to the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    Keep,
    Root,
    Parent(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub calendar_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ===== Trait =====

/// Everything the executors need from the surrounding system. One method
/// per catalog operation; implementations own persistence, the gateway
/// owns naming and help.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>>;
    async fn search_tasks(
        &self,
        query: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Task>>;
    async fn get_task(&self, task_id: &str) -> Result<Option<Task>>;
    async fn create_task(&self, new: NewTask) -> Result<Task>;
    async fn update_task(&self, task_id: &str, changes: TaskChanges) -> Result<Option<Task>>;
    async fn delete_task(&self, task_id: &str) -> Result<bool>;

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>>;
    async fn get_project(&self, project_id: &str) -> Result<Option<Project>>;
    async fn create_project(&self, new: NewProject) -> Result<Project>;
    async fn update_project(
        &self,
        project_id: &str,
        changes: ProjectChanges,
    ) -> Result<Option<Project>>;
    async fn delete_project(&self, project_id: &str) -> Result<bool>;

    async fn list_documents(&self, filter: DocumentFilter) -> Result<Vec<Document>>;
    async fn get_document(&self, document_id: &str) -> Result<Option<Document>>;
    async fn create_document(&self, new: NewDocument) -> Result<Document>;
    async fn update_document(
        &self,
        document_id: &str,
        changes: DocumentChanges,
    ) -> Result<Option<Document>>;
    async fn delete_document(&self, document_id: &str) -> Result<bool>;
    async fn document_tree(
        &self,
        project_id: &str,
        max_depth: usize,
    ) -> Result<Vec<DocumentTreeNode>>;
    async fn move_document(
        &self,
        document_id: &str,
        new_position: i64,
        target: MoveTarget,
    ) -> Result<Option<Document>>;

    async fn search_ontology(
        &self,
        query: &str,
        entity_types: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<SearchHit>>;
    async fn link_entities(&self, source_id: &str, target_id: &str, relation: &str)
        -> Result<Edge>;
    async fn unlink_entities(&self, edge_id: &str) -> Result<bool>;

    async fn list_calendar_events(&self, filter: EventFilter) -> Result<Vec<CalendarEvent>>;

    async fn web_search(
        &self,
        query: &str,
        max_results: usize,
        recency: Option<&str>,
    ) -> Result<Vec<WebSearchHit>>;
}

// ===== In-memory implementation =====

#[derive(Default)]
struct MemoryState {
    tasks: HashMap<String, Task>,
    projects: HashMap<String, Project>,
    documents: HashMap<String, Document>,
    edges: HashMap<String, Edge>,
    events: Vec<CalendarEvent>,
}

/// In-process backend for tests and local development. Search is plain
/// substring matching; ordering mirrors the store contract (newest first
/// for lists, position order for trees).
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a calendar event; tests need fixtures the tool surface cannot
    /// create (there is no create_calendar_event tool).
    pub fn seed_event(&self, event: CalendarEvent) {
        self.state.write().events.push(event);
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn page<T>(mut items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Vec<T> {
    let offset = offset.unwrap_or(0);
    if offset >= items.len() {
        return Vec::new();
    }
    items.drain(..offset);
    items.truncate(limit.unwrap_or(20));
    items
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let state = self.state.read();
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| match &filter.project_id {
                Some(p) => t.project_id.as_deref() == Some(p.as_str()),
                None => true,
            })
            .filter(|t| match &filter.state_key {
                Some(s) => &t.state_key == s,
                None => true,
            })
            .filter(|t| filter.include_done || t.state_key != "done")
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(tasks, filter.limit, filter.offset))
    }

    async fn search_tasks(
        &self,
        query: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Task>> {
        let state = self.state.read();
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| match project_id {
                Some(p) => t.project_id.as_deref() == Some(p),
                None => true,
            })
            .filter(|t| {
                contains_ci(&t.title, query)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, query))
            })
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(self.state.read().tasks.get(task_id).cloned())
    }

    async fn create_task(&self, new: NewTask) -> Result<Task> {
        let now = Utc::now();
        let task = Task {
            id: new_id(),
            project_id: new.project_id,
            title: new.title,
            description: new.description,
            type_key: new.type_key,
            state_key: new.state_key.unwrap_or_else(|| "open".to_string()),
            priority: new.priority,
            due_at: new.due_at,
            created_at: now,
            updated_at: now,
        };
        self.state.write().tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_id: &str, changes: TaskChanges) -> Result<Option<Task>> {
        let mut state = self.state.write();
        let Some(task) = state.tasks.get_mut(task_id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        if let Some(state_key) = changes.state_key {
            task.state_key = state_key;
        }
        if let Some(priority) = changes.priority {
            task.priority = Some(priority);
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, task_id: &str) -> Result<bool> {
        Ok(self.state.write().tasks.remove(task_id).is_some())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        let state = self.state.read();
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| match &filter.state_key {
                Some(s) => &p.state_key == s,
                None => true,
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(projects, filter.limit, filter.offset))
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        Ok(self.state.read().projects.get(project_id).cloned())
    }

    async fn create_project(&self, new: NewProject) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: new_id(),
            name: new.name,
            description: new.description,
            type_key: new.type_key,
            state_key: new.state_key.unwrap_or_else(|| "active".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: &str,
        changes: ProjectChanges,
    ) -> Result<Option<Project>> {
        let mut state = self.state.write();
        let Some(project) = state.projects.get_mut(project_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = Some(description);
        }
        if let Some(state_key) = changes.state_key {
            project.state_key = state_key;
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, project_id: &str) -> Result<bool> {
        Ok(self.state.write().projects.remove(project_id).is_some())
    }

    async fn list_documents(&self, filter: DocumentFilter) -> Result<Vec<Document>> {
        let state = self.state.read();
        let mut documents: Vec<Document> = state
            .documents
            .values()
            .filter(|d| match &filter.project_id {
                Some(p) => &d.project_id == p,
                None => true,
            })
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.position.cmp(&b.position).then(a.id.cmp(&b.id)));
        Ok(page(documents, filter.limit, filter.offset))
    }

    async fn get_document(&self, document_id: &str) -> Result<Option<Document>> {
        Ok(self.state.read().documents.get(document_id).cloned())
    }

    async fn create_document(&self, new: NewDocument) -> Result<Document> {
        let now = Utc::now();
        let mut state = self.state.write();
        let position = state
            .documents
            .values()
            .filter(|d| d.project_id == new.project_id && d.parent_id == new.parent_id)
            .count() as i64;
        let document = Document {
            id: new_id(),
            project_id: new.project_id,
            parent_id: new.parent_id,
            position,
            title: new.title,
            body_markdown: new.body_markdown,
            type_key: new.type_key,
            state_key: "draft".to_string(),
            created_at: now,
            updated_at: now,
        };
        state.documents.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        document_id: &str,
        changes: DocumentChanges,
    ) -> Result<Option<Document>> {
        let mut state = self.state.write();
        let Some(document) = state.documents.get_mut(document_id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            document.title = title;
        }
        if let Some(body) = changes.body_markdown {
            document.body_markdown = Some(body);
        }
        if let Some(state_key) = changes.state_key {
            document.state_key = state_key;
        }
        document.updated_at = Utc::now();
        Ok(Some(document.clone()))
    }

    async fn delete_document(&self, document_id: &str) -> Result<bool> {
        let mut state = self.state.write();
        let Some(removed) = state.documents.remove(document_id) else {
            return Ok(false);
        };
        // Children are re-parented, not deleted.
        for doc in state.documents.values_mut() {
            if doc.parent_id.as_deref() == Some(document_id) {
                doc.parent_id = removed.parent_id.clone();
            }
        }
        Ok(true)
    }

    async fn document_tree(
        &self,
        project_id: &str,
        max_depth: usize,
    ) -> Result<Vec<DocumentTreeNode>> {
        let state = self.state.read();
        let docs: Vec<&Document> = state
            .documents
            .values()
            .filter(|d| d.project_id == project_id)
            .collect();

        fn children_of(
            docs: &[&Document],
            parent: Option<&str>,
            depth: usize,
            max_depth: usize,
        ) -> Vec<DocumentTreeNode> {
            if depth >= max_depth {
                return Vec::new();
            }
            let mut level: Vec<&&Document> = docs
                .iter()
                .filter(|d| d.parent_id.as_deref() == parent)
                .collect();
            level.sort_by(|a, b| a.position.cmp(&b.position).then(a.id.cmp(&b.id)));
            level
                .into_iter()
                .map(|d| DocumentTreeNode {
                    id: d.id.clone(),
                    title: d.title.clone(),
                    position: d.position,
                    children: children_of(docs, Some(&d.id), depth + 1, max_depth),
                })
                .collect()
        }

        Ok(children_of(&docs, None, 0, max_depth))
    }

    async fn move_document(
        &self,
        document_id: &str,
        new_position: i64,
        target: MoveTarget,
    ) -> Result<Option<Document>> {
        let mut state = self.state.write();
        if let MoveTarget::Parent(parent_id) = &target {
            if !state.documents.contains_key(parent_id) {
                return Err(anyhow!("new parent document not found: {parent_id}"));
            }
        }
        let Some(document) = state.documents.get_mut(document_id) else {
            return Ok(None);
        };
        document.position = new_position;
        match target {
            MoveTarget::Keep => {}
            MoveTarget::Root => document.parent_id = None,
            MoveTarget::Parent(parent_id) => document.parent_id = Some(parent_id),
        }
        document.updated_at = Utc::now();
        Ok(Some(document.clone()))
    }

    async fn search_ontology(
        &self,
        query: &str,
        entity_types: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let wants = |kind: &str| {
            entity_types
                .map(|ts| ts.iter().any(|t| t == kind))
                .unwrap_or(true)
        };
        let state = self.state.read();
        let mut hits = Vec::new();
        if wants("task") {
            for task in state.tasks.values() {
                if contains_ci(&task.title, query) {
                    hits.push(SearchHit {
                        id: task.id.clone(),
                        entity_type: "task".to_string(),
                        title: task.title.clone(),
                        snippet: task.description.clone(),
                    });
                }
            }
        }
        if wants("project") {
            for project in state.projects.values() {
                if contains_ci(&project.name, query) {
                    hits.push(SearchHit {
                        id: project.id.clone(),
                        entity_type: "project".to_string(),
                        title: project.name.clone(),
                        snippet: project.description.clone(),
                    });
                }
            }
        }
        if wants("document") {
            for doc in state.documents.values() {
                if contains_ci(&doc.title, query) {
                    hits.push(SearchHit {
                        id: doc.id.clone(),
                        entity_type: "document".to_string(),
                        title: doc.title.clone(),
                        snippet: None,
                    });
                }
            }
        }
        hits.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn link_entities(
        &self,
        source_id: &str,
        target_id: &str,
        relation: &str,
    ) -> Result<Edge> {
        let edge = Edge {
            id: new_id(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            relation: relation.to_string(),
        };
        self.state.write().edges.insert(edge.id.clone(), edge.clone());
        Ok(edge)
    }

    async fn unlink_entities(&self, edge_id: &str) -> Result<bool> {
        Ok(self.state.write().edges.remove(edge_id).is_some())
    }

    async fn list_calendar_events(&self, filter: EventFilter) -> Result<Vec<CalendarEvent>> {
        let state = self.state.read();
        let mut events: Vec<CalendarEvent> = state
            .events
            .iter()
            .filter(|e| match &filter.calendar_id {
                Some(c) => &e.calendar_id == c,
                None => true,
            })
            .filter(|e| filter.time_min.map_or(true, |min| e.ends_at >= min))
            .filter(|e| filter.time_max.map_or(true, |max| e.starts_at <= max))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        let limit = filter.limit.or(Some(50));
        Ok(page(events, limit, filter.offset))
    }

    async fn web_search(
        &self,
        _query: &str,
        _max_results: usize,
        _recency: Option<&str>,
    ) -> Result<Vec<WebSearchHit>> {
        // No network in the in-memory backend; deployments wire a real
        // search client here.
        Ok(Vec::new())
    }
}

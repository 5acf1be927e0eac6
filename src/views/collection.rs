use serde::Serialize;
use tracing::{debug, info};

use super::ViewError;
use crate::api::ServiceError;
use crate::model::{Class, Student};
use crate::sort::{sort_rows, SortState, Sortable};

/// A record type that can be listed in a collection view.
pub trait Entity: Sortable + Clone + Serialize {
    const NOUN: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> i64;

    /// Text the free-text search matches against.
    fn search_text(&self) -> String;
}

impl Entity for Student {
    const NOUN: &'static str = "student";
    const PLURAL: &'static str = "students";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> String {
        self.full_name()
    }
}

impl Entity for Class {
    const NOUN: &'static str = "class";
    const PLURAL: &'static str = "classes";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Failed(_) => "failed",
        }
    }
}

/// Handle for one fetch. Only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTicket {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePrompt {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingDelete {
    Confirming(i64),
    InFlight(i64),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", bound = "E: Entity")]
pub struct CollectionSnapshot<'a, E: Entity> {
    pub phase: &'static str,
    pub error: Option<&'a str>,
    pub retry: bool,
    pub rows: Vec<&'a E>,
    pub total: usize,
    pub search: &'a str,
    pub sort: SortState<E::Key>,
    pub pending_delete: Option<i64>,
    pub delete_error: Option<&'a str>,
    pub can_mutate: bool,
}

/// Fetch, filter, sort and delete state for one mounted table view.
pub struct CollectionView<E: Entity> {
    phase: Phase,
    rows: Vec<E>,
    search: String,
    sort: SortState<E::Key>,
    generation: u64,
    pending_delete: Option<PendingDelete>,
    delete_error: Option<String>,
}

impl<E: Entity> CollectionView<E> {
    pub fn new(default_key: E::Key) -> Self {
        Self {
            phase: Phase::Idle,
            rows: Vec::new(),
            search: String::new(),
            sort: SortState::new(default_key),
            generation: 0,
            pending_delete: None,
            delete_error: None,
        }
    }

    /// Starts (or restarts) loading. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.pending_delete = None;
        self.delete_error = None;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch result. Returns false if the ticket was superseded.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<E>, ServiceError>,
    ) -> bool {
        if ticket.generation != self.generation || self.phase != Phase::Loading {
            debug!(entity = E::PLURAL, "discarding stale fetch result");
            return false;
        }
        match result {
            Ok(rows) => {
                info!(entity = E::PLURAL, count = rows.len(), "collection loaded");
                self.rows = rows;
                self.phase = Phase::Ready;
            }
            Err(err) => {
                info!(entity = E::PLURAL, error = %err, "collection load failed");
                self.rows.clear();
                let fallback = format!("Failed to load {}", E::PLURAL);
                self.phase = Phase::Failed(err.user_message(&fallback));
            }
        }
        true
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_sort(&mut self, key: E::Key) {
        self.sort.toggle(key);
    }

    /// Rows matching the search term, ordered by the current sort. Only rows
    /// that pass the filter take part in the sort.
    pub fn visible_rows(&self) -> Vec<&E> {
        if self.phase != Phase::Ready {
            return Vec::new();
        }
        let needle = self.search.to_lowercase();
        let filtered: Vec<&E> = self
            .rows
            .iter()
            .filter(|row| row.search_text().to_lowercase().contains(&needle))
            .collect();
        sort_rows(filtered, self.sort)
    }

    pub fn can_mutate(&self) -> bool {
        self.phase == Phase::Ready
            && !matches!(self.pending_delete, Some(PendingDelete::InFlight(_)))
    }

    /// First step of a delete: nothing is sent until `confirm_delete`.
    pub fn request_delete(&mut self, id: i64) -> Result<DeletePrompt, ViewError> {
        if !self.can_mutate() {
            return Err(ViewError::NotReady);
        }
        let row = self
            .rows
            .iter()
            .find(|r| r.id() == id)
            .ok_or(ViewError::UnknownRow(id))?;
        let message = format!(
            "Delete {} {}? This cannot be undone.",
            E::NOUN,
            row.search_text()
        );
        self.pending_delete = Some(PendingDelete::Confirming(id));
        Ok(DeletePrompt { id, message })
    }

    pub fn cancel_delete(&mut self) -> Result<(), ViewError> {
        match self.pending_delete {
            Some(PendingDelete::Confirming(_)) => {
                self.pending_delete = None;
                Ok(())
            }
            _ => Err(ViewError::NoPendingDelete),
        }
    }

    pub fn confirm_delete(&mut self) -> Result<DeleteTicket, ViewError> {
        match self.pending_delete {
            Some(PendingDelete::Confirming(id)) if self.phase == Phase::Ready => {
                self.pending_delete = Some(PendingDelete::InFlight(id));
                Ok(DeleteTicket { id })
            }
            Some(PendingDelete::Confirming(_)) => Err(ViewError::NotReady),
            _ => Err(ViewError::NoPendingDelete),
        }
    }

    /// The row leaves local state only once the service has confirmed.
    pub fn complete_delete(
        &mut self,
        ticket: DeleteTicket,
        result: Result<(), ServiceError>,
    ) -> bool {
        if self.pending_delete != Some(PendingDelete::InFlight(ticket.id)) {
            debug!(entity = E::PLURAL, id = ticket.id, "discarding stale delete result");
            return false;
        }
        self.pending_delete = None;
        match result {
            Ok(()) => {
                info!(entity = E::PLURAL, id = ticket.id, "row deleted");
                self.rows.retain(|r| r.id() != ticket.id);
                self.delete_error = None;
            }
            Err(err) => {
                info!(entity = E::PLURAL, id = ticket.id, error = %err, "delete failed");
                let fallback = format!("Failed to delete {}", E::NOUN);
                self.delete_error = Some(err.user_message(&fallback));
            }
        }
        true
    }

    pub fn snapshot(&self) -> CollectionSnapshot<'_, E> {
        let error = match &self.phase {
            Phase::Failed(msg) => Some(msg.as_str()),
            _ => None,
        };
        let pending_delete = match self.pending_delete {
            Some(PendingDelete::Confirming(id)) | Some(PendingDelete::InFlight(id)) => Some(id),
            None => None,
        };
        CollectionSnapshot {
            phase: self.phase.name(),
            error,
            retry: error.is_some(),
            rows: self.visible_rows(),
            total: self.rows.len(),
            search: &self.search,
            sort: self.sort,
            pending_delete,
            delete_error: self.delete_error.as_deref(),
            can_mutate: self.can_mutate(),
        }
    }
}

pub mod collection;
pub mod login;
pub mod student_form;

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Class, Student};
use collection::CollectionView;
use login::LoginForm;
use student_form::StudentForm;

/// Screens the chrome layer can be told to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Students,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Students => "/students",
        }
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub to: Route,
    /// Replace the current history entry instead of pushing one.
    pub replace: bool,
}

impl Navigation {
    pub fn push(to: Route) -> Self {
        Self { to, replace: false }
    }

    pub fn replace(to: Route) -> Self {
        Self { to, replace: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ViewId(Uuid);

impl ViewId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Misuse of a view controller: the action is not available in its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view is not ready for that action")]
    NotReady,
    #[error("no row with id {0}")]
    UnknownRow(i64),
    #[error("no delete awaiting confirmation")]
    NoPendingDelete,
    #[error("field {0} does not belong to this form")]
    ForeignField(&'static str),
}

impl ViewError {
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::NotReady => "not_ready",
            ViewError::UnknownRow(_) => "unknown_row",
            ViewError::NoPendingDelete => "no_pending_delete",
            ViewError::ForeignField(_) => "bad_params",
        }
    }
}

pub enum MountedView {
    Login(LoginForm),
    Students(CollectionView<Student>),
    Classes(CollectionView<Class>),
    StudentForm(StudentForm),
}

impl MountedView {
    /// Protected views are torn down when the session ends.
    pub fn is_protected(&self) -> bool {
        !matches!(self, MountedView::Login(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MountedView::Login(_) => "login",
            MountedView::Students(_) => "students",
            MountedView::Classes(_) => "classes",
            MountedView::StudentForm(_) => "studentForm",
        }
    }
}

/// Owns every mounted view. A result for a view that is no longer here is
/// discarded by the caller.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<ViewId, MountedView>,
}

impl ViewRegistry {
    pub fn mount(&mut self, view: MountedView) -> ViewId {
        let id = ViewId::new();
        self.views.insert(id, view);
        id
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut MountedView> {
        self.views.get_mut(&id)
    }

    pub fn close(&mut self, id: ViewId) -> bool {
        self.views.remove(&id).is_some()
    }

    /// Drops every protected view; returns how many were closed.
    pub fn close_protected(&mut self) -> usize {
        let before = self.views.len();
        self.views.retain(|_, v| !v.is_protected());
        before - self.views.len()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }
}

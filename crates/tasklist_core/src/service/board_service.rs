//! Board use-case service.
//!
//! # Responsibility
//! - Validate user input before it reaches storage.
//! - Track the selected list and keep live queries keyed on it.
//! - Produce a render-ready `BoardView` snapshot.
//!
//! # Invariants
//! - Rejected operations never touch storage.
//! - Removing the only remaining list is refused.
//! - New tasks always attach to the selected list.
//!
//! Mutations do not pull fresh query results themselves; call `sync` (for
//! example once per UI tick) to consume pending change notifications.

use crate::live::{Collection, LiveQuery};
use crate::model::progress::Progress;
use crate::model::task::{Task, TaskId};
use crate::model::task_list::{ListId, TaskList};
use crate::store::{Storage, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyListName,
    EmptyTask,
    NoListSelected,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyListName => write!(f, "list name must not be blank"),
            Self::EmptyTask => write!(f, "task description must not be blank"),
            Self::NoListSelected => write!(f, "no list is selected"),
        }
    }
}

impl Error for ValidationError {}

/// Errors from board operations.
#[derive(Debug)]
pub enum BoardError {
    Validation(ValidationError),
    /// The list is the only one left.
    LastList(ListId),
    /// Selection target does not exist.
    ListNotFound(ListId),
    Store(StoreError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::LastList(id) => write!(f, "cannot remove the last remaining list: {id}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::LastList(_) | Self::ListNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for BoardError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Which list is in focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    List(ListId),
}

impl Selection {
    pub fn list_id(self) -> Option<ListId> {
        match self {
            Self::None => None,
            Self::List(id) => Some(id),
        }
    }
}

/// Render-ready snapshot of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// `None` while the first list query is loading.
    pub lists: Option<Vec<TaskList>>,
    pub selection: Selection,
    /// `None` while loading tasks for the current selection.
    pub tasks: Option<Vec<Task>>,
    pub progress: Progress,
}

impl BoardView {
    pub fn selected_list(&self) -> Option<&TaskList> {
        let id = self.selection.list_id()?;
        self.lists.as_ref()?.iter().find(|list| list.id == id)
    }
}

pub struct BoardService<S: Storage> {
    store: S,
    selection: Selection,
    lists: LiveQuery<S, (), Vec<TaskList>>,
    tasks: LiveQuery<S, Selection, Vec<Task>>,
}

impl<S: Storage + 'static> BoardService<S> {
    /// Creates a service in `Selection::None` with both queries loading.
    pub fn new(store: S) -> Self {
        let lists = LiveQuery::new(&store, &[Collection::Lists], (), |store: &S, _: &()| {
            store.query_all_lists()
        });
        let tasks = LiveQuery::new(
            &store,
            &[Collection::Tasks],
            Selection::None,
            |store: &S, selection: &Selection| match selection.list_id() {
                Some(list_id) => store.query_tasks_by_list(list_id),
                None => Ok(Vec::new()),
            },
        );

        Self {
            store,
            selection: Selection::None,
            lists,
            tasks,
        }
    }

    /// Creates a service and loads the initial board.
    pub fn open(store: S) -> Result<Self, BoardError> {
        let mut service = Self::new(store);
        service.sync()?;
        Ok(service)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Creates a list and selects it.
    pub fn add_list(&mut self, name: &str) -> Result<TaskList, BoardError> {
        let Some(name) = normalize_input(name) else {
            warn!("event=board_add_list module=service status=rejected reason=empty_name");
            return Err(ValidationError::EmptyListName.into());
        };

        let id = self.store.create_list(&name)?;
        self.set_selection(Selection::List(id));
        Ok(TaskList { id, name })
    }

    /// Removes a list and its tasks.
    ///
    /// Unknown ids are a no-op. When the removed list was selected, the first
    /// remaining list becomes selected.
    pub fn remove_list(&mut self, id: ListId) -> Result<(), BoardError> {
        let lists = self.store.query_all_lists()?;
        if !lists.iter().any(|list| list.id == id) {
            info!("event=board_remove_list module=service status=noop list_id={id}");
            return Ok(());
        }
        if lists.len() <= 1 {
            warn!("event=board_remove_list module=service status=rejected reason=last_list list_id={id}");
            return Err(BoardError::LastList(id));
        }

        self.store.delete_list(id)?;

        if self.selection == Selection::List(id) {
            let next = lists
                .iter()
                .find(|list| list.id != id)
                .map_or(Selection::None, |list| Selection::List(list.id));
            self.set_selection(next);
        }
        Ok(())
    }

    pub fn select_list(&mut self, id: ListId) -> Result<(), BoardError> {
        if self.store.get_list(id)?.is_none() {
            return Err(BoardError::ListNotFound(id));
        }
        self.set_selection(Selection::List(id));
        Ok(())
    }

    /// Adds a task to the selected list.
    pub fn add_task(&mut self, description: &str) -> Result<TaskId, BoardError> {
        let Some(list_id) = self.selection.list_id() else {
            warn!("event=board_add_task module=service status=rejected reason=no_list_selected");
            return Err(ValidationError::NoListSelected.into());
        };
        let Some(description) = normalize_input(description) else {
            warn!("event=board_add_task module=service status=rejected reason=empty_task");
            return Err(ValidationError::EmptyTask.into());
        };

        Ok(self.store.create_task(&description, list_id)?)
    }

    /// Sets completion state; a missing task is a no-op.
    pub fn toggle_task(&mut self, id: TaskId, completed: bool) -> Result<(), BoardError> {
        Ok(self.store.update_task_completion(id, completed)?)
    }

    pub fn remove_task(&mut self, id: TaskId) -> Result<(), BoardError> {
        Ok(self.store.delete_task(id)?)
    }

    /// Pulls pending changes into the live queries.
    ///
    /// Also repairs the selection: with nothing selected the first list is
    /// picked, and a selection whose list disappeared moves to the first
    /// remaining list (or `None`). Returns whether anything visible changed.
    pub fn sync(&mut self) -> Result<bool, BoardError> {
        let mut changed = self.lists.refresh(&self.store)?;

        if let Some(lists) = self.lists.current() {
            let repaired = match self.selection {
                Selection::List(id) if lists.iter().any(|list| list.id == id) => self.selection,
                _ => lists
                    .first()
                    .map_or(Selection::None, |list| Selection::List(list.id)),
            };
            if repaired != self.selection {
                self.set_selection(repaired);
                changed = true;
            }
        }

        changed |= self.tasks.refresh(&self.store)?;
        Ok(changed)
    }

    pub fn view(&self) -> BoardView {
        let tasks = self.tasks.current().cloned();
        let progress = tasks
            .as_deref()
            .map_or(Progress::new(0, 0), Progress::from_tasks);

        BoardView {
            lists: self.lists.current().cloned(),
            selection: self.selection,
            tasks,
            progress,
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.tasks.set_dependencies(selection);
    }
}

fn normalize_input(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

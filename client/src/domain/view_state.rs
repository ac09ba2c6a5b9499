//! Presentation state machine for detail views.
//!
//! A detail view shows exactly one of three regions: a loading indicator,
//! the content, or a retryable error surface. Once content is shown, a
//! dependent list (for example the custom actions of a goal) loads with its
//! own indicator and its own error surface, independent of the primary
//! state.
//!
//! The machine is synchronous and performs no I/O. Every transition that
//! needs a fetch returns a [`Command`] carrying a [`FetchTicket`]; the
//! outcome must be applied with the same ticket, which lets the owner
//! discard late responses after a retry or a dismissal.

use std::fmt;

use tracing::debug;

use super::ports::FetchError;
use super::{Entity, EntityId, FetchOutcome};

/// Primary view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// A fetch is in flight; only the loading indicator is visible.
    Loading,
    /// The entity is displayed.
    Content,
    /// The last fetch failed; the retry surface is visible.
    Error,
}

/// Visibility of the three mutually exclusive primary regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    /// Loading indicator visible.
    pub loading: bool,
    /// Content region visible.
    pub content: bool,
    /// Error surface visible.
    pub error: bool,
}

impl ViewState {
    /// Region visibility for this state; exactly one flag is set.
    ///
    /// # Examples
    /// ```
    /// use compass::domain::ViewState;
    ///
    /// let regions = ViewState::Error.regions();
    /// assert!(regions.error && !regions.loading && !regions.content);
    /// ```
    #[must_use]
    pub const fn regions(self) -> Regions {
        Regions {
            loading: matches!(self, Self::Loading),
            content: matches!(self, Self::Content),
            error: matches!(self, Self::Error),
        }
    }
}

/// Dependent list state, meaningful once the primary state is `Content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// Waiting for primary content.
    Idle,
    /// List fetch in flight.
    Loading,
    /// List displayed (possibly empty).
    Content,
    /// List fetch failed; retryable without touching the primary state.
    Error,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fetch the owner must issue after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch the primary entity.
    FetchEntity {
        /// Ticket to apply the outcome with.
        ticket: FetchTicket,
        /// Entity to fetch.
        id: EntityId,
    },
    /// Fetch the list scoped to the loaded entity.
    FetchDependents {
        /// Ticket to apply the outcome with.
        ticket: FetchTicket,
        /// Identifier of the loaded primary entity.
        parent: EntityId,
    },
}

/// Rejected transitions. None of these changes the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// A retry was requested while a fetch is still outstanding.
    FetchInFlight,
    /// Retry is only valid from the error surface.
    NotInError,
    /// The dependent list can only be retried from its error surface.
    ListNotInError,
    /// The outcome belongs to a fetch that is no longer current.
    StaleTicket,
    /// The view was dismissed.
    Dismissed,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchInFlight => write!(f, "a fetch is already in flight"),
            Self::NotInError => write!(f, "retry is only available from the error state"),
            Self::ListNotInError => {
                write!(f, "list retry is only available from the list error state")
            }
            Self::StaleTicket => write!(f, "outcome belongs to a superseded fetch"),
            Self::Dismissed => write!(f, "view was dismissed"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Immutable copy of what a detail view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot<E, L> {
    /// Primary state.
    pub state: ViewState,
    /// Loaded entity; `Some` only in `Content`.
    pub entity: Option<E>,
    /// Failure shown on the error surface; `Some` only in `Error`.
    pub error: Option<FetchError>,
    /// Dependent list state.
    pub list_state: ListState,
    /// Dependent items; populated only in `ListState::Content`.
    pub items: Vec<L>,
    /// Failure shown on the list error surface.
    pub list_error: Option<FetchError>,
    /// Whether the view has been dismissed.
    pub dismissed: bool,
}

/// Detail view state machine for entity `E` with dependent items `L`.
#[derive(Debug)]
pub struct DetailViewMachine<E, L> {
    entity_id: EntityId,
    state: ViewState,
    entity: Option<E>,
    error: Option<FetchError>,
    list_state: ListState,
    items: Vec<L>,
    list_error: Option<FetchError>,
    entity_in_flight: Option<FetchTicket>,
    list_in_flight: Option<FetchTicket>,
    next_ticket: u64,
    dismissed: bool,
}

impl<E, L> DetailViewMachine<E, L>
where
    E: Entity + Clone,
    L: Clone,
{
    /// Open a view for `entity_id`: the machine starts in `Loading` and the
    /// returned command fetches the entity.
    #[must_use]
    pub fn open(entity_id: EntityId) -> (Self, Command) {
        let mut machine = Self::blank(entity_id);
        let command = machine.issue_entity_fetch();
        (machine, command)
    }

    /// Open a view with the entity already in hand: the machine starts in
    /// `Content` and the returned command fetches the dependent list.
    #[must_use]
    pub fn open_with(entity: E) -> (Self, Command) {
        let mut machine = Self::blank(entity.id());
        let command = machine.enter_content(entity);
        (machine, command)
    }

    fn blank(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            state: ViewState::Loading,
            entity: None,
            error: None,
            list_state: ListState::Idle,
            items: Vec::new(),
            list_error: None,
            entity_in_flight: None,
            list_in_flight: None,
            next_ticket: 0,
            dismissed: false,
        }
    }

    fn ticket(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    fn issue_entity_fetch(&mut self) -> Command {
        let ticket = self.ticket();
        self.state = ViewState::Loading;
        self.error = None;
        self.entity_in_flight = Some(ticket);
        Command::FetchEntity {
            ticket,
            id: self.entity_id,
        }
    }

    fn issue_list_fetch(&mut self, parent: EntityId) -> Command {
        let ticket = self.ticket();
        self.list_state = ListState::Loading;
        self.list_error = None;
        self.list_in_flight = Some(ticket);
        Command::FetchDependents { ticket, parent }
    }

    fn enter_content(&mut self, entity: E) -> Command {
        let parent = entity.id();
        self.state = ViewState::Content;
        self.entity = Some(entity);
        self.error = None;
        self.issue_list_fetch(parent)
    }

    const fn ensure_open(&self) -> Result<(), TransitionError> {
        if self.dismissed {
            Err(TransitionError::Dismissed)
        } else {
            Ok(())
        }
    }

    /// Apply the outcome of a [`Command::FetchEntity`].
    ///
    /// Success moves to `Content` and returns the dependent-list fetch;
    /// failure moves to `Error`.
    ///
    /// # Errors
    ///
    /// [`TransitionError::StaleTicket`] when `ticket` is not the fetch in
    /// flight, [`TransitionError::Dismissed`] after dismissal.
    pub fn apply_entity(
        &mut self,
        ticket: FetchTicket,
        outcome: FetchOutcome<E>,
    ) -> Result<Option<Command>, TransitionError> {
        self.ensure_open()?;
        if self.entity_in_flight != Some(ticket) {
            return Err(TransitionError::StaleTicket);
        }
        self.entity_in_flight = None;
        match outcome {
            Ok(entity) => {
                debug!(kind = E::KIND, id = %self.entity_id, %ticket, "entity loaded");
                Ok(Some(self.enter_content(entity)))
            }
            Err(error) => {
                debug!(kind = E::KIND, id = %self.entity_id, %ticket, %error, "entity failed");
                self.state = ViewState::Error;
                self.entity = None;
                self.error = Some(error);
                Ok(None)
            }
        }
    }

    /// User-initiated retry from the error surface. Returns to `Loading`
    /// and issues exactly one new entity fetch.
    ///
    /// # Errors
    ///
    /// [`TransitionError::FetchInFlight`] while a fetch is outstanding,
    /// [`TransitionError::NotInError`] from any other state,
    /// [`TransitionError::Dismissed`] after dismissal.
    pub fn retry(&mut self) -> Result<Command, TransitionError> {
        self.ensure_open()?;
        if self.entity_in_flight.is_some() {
            return Err(TransitionError::FetchInFlight);
        }
        if self.state != ViewState::Error {
            return Err(TransitionError::NotInError);
        }
        Ok(self.issue_entity_fetch())
    }

    /// Apply the outcome of a [`Command::FetchDependents`]. A failure only
    /// affects the list region.
    ///
    /// # Errors
    ///
    /// [`TransitionError::StaleTicket`] when `ticket` is not the list fetch
    /// in flight, [`TransitionError::Dismissed`] after dismissal.
    pub fn apply_dependents(
        &mut self,
        ticket: FetchTicket,
        outcome: FetchOutcome<Vec<L>>,
    ) -> Result<(), TransitionError> {
        self.ensure_open()?;
        if self.list_in_flight != Some(ticket) {
            return Err(TransitionError::StaleTicket);
        }
        self.list_in_flight = None;
        match outcome {
            Ok(items) => {
                debug!(parent = %self.entity_id, count = items.len(), "dependents loaded");
                self.list_state = ListState::Content;
                self.items = items;
            }
            Err(error) => {
                debug!(parent = %self.entity_id, %error, "dependents failed");
                self.list_state = ListState::Error;
                self.items.clear();
                self.list_error = Some(error);
            }
        }
        Ok(())
    }

    /// Retry the dependent list from its error surface.
    ///
    /// # Errors
    ///
    /// [`TransitionError::ListNotInError`] unless the list is in
    /// `Error`, [`TransitionError::Dismissed`] after dismissal.
    pub fn retry_list(&mut self) -> Result<Command, TransitionError> {
        self.ensure_open()?;
        if self.list_state != ListState::Error || self.list_in_flight.is_some() {
            return Err(TransitionError::ListNotInError);
        }
        Ok(self.issue_list_fetch(self.entity_id))
    }

    /// Dismiss the view. Outstanding tickets are forgotten, so any late
    /// outcome is rejected.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.entity_in_flight = None;
        self.list_in_flight = None;
    }

    /// Current primary state.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    /// Current dependent list state.
    #[must_use]
    pub const fn list_state(&self) -> ListState {
        self.list_state
    }

    /// Identifier the view was opened for.
    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Loaded entity, if in `Content`.
    #[must_use]
    pub const fn entity(&self) -> Option<&E> {
        self.entity.as_ref()
    }

    /// Whether a primary fetch is outstanding.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.entity_in_flight.is_some()
    }

    /// Copy the displayable state.
    #[must_use]
    pub fn snapshot(&self) -> DetailSnapshot<E, L> {
        DetailSnapshot {
            state: self.state,
            entity: self.entity.clone(),
            error: self.error.clone(),
            list_state: self.list_state,
            items: self.items.clone(),
            list_error: self.list_error.clone(),
            dismissed: self.dismissed,
        }
    }
}

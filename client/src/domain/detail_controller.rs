//! Async driver for a detail view.
//!
//! Each opened view runs as one task that exclusively owns its
//! [`DetailViewMachine`]. Fetches run on separate tasks and report back
//! through a completion channel, so every state mutation happens on the
//! view task no matter where the network call finished. Observers read
//! [`DetailSnapshot`]s from a `watch` channel.
//!
//! Dismissing the view cancels the view's [`CancellationToken`]; fetch tasks
//! stop waiting and any completion that still arrives is rejected by the
//! machine.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dwell_timer::{AppLifecycle, DwellTimer};
use super::ports::{ApiGateway, ContentView, ContentViewSink};
use super::view_state::{Command, DetailSnapshot, DetailViewMachine, FetchTicket, TransitionError};
use super::{
    ApiRoute, AuthHeaders, CustomAction, Entity, EntityFetcher, EntityId, FetchOutcome, UserGoal,
};

/// Describes how to load one kind of detail view.
pub trait DetailResource: Send + Sync + 'static {
    /// Primary entity shown by the view.
    type Entity: Entity + Clone + fmt::Debug;
    /// Items of the dependent list.
    type Item: Entity + Clone + fmt::Debug;

    /// Route for the primary entity.
    fn entity_route(&self, id: EntityId) -> ApiRoute;

    /// Route for the list scoped to a loaded entity.
    fn dependents_route(&self, parent: EntityId) -> ApiRoute;

    /// Analytics record for a finished view of `entity`.
    fn content_view(&self, entity: &Self::Entity, duration_secs: u64) -> ContentView;
}

/// Goal detail: a user goal plus its custom actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserGoalDetail;

impl DetailResource for UserGoalDetail {
    type Entity = UserGoal;
    type Item = CustomAction;

    fn entity_route(&self, id: EntityId) -> ApiRoute {
        ApiRoute::UserGoal(id)
    }

    fn dependents_route(&self, parent: EntityId) -> ApiRoute {
        ApiRoute::CustomActionsForGoal(parent)
    }

    fn content_view(&self, entity: &UserGoal, duration_secs: u64) -> ContentView {
        ContentView {
            title: entity.title().to_owned(),
            content_type: "Goal",
            content_id: entity.id,
            duration_secs,
        }
    }
}

type Reply = oneshot::Sender<Result<(), TransitionError>>;

enum ViewInput {
    Retry(Reply),
    RetryList(Reply),
    Lifecycle(AppLifecycle),
    Dismiss,
}

enum Completion<E, L> {
    Entity(FetchTicket, FetchOutcome<E>),
    Dependents(FetchTicket, FetchOutcome<Vec<L>>),
}

impl<E, L> Completion<E, L> {
    const fn ticket(&self) -> FetchTicket {
        match self {
            Self::Entity(ticket, _) | Self::Dependents(ticket, _) => *ticket,
        }
    }
}

/// Hand a finished fetch to its view; `false` once the view task is gone.
fn deliver<E, L>(
    completions: &mpsc::UnboundedSender<Completion<E, L>>,
    completion: Completion<E, L>,
) -> bool {
    let ticket = completion.ticket();
    if completions.send(completion).is_err() {
        debug!(%ticket, "fetch finished after its view closed");
        return false;
    }
    true
}

/// Opens detail views of one resource kind.
pub struct DetailViewController<R, G: ?Sized> {
    resource: Arc<R>,
    fetcher: EntityFetcher<G>,
    headers: AuthHeaders,
    sink: Arc<dyn ContentViewSink>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
}

impl<R, G> DetailViewController<R, G>
where
    R: DetailResource,
    G: ApiGateway + ?Sized + 'static,
{
    /// Build a controller. Every view it opens sends `headers` with its
    /// requests and reports dwell time to `sink`.
    pub fn new(
        resource: R,
        fetcher: EntityFetcher<G>,
        headers: AuthHeaders,
        sink: Arc<dyn ContentViewSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resource: Arc::new(resource),
            fetcher,
            headers,
            sink,
            clock,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancel every view opened by this controller.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Open a view that starts by fetching entity `id`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(&self, id: EntityId) -> DetailViewHandle<R::Entity, R::Item> {
        let (machine, command) = DetailViewMachine::open(id);
        self.spawn(machine, command)
    }

    /// Open a view for an entity already in hand; only the dependent list
    /// is fetched.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open_with(&self, entity: R::Entity) -> DetailViewHandle<R::Entity, R::Item> {
        let (machine, command) = DetailViewMachine::open_with(entity);
        self.spawn(machine, command)
    }

    fn spawn(
        &self,
        machine: DetailViewMachine<R::Entity, R::Item>,
        command: Command,
    ) -> DetailViewHandle<R::Entity, R::Item> {
        let (inputs_tx, inputs_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(machine.snapshot());
        let cancel = self.shutdown.child_token();

        let view = ViewTask {
            resource: Arc::clone(&self.resource),
            fetcher: self.fetcher.clone(),
            headers: self.headers.clone(),
            sink: Arc::clone(&self.sink),
            timer: DwellTimer::start(Arc::clone(&self.clock)),
            machine,
            completions: completions_tx,
            snapshots: snapshots_tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(view.run(command, inputs_rx, completions_rx));

        DetailViewHandle {
            inputs: inputs_tx,
            snapshots: snapshots_rx,
            cancel,
            task,
        }
    }
}

/// Caller-side handle of one open detail view.
///
/// Dropping the handle dismisses the view.
pub struct DetailViewHandle<E, L> {
    inputs: mpsc::UnboundedSender<ViewInput>,
    snapshots: watch::Receiver<DetailSnapshot<E, L>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl<E, L> DetailViewHandle<E, L>
where
    E: Clone,
    L: Clone,
{
    /// Retry the primary fetch from the error surface.
    ///
    /// # Errors
    ///
    /// Returns the [`TransitionError`] the view rejected the retry with, or
    /// [`TransitionError::Dismissed`] once the view is gone.
    pub async fn retry(&self) -> Result<(), TransitionError> {
        self.request(ViewInput::Retry).await
    }

    /// Retry the dependent list from its error surface.
    ///
    /// # Errors
    ///
    /// As for [`Self::retry`].
    pub async fn retry_list(&self) -> Result<(), TransitionError> {
        self.request(ViewInput::RetryList).await
    }

    async fn request(&self, make: fn(Reply) -> ViewInput) -> Result<(), TransitionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inputs
            .send(make(reply_tx))
            .map_err(|_| TransitionError::Dismissed)?;
        reply_rx.await.unwrap_or(Err(TransitionError::Dismissed))
    }

    /// Forward an application lifecycle notification.
    pub fn lifecycle(&self, event: AppLifecycle) {
        if self.inputs.send(ViewInput::Lifecycle(event)).is_err() {
            debug!(?event, "lifecycle event for a closed view");
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DetailSnapshot<E, L> {
        self.snapshots.borrow().clone()
    }

    /// New receiver of snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot<E, L>> {
        self.snapshots.clone()
    }

    /// Wait for the first snapshot matching `predicate`, including the
    /// current one.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Dismissed`] when the view ends before a matching
    /// snapshot is published.
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&DetailSnapshot<E, L>) -> bool,
    ) -> Result<DetailSnapshot<E, L>, TransitionError> {
        let mut receiver = self.snapshots.clone();
        let snapshot = receiver
            .wait_for(predicate)
            .await
            .map_err(|_| TransitionError::Dismissed)?;
        Ok(snapshot.clone())
    }

    /// Dismiss the view and wait for it to finish. Outstanding fetches are
    /// cancelled and the final snapshot is returned.
    pub async fn dismiss(self) -> DetailSnapshot<E, L> {
        if self.inputs.send(ViewInput::Dismiss).is_err() {
            self.cancel.cancel();
        }
        if let Err(err) = self.task.await {
            warn!(error = %err, "detail view task ended abnormally");
        }
        self.snapshots.borrow().clone()
    }
}

struct ViewTask<R: DetailResource, G: ?Sized> {
    resource: Arc<R>,
    fetcher: EntityFetcher<G>,
    headers: AuthHeaders,
    sink: Arc<dyn ContentViewSink>,
    timer: DwellTimer,
    machine: DetailViewMachine<R::Entity, R::Item>,
    completions: mpsc::UnboundedSender<Completion<R::Entity, R::Item>>,
    snapshots: watch::Sender<DetailSnapshot<R::Entity, R::Item>>,
    cancel: CancellationToken,
}

impl<R, G> ViewTask<R, G>
where
    R: DetailResource,
    G: ApiGateway + ?Sized + 'static,
{
    async fn run(
        mut self,
        first: Command,
        mut inputs: mpsc::UnboundedReceiver<ViewInput>,
        mut completions: mpsc::UnboundedReceiver<Completion<R::Entity, R::Item>>,
    ) {
        let entity_id = self.machine.entity_id();
        debug!(kind = <R::Entity as Entity>::KIND, id = %entity_id, "detail view opened");
        self.dispatch(first);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                input = inputs.recv() => match input {
                    None | Some(ViewInput::Dismiss) => break,
                    Some(ViewInput::Retry(reply)) => {
                        let result = self.machine.retry().map(|command| self.dispatch(command));
                        self.answer(reply, result);
                    }
                    Some(ViewInput::RetryList(reply)) => {
                        let result = self.machine.retry_list().map(|command| self.dispatch(command));
                        self.answer(reply, result);
                    }
                    Some(ViewInput::Lifecycle(event)) => {
                        if let Some(secs) = self.timer.on_lifecycle(event) {
                            self.record_view(secs);
                        }
                    }
                },
                Some(completion) = completions.recv() => self.complete(completion),
            }
        }

        self.close();
        debug!(kind = <R::Entity as Entity>::KIND, id = %entity_id, "detail view closed");
    }

    fn answer(&self, reply: Reply, result: Result<(), TransitionError>) {
        if let Err(err) = &result {
            debug!(error = %err, "retry rejected");
        }
        self.publish();
        if reply.send(result).is_err() {
            debug!("retry caller went away");
        }
    }

    fn complete(&mut self, completion: Completion<R::Entity, R::Item>) {
        let applied = match completion {
            Completion::Entity(ticket, outcome) => self
                .machine
                .apply_entity(ticket, outcome)
                .map(|next| next.map(|command| self.dispatch(command))),
            Completion::Dependents(ticket, outcome) => self
                .machine
                .apply_dependents(ticket, outcome)
                .map(|()| None),
        };
        match applied {
            Ok(_) => self.publish(),
            Err(err) => debug!(error = %err, "completion discarded"),
        }
    }

    fn dispatch(&self, command: Command) {
        let token = self.cancel.child_token();
        let fetcher = self.fetcher.clone();
        let headers = self.headers.clone();
        let completions = self.completions.clone();
        match command {
            Command::FetchEntity { ticket, id } => {
                let route = self.resource.entity_route(id);
                debug!(%route, %ticket, "dispatching entity fetch");
                tokio::spawn(async move {
                    tokio::select! {
                        () = token.cancelled() => {}
                        outcome = fetcher.fetch::<R::Entity>(route, &headers) => {
                            deliver(&completions, Completion::Entity(ticket, outcome));
                        }
                    }
                });
            }
            Command::FetchDependents { ticket, parent } => {
                let route = self.resource.dependents_route(parent);
                debug!(%route, %ticket, "dispatching dependent list fetch");
                tokio::spawn(async move {
                    tokio::select! {
                        () = token.cancelled() => {}
                        outcome = fetcher.fetch_list::<R::Item>(route, &headers) => {
                            deliver(&completions, Completion::Dependents(ticket, outcome));
                        }
                    }
                });
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.machine.snapshot());
    }

    fn record_view(&self, duration_secs: u64) {
        let Some(entity) = self.machine.entity() else {
            debug!(duration_secs, "view ended before content loaded");
            return;
        };
        let view = self.resource.content_view(entity, duration_secs);
        info!(
            content_type = view.content_type,
            content_id = %view.content_id,
            duration_secs,
            "content viewed"
        );
        self.sink.record(&view);
    }

    fn close(&mut self) {
        self.cancel.cancel();
        self.machine.dismiss();
        if let Some(secs) = self.timer.finish() {
            self.record_view(secs);
        }
        self.publish();
    }
}

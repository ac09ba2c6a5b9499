//! Behaviour tests for the detail view state machine.
//!
//! The scenarios feed fetch outcomes into the machine by hand and inspect
//! the fetch commands it issues in response.

use std::sync::Mutex;

use compass::domain::ports::FetchError;
use compass::domain::{
    Command, CustomAction, DetailViewMachine, EntityId, ListState, TransitionError, UserGoal,
    ViewState, decode_entity,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

type Machine = DetailViewMachine<UserGoal, CustomAction>;

#[derive(Default)]
struct DetailWorld {
    machine: Option<Machine>,
    commands: Vec<Command>,
    last_retry: Option<Result<(), TransitionError>>,
}

impl DetailWorld {
    fn machine(&mut self) -> &mut Machine {
        self.machine.as_mut().expect("view must be opened first")
    }

    fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn last_entity_ticket(&self) -> compass::domain::FetchTicket {
        self.commands
            .iter()
            .rev()
            .find_map(|command| match command {
                Command::FetchEntity { ticket, .. } => Some(*ticket),
                Command::FetchDependents { .. } => None,
            })
            .expect("an entity fetch must have been issued")
    }

    fn last_list_ticket(&self) -> compass::domain::FetchTicket {
        self.commands
            .iter()
            .rev()
            .find_map(|command| match command {
                Command::FetchDependents { ticket, .. } => Some(*ticket),
                Command::FetchEntity { .. } => None,
            })
            .expect("a dependent fetch must have been issued")
    }

    fn fail_entity(&mut self, error: FetchError) {
        let ticket = self.last_entity_ticket();
        let next = self
            .machine()
            .apply_entity(ticket, Err(error))
            .expect("outcome applies");
        assert!(next.is_none(), "a failed fetch issues no follow-up");
    }

    fn retry(&mut self) {
        let result = self.machine().retry();
        if let Ok(command) = result {
            self.issue(command);
        }
        self.last_retry = Some(result.map(|_| ()));
    }
}

#[fixture]
fn world() -> Mutex<DetailWorld> {
    Mutex::new(DetailWorld::default())
}

fn goal_json(id: EntityId) -> String {
    format!(r#"{{"id": {id}, "goal": {{"id": 1, "title": "Walk every day"}}}}"#)
}

#[given("a goal detail view opened for goal {id}")]
fn a_goal_detail_view_opened(world: &Mutex<DetailWorld>, id: i64) {
    let mut world = world.lock().expect("world lock");
    let (machine, command) = Machine::open(EntityId::new(id));
    world.machine = Some(machine);
    world.issue(command);
}

#[when("the goal fetch fails with status {status}")]
fn the_goal_fetch_fails_with_status(world: &Mutex<DetailWorld>, status: u16) {
    let mut world = world.lock().expect("world lock");
    world.fail_entity(FetchError::http(status, "fixture failure"));
}

#[when("the goal fetch fails with a transport error")]
fn the_goal_fetch_fails_with_a_transport_error(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    world.fail_entity(FetchError::transport("connection refused"));
}

#[when("the goal fetch succeeds")]
fn the_goal_fetch_succeeds(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    let ticket = world.last_entity_ticket();
    let id = world.machine().entity_id();
    let goal: UserGoal = decode_entity(&goal_json(id)).expect("fixture goal decodes");
    let next = world
        .machine()
        .apply_entity(ticket, Ok(goal))
        .expect("outcome applies");
    if let Some(command) = next {
        world.issue(command);
    }
}

#[when("the action list fetch fails with status {status}")]
fn the_action_list_fetch_fails(world: &Mutex<DetailWorld>, status: u16) {
    let mut world = world.lock().expect("world lock");
    let ticket = world.last_list_ticket();
    world
        .machine()
        .apply_dependents(ticket, Err(FetchError::http(status, "fixture failure")))
        .expect("outcome applies");
}

#[when("the user retries")]
fn the_user_retries(world: &Mutex<DetailWorld>) {
    world.lock().expect("world lock").retry();
}

#[when("the user taps retry on the action list")]
fn the_user_retries_the_action_list(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    let command = world.machine().retry_list().expect("list retry accepted");
    world.issue(command);
}

#[then("the view shows the error surface")]
fn the_view_shows_the_error_surface(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    let regions = world.machine().state().regions();
    assert!(regions.error && !regions.loading && !regions.content);
}

#[then("no goal content is shown")]
fn no_goal_content_is_shown(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    assert!(world.machine().entity().is_none());
}

#[then("the view shows the loading indicator")]
fn the_view_shows_the_loading_indicator(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    assert_eq!(world.machine().state(), ViewState::Loading);
}

#[then("the view shows the goal content")]
fn the_view_shows_the_goal_content(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    let machine = world.machine();
    assert_eq!(machine.state(), ViewState::Content);
    assert_eq!(
        machine.entity().map(UserGoal::title),
        Some("Walk every day")
    );
}

#[then("the action list shows its error surface")]
fn the_action_list_shows_its_error_surface(world: &Mutex<DetailWorld>) {
    let mut world = world.lock().expect("world lock");
    assert_eq!(world.machine().list_state(), ListState::Error);
}

#[then("goal {id} has been requested {count} times")]
fn goal_has_been_requested(world: &Mutex<DetailWorld>, id: i64, count: usize) {
    let world = world.lock().expect("world lock");
    let issued = world
        .commands
        .iter()
        .filter(|command| {
            matches!(command, Command::FetchEntity { id: fetched, .. } if *fetched == EntityId::new(id))
        })
        .count();
    assert_eq!(issued, count);
}

#[then("the actions of goal {id} have been requested {count} times")]
fn actions_have_been_requested(world: &Mutex<DetailWorld>, id: i64, count: usize) {
    let world = world.lock().expect("world lock");
    let issued = world
        .commands
        .iter()
        .filter(|command| {
            matches!(command, Command::FetchDependents { parent, .. } if *parent == EntityId::new(id))
        })
        .count();
    assert_eq!(issued, count);
}

#[then("the last retry is rejected because a fetch is in flight")]
fn the_last_retry_is_rejected(world: &Mutex<DetailWorld>) {
    let world = world.lock().expect("world lock");
    assert_eq!(
        world.last_retry,
        Some(Err(TransitionError::FetchInFlight))
    );
}

#[scenario(
    path = "tests/features/detail_view.feature",
    name = "Failed fetch is retried from the error surface"
)]
fn failed_fetch_is_retried_from_the_error_surface(world: Mutex<DetailWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/detail_view.feature",
    name = "Loaded goal requests its actions once"
)]
fn loaded_goal_requests_its_actions_once(world: Mutex<DetailWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/detail_view.feature",
    name = "A second retry while loading is rejected"
)]
fn a_second_retry_while_loading_is_rejected(world: Mutex<DetailWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/detail_view.feature",
    name = "Action list failure keeps the goal visible"
)]
fn action_list_failure_keeps_the_goal_visible(world: Mutex<DetailWorld>) {
    let _ = world;
}

//! Domain entities, presentation state and services.
//!
//! Purpose: decode API payloads into strongly typed entities, drive detail
//! views through their loading/content/error states, and keep track of
//! badges the user has not looked at yet. Nothing here performs I/O
//! directly; adapters plug in through [`ports`].
//!
//! Public surface:
//! - Entities: [`UserGoal`], [`CustomAction`], [`UserAction`], [`Trigger`],
//!   [`Reward`], [`Badge`], [`Category`].
//! - [`EntityFetcher`] - one GET, one typed outcome.
//! - [`DetailViewMachine`] and [`DetailViewController`] - detail view state
//!   and its async driver.
//! - [`UnseenAwards`] - unseen badge counter.
//! - [`ActionDetailService`] - an action followed by its primary category.
//! - [`CustomActionEditor`], [`RewardService`], [`DeviceRegistration`] -
//!   remaining API operations.

pub mod ports;

mod action;
mod action_detail;
mod badge;
mod category;
mod detail_controller;
mod device_registration;
mod dwell_timer;
mod entity;
mod entity_fetcher;
mod goal;
mod goal_actions;
mod reward;
mod rewards;
mod routes;
mod session;
mod trigger;
mod unseen_awards;
mod view_state;

pub use self::action::{ActionContent, UserAction};
pub use self::action_detail::{ActionDetail, ActionDetailService, CategoryState};
pub use self::badge::Badge;
pub use self::category::{Category, Rgb};
pub use self::detail_controller::{
    DetailResource, DetailViewController, DetailViewHandle, UserGoalDetail,
};
pub use self::device_registration::{DEVICE_TYPE, DeviceRegistration, RegistrationError};
pub use self::dwell_timer::{AppLifecycle, DwellTimer};
pub use self::entity::{Entity, EntityId, ResultsPage};
pub use self::entity_fetcher::{EntityFetcher, FetchOutcome, decode_entity, decode_list};
pub use self::goal::{CustomAction, CustomActionList, GoalContent, UserGoal};
pub use self::goal_actions::CustomActionEditor;
pub use self::reward::{Reward, RewardKind, RewardList};
pub use self::rewards::{RewardPanel, RewardService};
pub use self::routes::ApiRoute;
pub use self::session::{AuthHeaders, Session, SessionValidationError};
pub use self::trigger::Trigger;
pub use self::unseen_awards::{UNSEEN_AWARDS_KEY, UnseenAwards};
pub use self::view_state::{
    Command, DetailSnapshot, DetailViewMachine, FetchTicket, ListState, Regions, TransitionError,
    ViewState,
};

//! Plain-text rendering of view snapshots.
//!
//! Each view renders through a private [`fmt::Display`] wrapper so write
//! errors propagate with `?`; the public functions collect the text.

use std::fmt;

use crate::domain::{
    ActionDetail, CategoryState, CustomAction, DetailSnapshot, EntityId, ListState, RewardPanel,
    UserGoal, ViewState,
};

/// Render a goal detail snapshot.
///
/// # Examples
/// ```
/// use compass::domain::{CustomAction, DetailSnapshot, ListState, UserGoal, ViewState};
/// use compass::inbound::cli::render_goal;
///
/// let loading: DetailSnapshot<UserGoal, CustomAction> = DetailSnapshot {
///     state: ViewState::Loading,
///     entity: None,
///     error: None,
///     list_state: ListState::Idle,
///     items: Vec::new(),
///     list_error: None,
///     dismissed: false,
/// };
/// assert_eq!(render_goal(&loading), "Loading...\n");
/// ```
#[must_use]
pub fn render_goal(snapshot: &DetailSnapshot<UserGoal, CustomAction>) -> String {
    GoalText(snapshot).to_string()
}

struct GoalText<'a>(&'a DetailSnapshot<UserGoal, CustomAction>);

impl fmt::Display for GoalText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        match (snapshot.state, &snapshot.entity) {
            (ViewState::Content, Some(goal)) => {
                writeln!(f, "{}", goal.title())?;
                if !goal.description().is_empty() {
                    writeln!(f, "\n{}", goal.description())?;
                }
                writeln!(f)?;
                write_actions(f, snapshot)
            }
            (ViewState::Error, _) => {
                match &snapshot.error {
                    Some(reason) => writeln!(f, "Could not load goal: {reason}")?,
                    None => writeln!(f, "Could not load goal: unknown error")?,
                }
                writeln!(f, "Retry with --retries.")
            }
            _ => writeln!(f, "Loading..."),
        }
    }
}

fn write_actions(
    f: &mut fmt::Formatter<'_>,
    snapshot: &DetailSnapshot<UserGoal, CustomAction>,
) -> fmt::Result {
    match snapshot.list_state {
        ListState::Idle | ListState::Loading => writeln!(f, "Actions: loading..."),
        ListState::Error => writeln!(f, "Actions: could not be loaded."),
        ListState::Content if snapshot.items.is_empty() => writeln!(f, "Actions: none yet."),
        ListState::Content => {
            writeln!(f, "Actions:")?;
            for action in &snapshot.items {
                write!(f, "  - {}", action.title)?;
                if let Some(trigger) = action.trigger.as_ref().filter(|t| t.is_enabled()) {
                    write!(f, " ({})", trigger.summary())?;
                }
                writeln!(f)?;
            }
            Ok(())
        }
    }
}

/// Render an action with its category line.
#[must_use]
pub fn render_action(detail: &ActionDetail) -> String {
    ActionText(detail).to_string()
}

struct ActionText<'a>(&'a ActionDetail);

impl fmt::Display for ActionText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ActionDetail { action, category } = self.0;
        writeln!(f, "{}", action.title())?;
        if !action.action.description.is_empty() {
            writeln!(f, "\n{}", action.action.description)?;
        }
        if let Some(trigger) = action.trigger.as_ref().filter(|t| t.is_enabled()) {
            writeln!(f, "Reminder: {}", trigger.summary())?;
        }
        match category {
            CategoryState::Unassigned => Ok(()),
            CategoryState::Failed(_) => writeln!(f, "Category: could not be loaded."),
            CategoryState::Loaded(loaded) => {
                write!(f, "Category: {}", loaded.title)?;
                if let Some(rgb) = loaded.parsed_color() {
                    write!(f, " (#{:02X}{:02X}{:02X})", rgb.red, rgb.green, rgb.blue)?;
                }
                writeln!(f)?;
                match loaded.hero_image() {
                    Some(url) => writeln!(f, "Image: {url}"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Render the reward region; a hidden panel renders as nothing.
#[must_use]
pub fn render_reward(panel: &RewardPanel) -> String {
    RewardText(panel).to_string()
}

struct RewardText<'a>(&'a RewardPanel);

impl fmt::Display for RewardText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let RewardPanel::Shown {
            header,
            message,
            attribution,
        } = self.0
        else {
            return Ok(());
        };
        if !header.is_empty() {
            writeln!(f, "{header}")?;
        }
        writeln!(f, "{message}")?;
        match attribution {
            Some(author) => writeln!(f, "  - {author}"),
            None => Ok(()),
        }
    }
}

/// Render unseen award identifiers one per line.
#[must_use]
pub fn render_awards(ids: &[EntityId]) -> String {
    AwardsText(ids).to_string()
}

struct AwardsText<'a>(&'a [EntityId]);

impl fmt::Display for AwardsText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|id| writeln!(f, "{id}"))
    }
}

/// Render the awards tab badge; empty when nothing is unseen.
#[must_use]
pub fn render_tab_label(label: Option<&str>) -> String {
    label.map(|text| format!("{text}\n")).unwrap_or_default()
}

//! Command-line arguments.

use clap::{Parser, Subcommand};

/// `compass` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "compass",
    about = "Load Compass goals, actions, rewards and awards from the command line",
    version
)]
pub struct CliArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Supported operations.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Show one goal and its custom actions.
    Goal {
        /// User goal identifier.
        id: i64,
        /// Retries after a failed load, each taken from the error state.
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Show one action and its primary category.
    Action {
        /// User action identifier.
        id: i64,
    },
    /// Show a random reward.
    Reward,
    /// Inspect or change the unseen award list.
    Awards {
        /// Award operation.
        #[command(subcommand)]
        action: AwardsCommand,
    },
    /// Forward a push registration token to the API.
    RegisterDevice {
        /// Token issued by the push service.
        token: String,
    },
}

/// Award list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum AwardsCommand {
    /// Print unseen badge identifiers in order.
    List,
    /// Print how many badges are unseen.
    Count,
    /// Mark a badge as unseen.
    Add {
        /// Badge identifier.
        id: i64,
    },
    /// Mark a badge as viewed and print the tab label.
    Ack {
        /// Badge identifier.
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> CliCommand {
        CliArgs::try_parse_from(args)
            .expect("arguments should parse")
            .command
    }

    #[rstest]
    #[case(&["compass", "goal", "42"], CliCommand::Goal { id: 42, retries: 0 })]
    #[case(&["compass", "goal", "42", "--retries", "2"], CliCommand::Goal { id: 42, retries: 2 })]
    #[case(&["compass", "action", "5"], CliCommand::Action { id: 5 })]
    #[case(&["compass", "reward"], CliCommand::Reward)]
    #[case(&["compass", "awards", "add", "5"], CliCommand::Awards { action: AwardsCommand::Add { id: 5 } })]
    #[case(&["compass", "awards", "count"], CliCommand::Awards { action: AwardsCommand::Count })]
    fn parses_subcommands(#[case] args: &[&str], #[case] expected: CliCommand) {
        assert_eq!(parse(args), expected);
    }

    #[test]
    fn goal_requires_an_integer_id() {
        assert!(CliArgs::try_parse_from(["compass", "goal", "forty-two"]).is_err());
    }
}

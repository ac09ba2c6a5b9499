//! Compass client core.
//!
//! Loads goals, custom actions, rewards and badges from the Compass API,
//! drives detail views through their loading/content/error states and
//! tracks badges the user has not looked at yet.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(test)]
mod test_support;

//! Bubbles library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod core;
pub mod platform;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which demo screen to open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Messaging,
    Goals,
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "messaging" => Ok(Screen::Messaging),
            "goals" => Ok(Screen::Goals),
            other => Err(format!("unknown screen: {other}")),
        }
    }
}

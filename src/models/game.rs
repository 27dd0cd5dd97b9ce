// src/models/game.rs

//! Game type enumeration and per-game shaping policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The lottery games the service can serve results for.
///
/// The lowercase name of each variant is the public selector used in
/// configuration, on the CLI and by the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Northern traditional lottery. Draws are two-digit numbers taken from
    /// the tail of each prize, reported in prize-tier order.
    Xsmb,
    /// Vietlott Mega 6/45.
    Mega645,
    /// Vietlott Power 6/55: six main numbers plus one special number.
    Power655,
    /// Vietlott Keno.
    Keno,
    /// Vietlott Bingo18.
    Bingo18,
}

/// How a game's drawn numbers are shaped in the canonical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Flat list in source order. The order is prize-tier order and carries
    /// meaning, so it is never sorted.
    PrizeTiers,
    /// Flat list of drawn balls, reported in ascending order.
    SortedBalls,
    /// Six ascending main balls plus one special ball.
    MainPlusSpecial,
}

impl GameType {
    /// Every known game, in selector order.
    pub const ALL: [GameType; 5] = [
        GameType::Xsmb,
        GameType::Mega645,
        GameType::Power655,
        GameType::Keno,
        GameType::Bingo18,
    ];

    /// The public selector string for this game.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Xsmb => "xsmb",
            GameType::Mega645 => "mega645",
            GameType::Power655 => "power655",
            GameType::Keno => "keno",
            GameType::Bingo18 => "bingo18",
        }
    }

    /// The canonical number shape for this game.
    pub fn payload_shape(&self) -> PayloadShape {
        match self {
            GameType::Xsmb => PayloadShape::PrizeTiers,
            GameType::Power655 => PayloadShape::MainPlusSpecial,
            GameType::Mega645 | GameType::Keno | GameType::Bingo18 => PayloadShape::SortedBalls,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xsmb" => Ok(GameType::Xsmb),
            "mega645" => Ok(GameType::Mega645),
            "power655" => Ok(GameType::Power655),
            "keno" => Ok(GameType::Keno),
            "bingo18" => Ok(GameType::Bingo18),
            other => Err(AppError::validation(format!(
                "unknown game type '{other}'"
            ))),
        }
    }
}

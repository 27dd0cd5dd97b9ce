// src/pipeline/canonicalize.rs

//! Shaping and ordering of adapter output into the canonical result form.

use crate::error::{AppError, Result};
use crate::models::{DrawRecord, GameType, NumberPayload, PayloadShape, RawDraw, ResultSet};

/// Canonicalizer output: the surviving records plus the shape-drop count.
#[derive(Debug)]
pub(crate) struct Canonical {
    pub records: ResultSet,
    pub dropped: usize,
}

/// Shape, validate, and order one adapter batch.
///
/// Draws whose numbers cannot satisfy the game's payload shape are dropped
/// and counted. Zero surviving records is a caller-visible failure: an
/// upstream answering with semantically empty data must be distinguishable
/// from an unregistered game.
pub(crate) fn canonicalize(game: GameType, draws: Vec<RawDraw>) -> Result<Canonical> {
    let mut records: ResultSet = Vec::with_capacity(draws.len());
    let mut dropped = 0;

    for draw in draws {
        match shape_numbers(game.payload_shape(), draw.numbers) {
            Some(numbers) => records.push(DrawRecord {
                date: draw.date,
                numbers,
            }),
            None => dropped += 1,
        }
    }

    if records.is_empty() {
        return Err(AppError::EmptyResult { game });
    }

    // Stable by construction: draws on the same date keep adapter order.
    records.sort_by_key(|record| record.date);

    Ok(Canonical { records, dropped })
}

fn shape_numbers(game_shape: PayloadShape, mut numbers: Vec<u32>) -> Option<NumberPayload> {
    match game_shape {
        // Prize-tier order is significance order, never sorted.
        PayloadShape::PrizeTiers => {
            if numbers.is_empty() {
                return None;
            }
            Some(NumberPayload::Flat(numbers))
        }
        PayloadShape::SortedBalls => {
            if numbers.is_empty() {
                return None;
            }
            numbers.sort_unstable();
            Some(NumberPayload::Flat(numbers))
        }
        // Six ascending main numbers plus the seventh as the special;
        // anything past the seventh is upstream noise.
        PayloadShape::MainPlusSpecial => {
            if numbers.len() < 7 {
                return None;
            }
            let special = numbers[6];
            let mut main = numbers;
            main.truncate(6);
            main.sort_unstable();
            Some(NumberPayload::Structured { main, special })
        }
    }
}

// Per-tab selection state and its event handlers.
//
// Handlers are pure: `apply` takes the current state and an event and
// returns the next state, or an error that leaves the caller's state as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{StatCatalog, UnknownStatisticError};
use crate::dataset::PlayerIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    UnknownStatistic(#[from] UnknownStatisticError),

    #[error("player {player} is not available in this tab")]
    UnknownPlayer { player: String },
}

/// The chosen axes and player subset for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub stat_x: String,
    pub stat_y: String,
    /// Selected players, no duplicates, in the order they were added.
    pub players: Vec<PlayerIdentity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SetStatX(String),
    SetStatY(String),
    SwapAxes,
    TogglePlayer(PlayerIdentity),
    SetPlayers(Vec<PlayerIdentity>),
    ClearPlayers,
    /// Back to the tab's Top-N default.
    ResetPlayers,
}

/// What a tab offers: the statistic list, the players in its view, and its
/// default player subset.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub catalog: &'a StatCatalog,
    pub options: &'a [PlayerIdentity],
    pub defaults: &'a [PlayerIdentity],
}

impl<'a> SelectionContext<'a> {
    fn check_stat(&self, key: &str) -> Result<(), SelectionError> {
        self.catalog.descriptor(key)?;
        Ok(())
    }

    fn check_player(&self, player: &PlayerIdentity) -> Result<(), SelectionError> {
        if self.options.contains(player) {
            Ok(())
        } else {
            Err(SelectionError::UnknownPlayer {
                player: player.name.clone(),
            })
        }
    }
}

impl SelectionState {
    /// Initial state for a tab: given axes and the tab's default players.
    pub fn new(
        stat_x: impl Into<String>,
        stat_y: impl Into<String>,
        ctx: &SelectionContext<'_>,
    ) -> Result<Self, SelectionError> {
        let state = SelectionState {
            stat_x: stat_x.into(),
            stat_y: stat_y.into(),
            players: ctx.defaults.to_vec(),
        };
        ctx.check_stat(&state.stat_x)?;
        ctx.check_stat(&state.stat_y)?;
        Ok(state)
    }

    pub fn is_selected(&self, player: &PlayerIdentity) -> bool {
        self.players.contains(player)
    }

    /// Apply one event and return the resulting state.
    pub fn apply(
        &self,
        event: SelectionEvent,
        ctx: &SelectionContext<'_>,
    ) -> Result<SelectionState, SelectionError> {
        let mut next = self.clone();
        match event {
            SelectionEvent::SetStatX(key) => {
                ctx.check_stat(&key)?;
                next.stat_x = key;
            }
            SelectionEvent::SetStatY(key) => {
                ctx.check_stat(&key)?;
                next.stat_y = key;
            }
            SelectionEvent::SwapAxes => {
                std::mem::swap(&mut next.stat_x, &mut next.stat_y);
            }
            SelectionEvent::TogglePlayer(player) => {
                ctx.check_player(&player)?;
                if let Some(i) = next.players.iter().position(|p| *p == player) {
                    next.players.remove(i);
                } else {
                    next.players.push(player);
                }
            }
            SelectionEvent::SetPlayers(players) => {
                let mut unique: Vec<PlayerIdentity> = Vec::with_capacity(players.len());
                for player in players {
                    ctx.check_player(&player)?;
                    if !unique.contains(&player) {
                        unique.push(player);
                    }
                }
                next.players = unique;
            }
            SelectionEvent::ClearPlayers => {
                next.players.clear();
            }
            SelectionEvent::ResetPlayers => {
                next.players = ctx.defaults.to_vec();
            }
        }
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

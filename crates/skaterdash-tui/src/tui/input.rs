// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app loop,
// or into local ViewState mutations (cursor movement, quit confirmation).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use skaterdash_core::dashboard::TabId;
use skaterdash_core::selection::SelectionEvent;

use super::ViewState;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the app loop.
/// Returns `None` when it was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports Release as well as Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    let tab = view_state.active_tab;

    match key_event.code {
        // Tabs
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            switch_tab(view_state, TabId(index))
        }
        KeyCode::Tab => switch_tab(view_state, tab.next()),
        KeyCode::BackTab => switch_tab(view_state, tab.prev()),

        // Axis pickers
        KeyCode::Char('x') => cycle_stat(view_state, Axis::X, 1),
        KeyCode::Char('X') => cycle_stat(view_state, Axis::X, -1),
        KeyCode::Char('y') => cycle_stat(view_state, Axis::Y, 1),
        KeyCode::Char('Y') => cycle_stat(view_state, Axis::Y, -1),
        KeyCode::Char('s') => selection(tab, SelectionEvent::SwapAxes),

        // Player list
        KeyCode::Up | KeyCode::Char('k') => {
            move_list_cursor(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_list_cursor(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_list_cursor(view_state, -(PAGE_SIZE as isize));
            None
        }
        KeyCode::PageDown => {
            move_list_cursor(view_state, PAGE_SIZE as isize);
            None
        }
        KeyCode::Char(' ') => {
            let player = view_state.cursor_player()?.clone();
            selection(tab, SelectionEvent::TogglePlayer(player))
        }
        KeyCode::Char('r') => selection(tab, SelectionEvent::ResetPlayers),
        KeyCode::Char('c') => selection(tab, SelectionEvent::ClearPlayers),

        // Chart points
        KeyCode::Left | KeyCode::Char('h') => {
            move_point_cursor(view_state, -1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            move_point_cursor(view_state, 1);
            None
        }
        KeyCode::Enter => {
            let player = view_state.focused_point()?.player.clone();
            Some(UserCommand::ClickPoint { tab, player })
        }

        KeyCode::Char('t') => Some(UserCommand::ToggleTheme),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Rows moved by PageUp/PageDown in the player list.
const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn selection(tab: TabId, event: SelectionEvent) -> Option<UserCommand> {
    Some(UserCommand::Selection { tab, event })
}

/// Switch locally so the next frame shows the new tab, and tell the app.
fn switch_tab(view_state: &mut ViewState, tab: TabId) -> Option<UserCommand> {
    if tab.0 >= view_state.tabs.len() || tab == view_state.active_tab {
        return None;
    }
    view_state.active_tab = tab;
    Some(UserCommand::SwitchTab(tab))
}

/// Request the next (or previous) statistic for an axis, wrapping around.
fn cycle_stat(view_state: &ViewState, axis: Axis, step: isize) -> Option<UserCommand> {
    let tab = view_state.active()?;
    let len = view_state.stats.len();
    if len == 0 {
        return None;
    }
    let current = match axis {
        Axis::X => &tab.selection.stat_x,
        Axis::Y => &tab.selection.stat_y,
    };
    let index = view_state
        .stats
        .iter()
        .position(|s| &s.key == current)
        .unwrap_or(0);
    let next = (index as isize + step).rem_euclid(len as isize) as usize;
    let key = view_state.stats[next].key.clone();
    let event = match axis {
        Axis::X => SelectionEvent::SetStatX(key),
        Axis::Y => SelectionEvent::SetStatY(key),
    };
    selection(tab.id, event)
}

fn move_list_cursor(view_state: &mut ViewState, delta: isize) {
    let i = view_state.active_tab.0;
    let Some(len) = view_state.active().map(|t| t.options.len()) else {
        return;
    };
    view_state.list_cursor[i] = step_clamped(view_state.list_cursor[i], delta, len);
}

fn move_point_cursor(view_state: &mut ViewState, delta: isize) {
    let i = view_state.active_tab.0;
    let Some(len) = view_state.active().map(|t| t.chart.points.len()) else {
        return;
    };
    view_state.point_cursor[i] = step_clamped(view_state.point_cursor[i], delta, len);
}

fn step_clamped(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

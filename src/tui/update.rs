//! Pure state transitions: (Screen, Action) -> Transition.
//!
//! Fully testable without a terminal. Each screen defines which actions
//! it accepts. Unhandled actions return the current screen unchanged.
//! Anything that mutates the roster or an engine is described as an
//! [`Effect`] and left to the effects layer.

use rand::Rng;

use super::state::{Action, App, AppEvent, Effect, Input, InputKind, Screen, Transition};

/// Pure state transition function.
///
/// Given the current screen, an action, and a read-only view of the app,
/// produces the next transition.
pub fn update(screen: Screen, action: &Action, app: &App) -> Transition {
    match screen {
        Screen::Names {
            cursor,
            input: Some(input),
        } => update_input(cursor, input, action),
        Screen::Names { cursor, input: None } => update_names(cursor, action, app),
        Screen::Draw => update_draw(action, app),
        Screen::Groups { scroll } => update_groups(scroll, action, app),
    }
}

/// Apply an event that did not come from the keyboard.
///
/// Late events are harmless: a tick outside a draw and a grouping result
/// for a superseded ticket are both ignored by the engines.
pub fn handle_background_event<R: Rng + ?Sized>(app: &mut App, event: AppEvent, rng: &mut R) {
    match event {
        AppEvent::Tick => {
            app.draw.tick(app.roster.names(), rng);
        }
        AppEvent::GroupingReady { ticket } => {
            if app.grouping.complete(ticket, rng) {
                let count = app.grouping.groups().len();
                app.info(format!("Generated {} group{}", count, plural(count)));
                if let Screen::Groups { scroll } = &mut app.screen {
                    *scroll = 0;
                }
            }
        }
        // Keys and pastes go through update
        AppEvent::Key(_) | AppEvent::Paste(_) => {}
    }
}

// ============================================================================
// SHARED
// ============================================================================

/// Tab switching, available on every screen except an open prompt.
fn switch_tab(current: u8, action: &Action) -> Option<Screen> {
    let target = match action {
        Action::NumberKey(n @ 1..=3) => *n,
        Action::NextTab => current % 3 + 1,
        _ => return None,
    };
    if target == current {
        return None;
    }
    Some(match target {
        1 => Screen::names(),
        2 => Screen::Draw,
        _ => Screen::groups(),
    })
}

/// Append pasted text to a prompt.
///
/// A names prompt keeps line breaks (normalized to `\n`) since they
/// separate names. A path prompt is a single line.
fn push_pasted(input: &mut Input, text: &str) {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    match input.kind {
        InputKind::Names => input.buffer.push_str(&text),
        InputKind::CsvPath => input.buffer.extend(text.chars().filter(|c| *c != '\n')),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Names: cursor movement, prompts, list maintenance.
fn update_names(cursor: usize, action: &Action, app: &App) -> Transition {
    let len = app.roster.len();
    let stay = |cursor| Screen::Names { cursor, input: None };

    if let Some(screen) = switch_tab(1, action) {
        return Transition::Screen(screen);
    }

    match action {
        Action::MoveUp => Transition::Screen(stay(cursor.saturating_sub(1))),
        Action::MoveDown => {
            let new_cursor = if len == 0 { 0 } else { (cursor + 1).min(len - 1) };
            Transition::Screen(stay(new_cursor))
        }
        Action::Insert => Transition::Screen(Screen::Names {
            cursor,
            input: Some(Input::new(InputKind::Names)),
        }),
        Action::Import => Transition::Screen(Screen::Names {
            cursor,
            input: Some(Input::new(InputKind::CsvPath)),
        }),
        Action::Remove if cursor < len => {
            Transition::Effect(stay(cursor), Effect::RemoveName(cursor))
        }
        Action::Dedupe if app.roster.has_duplicates() => {
            Transition::Effect(stay(cursor), Effect::Dedupe)
        }
        Action::Clear if len > 0 => Transition::Effect(stay(0), Effect::ClearNames),
        Action::Sample => Transition::Effect(stay(cursor), Effect::AddSample),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(stay(cursor)),
    }
}

/// Open prompt: edit the buffer, submit on Enter, close on Esc.
fn update_input(cursor: usize, mut input: Input, action: &Action) -> Transition {
    let closed = Screen::Names { cursor, input: None };

    match action {
        Action::Char(c) => {
            input.buffer.push(*c);
            Transition::Screen(Screen::Names {
                cursor,
                input: Some(input),
            })
        }
        Action::Paste(text) => {
            push_pasted(&mut input, text);
            Transition::Screen(Screen::Names {
                cursor,
                input: Some(input),
            })
        }
        Action::Backspace => {
            input.buffer.pop();
            Transition::Screen(Screen::Names {
                cursor,
                input: Some(input),
            })
        }
        Action::Enter => {
            let text = input.buffer.trim();
            if text.is_empty() {
                return Transition::Screen(closed);
            }
            let effect = match input.kind {
                InputKind::Names => Effect::AddText(text.to_string()),
                InputKind::CsvPath => Effect::ImportCsv(text.into()),
            };
            Transition::Effect(closed, effect)
        }
        Action::Back => Transition::Screen(closed),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Names {
            cursor,
            input: Some(input),
        }),
    }
}

/// Draw: start/stop, repeat toggle, two-step reset.
fn update_draw(action: &Action, app: &App) -> Transition {
    let draw = &app.draw;

    // An armed reset captures the keyboard until confirmed or cancelled.
    if draw.is_reset_armed() {
        return match action {
            Action::ConfirmYes | Action::Reset => Transition::Effect(Screen::Draw, Effect::Reset),
            Action::ConfirmNo | Action::Back => {
                Transition::Effect(Screen::Draw, Effect::CancelReset)
            }
            Action::Quit => Transition::Quit,
            _ => Transition::Screen(Screen::Draw),
        };
    }

    if let Some(screen) = switch_tab(2, action) {
        return Transition::Screen(screen);
    }

    match action {
        Action::Toggle | Action::Enter => {
            if draw.is_cycling() {
                Transition::Effect(Screen::Draw, Effect::StopDraw)
            } else if draw.eligible(app.roster.names()).is_empty() {
                Transition::Screen(Screen::Draw)
            } else {
                Transition::Effect(Screen::Draw, Effect::StartDraw)
            }
        }
        Action::Reset if !draw.winners().is_empty() => {
            Transition::Effect(Screen::Draw, Effect::Reset)
        }
        Action::ToggleRepeat => Transition::Effect(Screen::Draw, Effect::ToggleRepeat),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::Draw),
    }
}

/// Groups: size adjustment, generation, scrolling, export.
fn update_groups(scroll: usize, action: &Action, app: &App) -> Transition {
    let grouping = &app.grouping;
    let group_count = grouping.groups().len();
    let stay = |scroll| Screen::Groups { scroll };

    if let Some(screen) = switch_tab(3, action) {
        return Transition::Screen(screen);
    }

    match action {
        Action::MoveUp => Transition::Screen(stay(scroll.saturating_sub(1))),
        Action::MoveDown => {
            let new_scroll = if group_count == 0 {
                0
            } else {
                (scroll + 1).min(group_count - 1)
            };
            Transition::Screen(stay(new_scroll))
        }
        Action::Increase => {
            let max = app.roster.len().max(1);
            let size = (grouping.group_size() + 1).min(max);
            if size == grouping.group_size() {
                Transition::Screen(stay(scroll))
            } else {
                Transition::Effect(stay(scroll), Effect::SetGroupSize(size))
            }
        }
        Action::Decrease if grouping.group_size() > 1 => Transition::Effect(
            stay(scroll),
            Effect::SetGroupSize(grouping.group_size() - 1),
        ),
        Action::Generate | Action::Enter if !app.roster.is_empty() => {
            Transition::Effect(stay(scroll), Effect::GenerateGroups)
        }
        Action::Copy if group_count > 0 => Transition::Effect(stay(scroll), Effect::CopyGroups),
        Action::Export if group_count > 0 => Transition::Effect(stay(scroll), Effect::ExportCsv),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(stay(scroll)),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Deferred, Ticker};
    use crate::types::Settings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app_with(names: &[&str]) -> App {
        let mut app = App::new(Settings::default());
        app.roster.add(names.iter().copied());
        app
    }

    fn typing(buffer: &str, kind: InputKind) -> Screen {
        Screen::Names {
            cursor: 0,
            input: Some(Input {
                kind,
                buffer: buffer.to_string(),
            }),
        }
    }

    // -- Tabs --

    #[test]
    fn number_keys_switch_tabs() {
        let app = app_with(&[]);
        assert_eq!(
            update(Screen::names(), &Action::NumberKey(2), &app),
            Transition::Screen(Screen::Draw)
        );
        assert_eq!(
            update(Screen::Draw, &Action::NumberKey(3), &app),
            Transition::Screen(Screen::groups())
        );
        assert_eq!(
            update(Screen::groups(), &Action::NumberKey(1), &app),
            Transition::Screen(Screen::names())
        );
    }

    #[test]
    fn next_tab_wraps_around() {
        let app = app_with(&[]);
        assert_eq!(
            update(Screen::groups(), &Action::NextTab, &app),
            Transition::Screen(Screen::names())
        );
    }

    #[test]
    fn quit_from_every_screen() {
        let app = app_with(&["A"]);
        for screen in [Screen::names(), Screen::Draw, Screen::groups()] {
            assert_eq!(update(screen, &Action::Quit, &app), Transition::Quit);
        }
    }

    // -- Names --

    #[test]
    fn names_cursor_clamps_at_end() {
        let app = app_with(&["A", "B"]);
        let screen = Screen::Names {
            cursor: 1,
            input: None,
        };
        assert_eq!(
            update(screen, &Action::MoveDown, &app),
            Transition::Screen(Screen::Names {
                cursor: 1,
                input: None
            })
        );
    }

    #[test]
    fn names_remove_targets_cursor() {
        let app = app_with(&["A", "B", "C"]);
        let screen = Screen::Names {
            cursor: 2,
            input: None,
        };
        match update(screen, &Action::Remove, &app) {
            Transition::Effect(_, Effect::RemoveName(i)) => assert_eq!(i, 2),
            other => panic!("Expected RemoveName, got {:?}", other),
        }
    }

    #[test]
    fn names_remove_on_empty_list_is_noop() {
        let app = app_with(&[]);
        assert_eq!(
            update(Screen::names(), &Action::Remove, &app),
            Transition::Screen(Screen::names())
        );
    }

    #[test]
    fn dedupe_only_offered_with_duplicates() {
        let unique = app_with(&["A", "B"]);
        assert_eq!(
            update(Screen::names(), &Action::Dedupe, &unique),
            Transition::Screen(Screen::names())
        );
        let dup = app_with(&["A", "A"]);
        assert_eq!(
            update(Screen::names(), &Action::Dedupe, &dup),
            Transition::Effect(Screen::names(), Effect::Dedupe)
        );
    }

    #[test]
    fn clear_resets_cursor() {
        let app = app_with(&["A", "B"]);
        let screen = Screen::Names {
            cursor: 1,
            input: None,
        };
        assert_eq!(
            update(screen, &Action::Clear, &app),
            Transition::Effect(Screen::names(), Effect::ClearNames)
        );
    }

    #[test]
    fn insert_opens_prompt() {
        let app = app_with(&[]);
        assert_eq!(
            update(Screen::names(), &Action::Insert, &app),
            Transition::Screen(typing("", InputKind::Names))
        );
    }

    // -- Prompt --

    #[test]
    fn prompt_collects_characters() {
        let app = app_with(&[]);
        let screen = typing("Al", InputKind::Names);
        let next = update(screen, &Action::Char('i'), &app);
        assert_eq!(next, Transition::Screen(typing("Ali", InputKind::Names)));
    }

    #[test]
    fn prompt_backspace_on_empty_buffer_is_safe() {
        let app = app_with(&[]);
        let next = update(typing("", InputKind::Names), &Action::Backspace, &app);
        assert_eq!(next, Transition::Screen(typing("", InputKind::Names)));
    }

    #[test]
    fn prompt_enter_submits_names() {
        let app = app_with(&[]);
        let next = update(typing(" A, B ", InputKind::Names), &Action::Enter, &app);
        assert_eq!(
            next,
            Transition::Effect(Screen::names(), Effect::AddText("A, B".into()))
        );
    }

    #[test]
    fn prompt_enter_submits_csv_path() {
        let app = app_with(&[]);
        let next = update(typing("/tmp/x.csv", InputKind::CsvPath), &Action::Enter, &app);
        assert_eq!(
            next,
            Transition::Effect(Screen::names(), Effect::ImportCsv("/tmp/x.csv".into()))
        );
    }

    #[test]
    fn prompt_enter_on_blank_just_closes() {
        let app = app_with(&[]);
        let next = update(typing("   ", InputKind::Names), &Action::Enter, &app);
        assert_eq!(next, Transition::Screen(Screen::names()));
    }

    #[test]
    fn multi_line_paste_stays_in_prompt() {
        let app = app_with(&["Existing1", "Existing2"]);
        let screen = match update(Screen::names(), &Action::Insert, &app) {
            Transition::Screen(screen) => screen,
            other => panic!("Expected prompt, got {:?}", other),
        };
        let pasted = Action::Paste("Alice\nXavier\r\nquinn\n".into());
        let screen = match update(screen, &pasted, &app) {
            Transition::Screen(screen) => screen,
            other => panic!("Paste must not submit, got {:?}", other),
        };
        assert_eq!(screen, typing("Alice\nXavier\nquinn\n", InputKind::Names));

        assert_eq!(
            update(screen, &Action::Enter, &app),
            Transition::Effect(
                Screen::names(),
                Effect::AddText("Alice\nXavier\nquinn".into())
            )
        );
    }

    #[test]
    fn paste_into_path_prompt_drops_line_breaks() {
        let app = app_with(&[]);
        let next = update(
            typing("", InputKind::CsvPath),
            &Action::Paste("/tmp/names.csv\n".into()),
            &app,
        );
        assert_eq!(next, Transition::Screen(typing("/tmp/names.csv", InputKind::CsvPath)));
    }

    #[test]
    fn paste_outside_prompt_is_ignored() {
        let app = app_with(&["A"]);
        assert_eq!(
            update(Screen::names(), &Action::Paste("X\nq".into()), &app),
            Transition::Screen(Screen::names())
        );
        assert_eq!(
            update(Screen::Draw, &Action::Paste("q".into()), &app),
            Transition::Screen(Screen::Draw)
        );
    }

    #[test]
    fn prompt_ignores_tab_switching() {
        let app = app_with(&[]);
        let next = update(typing("x", InputKind::Names), &Action::NumberKey(2), &app);
        assert_eq!(next, Transition::Screen(typing("x", InputKind::Names)));
    }

    #[test]
    fn prompt_escape_discards_buffer() {
        let app = app_with(&[]);
        let next = update(typing("half typed", InputKind::Names), &Action::Back, &app);
        assert_eq!(next, Transition::Screen(Screen::names()));
    }

    // -- Draw --

    #[test]
    fn toggle_starts_draw_with_eligible_names() {
        let app = app_with(&["A"]);
        assert_eq!(
            update(Screen::Draw, &Action::Toggle, &app),
            Transition::Effect(Screen::Draw, Effect::StartDraw)
        );
    }

    #[test]
    fn toggle_with_empty_pool_is_noop() {
        let app = app_with(&[]);
        assert_eq!(
            update(Screen::Draw, &Action::Toggle, &app),
            Transition::Screen(Screen::Draw)
        );
    }

    #[test]
    fn toggle_while_cycling_stops() {
        let mut app = app_with(&["A"]);
        app.draw.start(app.roster.names(), Ticker::inert);
        assert_eq!(
            update(Screen::Draw, &Action::Enter, &app),
            Transition::Effect(Screen::Draw, Effect::StopDraw)
        );
    }

    #[test]
    fn reset_needs_winners() {
        let app = app_with(&["A"]);
        assert_eq!(
            update(Screen::Draw, &Action::Reset, &app),
            Transition::Screen(Screen::Draw)
        );
    }

    #[test]
    fn armed_reset_captures_keys() {
        let mut app = app_with(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(1);
        app.draw.start(app.roster.names(), Ticker::inert);
        app.draw.stop(app.roster.names(), &mut rng);
        assert_eq!(
            update(Screen::Draw, &Action::Reset, &app),
            Transition::Effect(Screen::Draw, Effect::Reset)
        );

        app.draw.reset();
        assert_eq!(
            update(Screen::Draw, &Action::ConfirmYes, &app),
            Transition::Effect(Screen::Draw, Effect::Reset)
        );
        assert_eq!(
            update(Screen::Draw, &Action::ConfirmNo, &app),
            Transition::Effect(Screen::Draw, Effect::CancelReset)
        );
        assert_eq!(
            update(Screen::Draw, &Action::NumberKey(1), &app),
            Transition::Screen(Screen::Draw),
            "tabs are locked while a reset is pending"
        );
    }

    // -- Groups --

    #[test]
    fn group_size_bounded_by_roster() {
        let mut app = app_with(&["A", "B"]);
        app.grouping.set_group_size(2);
        assert_eq!(
            update(Screen::groups(), &Action::Increase, &app),
            Transition::Screen(Screen::groups())
        );
        assert_eq!(
            update(Screen::groups(), &Action::Decrease, &app),
            Transition::Effect(Screen::groups(), Effect::SetGroupSize(1))
        );
    }

    #[test]
    fn group_size_never_below_one() {
        let mut app = app_with(&["A", "B"]);
        app.grouping.set_group_size(1);
        assert_eq!(
            update(Screen::groups(), &Action::Decrease, &app),
            Transition::Screen(Screen::groups())
        );
    }

    #[test]
    fn generate_requires_names() {
        let empty = app_with(&[]);
        assert_eq!(
            update(Screen::groups(), &Action::Generate, &empty),
            Transition::Screen(Screen::groups())
        );
        let app = app_with(&["A"]);
        assert_eq!(
            update(Screen::groups(), &Action::Generate, &app),
            Transition::Effect(Screen::groups(), Effect::GenerateGroups)
        );
    }

    #[test]
    fn copy_and_export_require_groups() {
        let mut app = app_with(&["A", "B", "C"]);
        assert_eq!(
            update(Screen::groups(), &Action::Copy, &app),
            Transition::Screen(Screen::groups())
        );
        app.grouping
            .generate_now(app.roster.names(), &mut StdRng::seed_from_u64(0));
        assert_eq!(
            update(Screen::groups(), &Action::Copy, &app),
            Transition::Effect(Screen::groups(), Effect::CopyGroups)
        );
        assert_eq!(
            update(Screen::groups(), &Action::Export, &app),
            Transition::Effect(Screen::groups(), Effect::ExportCsv)
        );
    }

    // -- Background events --

    #[test]
    fn tick_outside_draw_is_ignored() {
        let mut app = app_with(&["A"]);
        handle_background_event(&mut app, AppEvent::Tick, &mut StdRng::seed_from_u64(0));
        assert_eq!(app.draw.displayed(), crate::types::PLACEHOLDER);
    }

    #[test]
    fn tick_while_cycling_flashes_a_name() {
        let mut app = app_with(&["A"]);
        app.draw.start(app.roster.names(), Ticker::inert);
        handle_background_event(&mut app, AppEvent::Tick, &mut StdRng::seed_from_u64(0));
        assert_eq!(app.draw.displayed(), "A");
    }

    #[test]
    fn grouping_ready_applies_current_ticket_only() {
        let mut app = app_with(&["A", "B", "C"]);
        app.screen = Screen::Groups { scroll: 4 };
        let mut rng = StdRng::seed_from_u64(0);
        let stale = app
            .grouping
            .request(app.roster.names(), |_| Deferred::inert())
            .unwrap();
        let fresh = app
            .grouping
            .request(app.roster.names(), |_| Deferred::inert())
            .unwrap();

        handle_background_event(&mut app, AppEvent::GroupingReady { ticket: stale }, &mut rng);
        assert!(app.grouping.groups().is_empty());
        assert!(app.status.is_none());

        handle_background_event(&mut app, AppEvent::GroupingReady { ticket: fresh }, &mut rng);
        assert!(!app.grouping.groups().is_empty());
        assert_eq!(app.screen, Screen::Groups { scroll: 0 });
        assert!(app.status.is_some());
    }
}

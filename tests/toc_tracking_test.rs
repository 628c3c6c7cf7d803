use std::time::{Duration, Instant};

use tocspy::event_source::SimulatedEventSource;
use tocspy::main_app::{App, run_app_with_event_source};
use tocspy::preferences::Preferences;
use tocspy::test_utils::test_helpers::{
    TestScenarioBuilder, capture_terminal_state, create_test_app, create_test_terminal,
};

const TICK_SLACK: Duration = Duration::from_millis(300);

/// Force the next debounce boundary. `step` must increase within a test
/// so successive boundaries stay a full period apart.
fn force_tick(app: &mut App, step: u32) {
    app.on_tick(Instant::now() + TICK_SLACK * step);
}

#[test]
fn test_click_jump_highlights_clicked_section() {
    let mut terminal = create_test_terminal(80, 24);
    let mut app = create_test_app();
    terminal.draw(|f| app.render(f)).unwrap();

    assert!(app.is_tracking());
    assert_eq!(app.tocbar().label(), "User Guide");

    // Click the "Setup" row of the sidebar.
    app.handle_event(SimulatedEventSource::mouse_down(5, 5));
    force_tick(&mut app, 1);

    assert_eq!(app.tocbar().label(), "Setup");
    assert_eq!(app.navigation().active_index(), Some(1));

    terminal.draw(|f| app.render(f)).unwrap();
    let state = capture_terminal_state(&terminal);
    let bar_row = state.lines().nth(1).unwrap();
    assert!(bar_row.contains("Setup"), "bar should read Setup: {bar_row}");
}

#[test]
fn test_scrolling_back_to_top_restores_default_label() {
    let mut terminal = create_test_terminal(80, 24);
    let mut app = create_test_app();
    terminal.draw(|f| app.render(f)).unwrap();

    app.handle_event(SimulatedEventSource::mouse_down(5, 5));
    force_tick(&mut app, 1);
    assert_eq!(app.navigation().active_index(), Some(1));

    app.handle_event(SimulatedEventSource::char_key('g'));
    app.handle_event(SimulatedEventSource::char_key('g'));
    force_tick(&mut app, 2);

    assert_eq!(app.tocbar().label(), "User Guide");
    assert_eq!(app.navigation().active_index(), None);

    terminal.draw(|f| app.render(f)).unwrap();
    let state = capture_terminal_state(&terminal);
    assert!(state.lines().nth(1).unwrap().contains("User Guide"));
}

#[test]
fn test_wheel_scroll_drives_highlight() {
    let mut terminal = create_test_terminal(80, 24);
    let mut app = create_test_app();
    terminal.draw(|f| app.render(f)).unwrap();

    for _ in 0..7 {
        app.handle_event(SimulatedEventSource::mouse_scroll_down(50, 10));
    }
    assert_eq!(app.reader().scroll_offset(), 14);
    force_tick(&mut app, 1);

    assert_eq!(app.tocbar().label(), "Setup");
    assert_eq!(app.navigation().active_index(), Some(1));
}

#[test]
fn test_run_loop_scroll_then_tick() {
    let mut terminal = create_test_terminal(80, 24);
    let mut app = create_test_app();

    let mut event_source = TestScenarioBuilder::new().navigate_down(7).quit().build();
    run_app_with_event_source(&mut terminal, &mut app, &mut event_source).unwrap();

    assert!(app.should_quit());
    assert_eq!(app.reader().scroll_offset(), 14);

    // The loop exits before the debounce period has elapsed; the next due
    // boundary picks up the pending scroll activity.
    force_tick(&mut app, 1);
    assert_eq!(app.tocbar().label(), "Setup");
    assert_eq!(app.navigation().active_index(), Some(1));
}

#[test]
fn test_missing_target_click_is_inert() {
    let source = "\
# Broken

- [Nowhere](#missing)
- [Setup](#setup)

## Setup

Body.
";
    let mut terminal = create_test_terminal(80, 24);
    let mut app = App::new(source, Preferences::ephemeral());
    terminal.draw(|f| app.render(f)).unwrap();

    // First row points at an anchor that does not exist.
    app.handle_event(SimulatedEventSource::mouse_down(5, 4));
    assert_eq!(app.reader().scroll_offset(), 0);

    force_tick(&mut app, 1);
    assert_eq!(app.tocbar().label(), "Broken");
    assert_eq!(app.navigation().active_index(), None);
}

#[test]
fn test_tracking_survives_reflow() {
    // Narrow terminal: the reading pane is 8 columns wide, so every
    // paragraph wraps and the line layout bears no resemblance to the
    // 80 column one. The highlight must follow the reflowed geometry.
    let mut terminal = create_test_terminal(40, 24);
    let mut app = create_test_app();
    terminal.draw(|f| app.render(f)).unwrap();

    app.handle_event(SimulatedEventSource::mouse_down(5, 5));
    force_tick(&mut app, 1);

    assert_eq!(app.tocbar().label(), "Setup");
    assert_eq!(app.navigation().active_index(), Some(1));
}

#[test]
fn test_document_without_contents_list_still_tracks_bar() {
    let source = "\
# Plain

## Alpha

One paragraph of text.

Another paragraph here.

A third paragraph too.

## Beta

Beta text one.

Beta text two.

Beta text three.

Beta text four.

Beta text five.
";
    let mut terminal = create_test_terminal(80, 24);
    let mut app = App::new(source, Preferences::ephemeral());
    terminal.draw(|f| app.render(f)).unwrap();

    assert!(app.is_tracking());
    assert!(app.navigation().items().is_empty());

    app.handle_event(SimulatedEventSource::char_key('G'));
    force_tick(&mut app, 1);

    assert_eq!(app.tocbar().label(), "Alpha");
    assert_eq!(app.navigation().active_index(), None);
}

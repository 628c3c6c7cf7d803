pub mod test_helpers {
    use crate::event_source::{Event, KeyCode, KeyEvent, KeyModifiers, SimulatedEventSource};
    use crate::preferences::Preferences;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// A document with a contents list and enough body text that every
    /// section can be scrolled to on an 80x24 terminal.
    pub const SAMPLE_DOCUMENT: &str = "\
# User Guide

- [Intro](#intro)
- [Setup](#setup)
- [Usage](#usage)

## Intro

Intro history and goals.

What the project is for.

Who should read this.

## Setup

Install the binary first.

Then create a config file.

Run the doctor command.

## Usage

Open a document to read it.

Scroll with the keyboard.

Jump from the contents list.

Search is not available yet.

Watch the top bar follow you.
";

    /// Builder for creating test scenarios with simulated user input
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl Default for TestScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        /// Add a Ctrl+character key press
        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events.push(Event::Key(KeyEvent {
                code,
                modifiers: KeyModifiers::empty(),
                kind: crossterm::event::KeyEventKind::Press,
                state: crossterm::event::KeyEventState::empty(),
            }));
            self
        }

        /// Scroll down n lines (press 'j' n times)
        pub fn navigate_down(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::char_key('j'));
            }
            self
        }

        /// Scroll up n lines (press 'k' n times)
        pub fn navigate_up(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.events.push(SimulatedEventSource::char_key('k'));
            }
            self
        }

        /// Scroll half screen down (Ctrl+d)
        pub fn half_screen_down(mut self) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key('d'));
            self
        }

        /// Scroll half screen up (Ctrl+u)
        pub fn half_screen_up(mut self) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key('u'));
            self
        }

        pub fn wheel_down(mut self, column: u16, row: u16) -> Self {
            self.events
                .push(SimulatedEventSource::mouse_scroll_down(column, row));
            self
        }

        pub fn wheel_up(mut self, column: u16, row: u16) -> Self {
            self.events
                .push(SimulatedEventSource::mouse_scroll_up(column, row));
            self
        }

        /// Left click, e.g. on a contents row
        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events
                .push(SimulatedEventSource::mouse_down(column, row));
            self
        }

        /// Quit the application (press 'q')
        pub fn quit(mut self) -> Self {
            self.events.push(SimulatedEventSource::char_key('q'));
            self
        }

        /// Build the simulated event source
        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        // Hide cursor for test terminals to prevent it from appearing in captures
        terminal.hide_cursor().unwrap();
        terminal
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                let cell = buffer.cell((x, y)).unwrap();
                line.push_str(cell.symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }

    /// Create a test App over the sample document with default preferences
    pub fn create_test_app() -> crate::App {
        crate::App::new(SAMPLE_DOCUMENT, Preferences::ephemeral())
    }
}

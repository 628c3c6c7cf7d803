use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::debug;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{Frame, Terminal};

use crate::debounce::ScrollDebouncer;
use crate::geometry::ScreenGeometry;
use crate::inputs::{EventSource, KeySeq};
use crate::layout::RenderOptions;
use crate::parsing::{MarkdownParser, Outline, document_title};
use crate::preferences::Preferences;
use crate::theme::{Base16Palette, OCEANIC_NEXT};
use crate::tracker::TocTracker;
use crate::widget::{NavigationPanel, TOCBAR_HEIGHT, TextReader, TocBar};

/// The application: a reading pane, a contents sidebar, and a bar that
/// names the section currently under the bar's lower edge. Section
/// tracking runs only while the document actually has sections.
pub struct App {
    reader: TextReader,
    tocbar: TocBar,
    navigation: NavigationPanel,
    tracker: Option<TocTracker>,
    debouncer: ScrollDebouncer,
    key_seq: KeySeq,
    preferences: Preferences,
    title: String,
    should_quit: bool,
}

impl App {
    pub fn new(source: &str, preferences: Preferences) -> Self {
        let document = MarkdownParser::parse(source);
        let title = document_title(&document).unwrap_or_else(|| "tocspy".to_string());
        let outline = Outline::build(&document);
        let has_sections = outline.has_headings();

        let options = RenderOptions {
            width: 80,
            scroll_margin_top: preferences.scroll_margin_top,
        };
        let reader = TextReader::new(document, options, preferences.scroll_speed, &OCEANIC_NEXT);

        let Outline {
            headings,
            items,
            registry,
        } = outline;
        debug!(
            "Document: {} sections, {} contents rows",
            headings.len(),
            items.len()
        );

        let trackable = has_sections && reader.rendered().anchor_scroll_margin().is_some();
        if !trackable {
            debug!("No trackable sections, bar keeps its default label");
        }
        let tracker = trackable.then(|| TocTracker::new(headings, registry, title.clone()));

        Self {
            reader,
            tocbar: TocBar::new(title.clone()),
            navigation: NavigationPanel::new(items),
            tracker,
            debouncer: ScrollDebouncer::new(Instant::now()),
            key_seq: KeySeq::new(),
            preferences,
            title,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn reader(&self) -> &TextReader {
        &self.reader
    }

    pub fn tocbar(&self) -> &TocBar {
        &self.tocbar
    }

    pub fn navigation(&self) -> &NavigationPanel {
        &self.navigation
    }

    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.debouncer.until_next_tick(now)
    }

    pub fn render(&mut self, f: &mut Frame) {
        let palette: &Base16Palette = &OCEANIC_NEXT;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TOCBAR_HEIGHT), Constraint::Min(0)])
            .split(f.area());
        self.tocbar.render(f, rows[0], palette);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.preferences.sidebar_width),
                Constraint::Min(0),
            ])
            .split(rows[1]);
        self.navigation.render(f, body[0], false, palette);
        self.reader.render(f, body[1], true, palette, &self.title);
    }

    pub fn handle_event(&mut self, event: Event) {
        let offset_before = self.reader.scroll_offset();
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(_, _) => self.debouncer.notify(),
            _ => {}
        }
        if self.reader.scroll_offset() != offset_before {
            self.debouncer.notify();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code != KeyCode::Char('g') {
            self.key_seq.clear();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') => self.reader.scroll_half_screen_down(),
                KeyCode::Char('u') => self.reader.scroll_half_screen_up(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.reader.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.reader.scroll_up(),
            KeyCode::PageDown => self.reader.scroll_page_down(),
            KeyCode::PageUp => self.reader.scroll_page_up(),
            KeyCode::Char('G') | KeyCode::End => self.reader.scroll_to_bottom(),
            KeyCode::Home => self.reader.scroll_to_top(),
            KeyCode::Char('g') => {
                if self.key_seq.handle_key('g', Instant::now()) == "gg" {
                    self.reader.scroll_to_top();
                    self.key_seq.clear();
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.reader.scroll_down(),
            MouseEventKind::ScrollUp => self.reader.scroll_up(),
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) {
        let Some(index) = self.navigation.handle_mouse_click(column, row) else {
            return;
        };
        let Some(target) = self
            .navigation
            .item(index)
            .and_then(|item| item.target.clone())
        else {
            debug!("Contents row {index} has no target");
            return;
        };
        if self.reader.scroll_to_anchor(&target) {
            debug!("Jumped to {target:?}");
        }
    }

    /// Advance the debounce schedule; on a due boundary with scroll
    /// activity pending, re-read the geometry and move the highlight.
    pub fn on_tick(&mut self, now: Instant) {
        if self.debouncer.fire_due(now) {
            self.update_active_section();
        }
    }

    fn update_active_section(&mut self) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        let (Some(content_area), Some(bar_bottom)) =
            (self.reader.content_area(), self.tocbar.bottom())
        else {
            return;
        };
        let geometry = ScreenGeometry::new(
            self.reader.rendered(),
            self.reader.scroll_offset(),
            content_area,
        );
        let selection = tracker.recompute(&geometry, i32::from(bar_bottom));
        self.tocbar.set_label(selection.label);
        self.navigation.set_active(selection.active_item);
    }
}

/// The event loop. Input is drained in batches so a burst of scroll
/// events cannot outpace the render loop, and the poll timeout is tied
/// to the debounce schedule so due recomputations never wait on input.
pub fn run_app_with_event_source<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;

        let timeout = app.until_next_tick(Instant::now());
        if event_source.poll(timeout)? {
            loop {
                app.handle_event(event_source.read()?);
                if app.should_quit() || !event_source.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        app.on_tick(Instant::now());
    }
    Ok(())
}

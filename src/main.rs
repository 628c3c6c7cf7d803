use std::{env, fs, fs::File, io::stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{LevelFilter, WriteLogger};

// Use modules from the library crate
use tocspy::event_source::KeyboardEventSource;
use tocspy::main_app::{App, run_app_with_event_source};
use tocspy::panic_handler;
use tocspy::parsing::{MarkdownParser, Outline, document_title};
use tocspy::preferences::Preferences;

fn main() -> Result<()> {
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        File::create("tocspy.log")?,
    )?;

    let args: Vec<String> = env::args().skip(1).collect();
    if matches!(args.first().map(|s| s.as_str()), Some("--dump-outline")) {
        let path = args
            .get(1)
            .context("Usage: tocspy --dump-outline <path-to-markdown>")?;
        let result = run_outline_dump(path);
        if let Err(err) = &result {
            error!("Outline dump failed: {err:?}");
        }
        return result;
    }

    let mut config_path: Option<String> = None;
    let mut file_path: Option<String> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(
                    iter.next()
                        .context("--config requires a path argument")?
                        .clone(),
                );
            }
            _ => file_path = Some(arg.clone()),
        }
    }
    let file_path = file_path.context("Usage: tocspy [--config <path>] <file.md>")?;

    let source =
        fs::read_to_string(&file_path).with_context(|| format!("Failed to read {file_path}"))?;

    // Initialize panic handler only for interactive TUI mode
    panic_handler::initialize_panic_handler();

    info!("Starting tocspy for {file_path}");

    // Terminal initialization
    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {e}");
        anyhow::anyhow!(
            "Failed to initialize terminal: {e}\n\
             Make sure you are running tocspy in a terminal, not from a pipe or redirection."
        )
    })?;
    let mut stdout = stdout();

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
        error!("Failed to setup terminal: {e}");
        let _ = disable_raw_mode();
        anyhow::anyhow!(
            "Failed to setup terminal: {e}\n\
             Make sure you are running tocspy in a proper terminal environment."
        )
    })?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let preferences = Preferences::load_or_ephemeral(config_path.as_deref());
    let mut app = App::new(&source, preferences);
    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    // Restore terminal state
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down tocspy");
    Ok(())
}

fn run_outline_dump(path: &str) -> Result<()> {
    info!("Dumping outline for {path}");
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let document = MarkdownParser::parse(&source);
    let outline = Outline::build(&document);

    println!("Outline dump");
    println!("============");
    println!("Target: {path}");
    if let Some(title) = document_title(&document) {
        println!("Title: {title}");
    }

    println!("\nSections ({}):", outline.headings.len());
    for (index, marker) in outline.headings.iter().enumerate() {
        match &marker.id {
            Some(id) => println!("  [{index}] {} (#{id})", marker.title.plain_text()),
            None => println!("  [{index}] {} (no anchor)", marker.title.plain_text()),
        }
    }

    println!("\nContents rows ({}):", outline.items.len());
    for (index, item) in outline.items.iter().enumerate() {
        match &item.target {
            Some(target) => println!("  [{index}] {} -> #{target}", item.text),
            None => println!("  [{index}] {} (no target)", item.text),
        }
    }

    println!("\nMapped rows: {}", outline.registry.len());
    info!("Completed outline dump for {path}");
    Ok(())
}

mod config;
mod diff;
mod history;
mod search;
mod services;
mod ui;
mod utils;
mod workspace;

use std::env;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Settings;
use crate::services::loader::LoadKind;
use crate::services::server;
use crate::ui::app::{App, Screen};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("romdiff {} - Side-by-side comparison editor for ROM translation scripts", VERSION);
    println!();
    println!("USAGE:");
    println!("    romdiff [OPTIONS] [ORIGINAL_PATH] [TRANSLATED_PATH]");
    println!();
    println!("ARGS:");
    println!("    [ORIGINAL_PATH]         Directory (or file) of original scripts to load");
    println!("    [TRANSLATED_PATH]       Directory (or file) of translated scripts to load");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print help information");
    println!("    -v, --version           Print version information");
    println!("    --theme <NAME>          Start with the \"light\" or \"dark\" theme");
    println!("    --serve                 Start the local validation endpoint");
    println!("    --port <PORT>           Port for the validation endpoint (default: 5000)");
}

#[derive(Default)]
struct CliArgs {
    serve: bool,
    port: Option<u16>,
    theme: Option<String>,
    paths: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(None);
            }
            "-v" | "--version" => {
                println!("romdiff {}", VERSION);
                return Ok(None);
            }
            "--serve" => cli.serve = true,
            "--port" => {
                let value = iter.next().ok_or("--port requires a value")?;
                cli.port = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid port: {}", value))?,
                );
            }
            "--theme" => {
                let value = iter.next().ok_or("--theme requires a value")?;
                cli.theme = Some(value.clone());
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {}", other));
            }
            path => {
                if cli.paths.len() >= 2 {
                    return Err("at most two paths may be given".to_string());
                }
                cli.paths.push(path.to_string());
            }
        }
    }
    Ok(Some(cli))
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = std::fs::File::create(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => return Ok(()),
        Err(message) => {
            eprintln!("romdiff: {}", message);
            eprintln!("Try 'romdiff --help' for usage.");
            std::process::exit(2);
        }
    };

    init_logging();

    let mut settings = Settings::load();
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }
    if cli.serve {
        settings.server.enabled = true;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    let mut app = App::with_settings(settings);

    if app.settings.server.enabled {
        if let Err(e) = server::spawn(app.settings.server.port) {
            app.show_message(&format!("Validation endpoint failed: {}", e));
        }
    }
    if let Some(path) = cli.paths.first() {
        app.spawn_load(LoadKind::Original, path.into());
    }
    if let Some(path) = cli.paths.get(1) {
        app.spawn_load(LoadKind::Translated, path.into());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    let _ = app.settings.save();
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let poll_timeout = Duration::from_millis(100);
    loop {
        app.tick();
        terminal.draw(|frame| ui::draw::draw(frame, app))?;

        // Check for key events with timeout
        if event::poll(poll_timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Handle dialog input first
                    if app.dialog.is_some() {
                        ui::dialogs::handle_input(app, key.code, key.modifiers);
                        continue;
                    }
                    match app.current_screen {
                        Screen::Compare => {
                            if ui::compare_view::handle_input(app, key.code, key.modifiers) {
                                return Ok(());
                            }
                        }
                        Screen::FileList => {
                            ui::file_list::handle_input(app, key.code, key.modifiers);
                        }
                        Screen::History => {
                            ui::history_view::handle_input(app, key.code, key.modifiers);
                        }
                        Screen::SearchResults => {
                            ui::search_view::handle_input(app, key.code, key.modifiers);
                        }
                        Screen::Help => {
                            if ui::help::handle_input(app, key.code) {
                                app.current_screen = Screen::Compare;
                            }
                        }
                    }
                }
                Event::Paste(text) => {
                    if app.dialog.is_some() {
                        ui::dialogs::handle_paste(app, &text);
                    } else if app.current_screen == Screen::Compare {
                        ui::compare_view::handle_paste(app, &text);
                    }
                }
                _ => {}
            }
        }
    }
}

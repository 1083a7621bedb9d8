use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tcat::api::CatalogClient;
use tcat::app::App;
use tcat::config::Config;
use tcat::resource::ResourceKind;
use tcat::error::format_api_error;
use tcat::ui::splash::{render as render_splash, SplashState, StartupStep};
use tcat::{event, ui};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Terminal console for the product catalog API
#[derive(Parser, Debug)]
#[command(name = "tcat", version, about, long_about = None)]
struct Args {
    /// Catalog API base URL (overrides TCAT_API_URL and the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Table to open: category, product or color
    #[arg(short, long, value_parser = parse_resource)]
    resource: Option<ResourceKind>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block all write operations)
    #[arg(long)]
    readonly: bool,
}

fn parse_resource(value: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_key(value)
        .ok_or_else(|| format!("unknown resource '{}' (expected category, product or color)", value))
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tcat started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tcat").join("tcat.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tcat").join("tcat.log");
    }
    PathBuf::from("tcat.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new();

    splash.start(StartupStep::Config);
    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    let config = Config::load();
    let base_url = config.effective_base_url(args.base_url.as_deref());
    let timeout = config.effective_timeout(args.timeout);

    tracing::info!("Using catalog API: {} (timeout {:?})", base_url, timeout);

    splash.set_api_url(&base_url);
    splash.finish::<String>(StartupStep::Config, Ok(()));
    splash.start(StartupStep::Client);
    terminal.draw(|f| render_splash(f, &splash))?;

    if check_abort()? {
        return Ok(None);
    }

    let client = CatalogClient::new(&base_url, timeout)?;
    let start = args
        .resource
        .or_else(|| config.last_resource.as_deref().and_then(ResourceKind::from_key))
        .unwrap_or(ResourceKind::Category);
    let mut app = App::new(client, config, args.readonly);
    splash.finish::<String>(StartupStep::Client, Ok(()));

    // Categories and products always load: they feed the foreign-key checks
    // of the tables below them. Colors only when the console opens on them.
    let mut initial_error = None;
    for (step, kind) in [
        (StartupStep::Categories, ResourceKind::Category),
        (StartupStep::Products, ResourceKind::Product),
        (StartupStep::Colors, ResourceKind::Color),
    ] {
        if check_abort()? {
            return Ok(None);
        }
        if kind == ResourceKind::Color && start != ResourceKind::Color {
            splash.skip(step);
            continue;
        }

        splash.start(step);
        terminal.draw(|f| render_splash(f, &splash))?;

        let result = app.load(kind).await;
        let reason = result.as_ref().err().map(format_api_error);
        splash.finish(step, reason.as_ref().map_or(Ok(()), Err));
        if let Err(e) = result {
            initial_error.get_or_insert(e);
        }
    }
    app.current = start;

    terminal.draw(|f| render_splash(f, &splash))?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    if let Some(err) = initial_error {
        tracing::warn!("Initial load failed: {}", err);
        app.error_message = Some(format_api_error(&err));
    }

    Ok(Some(app))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        // Mutations run on their own tasks; apply whatever has finished
        app.poll_pending_operations();

        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }
    }
}

mod app;
mod router;
mod ui;

use std::env;
use std::error::Error;
use std::io;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use router::Route;
use shared::constants::{DEFAULT_BASE_URL, UI_TICK};
use shared::feed::bundled_junctions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let base_url = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--base-url="))
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string();

    let route = match args.iter().find_map(|arg| arg.strip_prefix("--route=")) {
        Some(path) => Route::parse(path).ok_or_else(|| format!("unknown route: {path}"))?,
        None => Route::Map,
    };

    let mut app = if args.contains(&"--static".to_string()) {
        info!("using the bundled junction dataset");
        App::with_dataset(bundled_junctions()?, route)
    } else {
        info!("polling {base_url} for live traffic data");
        App::live(reqwest::Client::new(), base_url, route)
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app).await;

    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_ui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        app.drain_feed();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(UI_TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

mod app;
mod dump;
mod ui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use special_chars_config::{Config, TabModeSetting};
use special_chars_engine::{RopeDocument, SpecialCharOptions, TabMode, TextSource};
use std::{
    fs::File,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
};

use crate::app::App;

#[derive(Debug, Parser)]
#[command(
    name = "special-chars",
    version,
    about = "View and edit a file with its invisible characters made visible"
)]
struct Cli {
    /// File to open
    file: PathBuf,

    /// Config file to use instead of ~/.config/special-chars/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the decorations found in the file and exit
    #[arg(long)]
    dump: bool,

    /// Start of the dumped range, in bytes
    #[arg(long, requires = "dump")]
    from: Option<usize>,

    /// End of the dumped range, in bytes
    #[arg(long, requires = "dump")]
    to: Option<usize>,

    /// Write viewer logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let options = engine_options(&config);

    let bytes =
        std::fs::read(&cli.file).with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let doc = RopeDocument::from_bytes(&bytes)
        .with_context(|| format!("{} is not valid UTF-8", cli.file.display()))?;

    if cli.dump {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .parse_default_env()
            .init();

        let text = doc.text();
        let to = dump::floor_boundary(&text, cli.to.unwrap_or(doc.len()));
        let from = dump::floor_boundary(&text, cli.from.unwrap_or(0)).min(to);
        return dump::dump(&doc, &options, from..to, &mut stdout().lock());
    }

    // The viewer owns the terminal, so logs only go to a file
    if let Some(log_path) = cli.log.as_ref().or(config.log_path.as_ref()) {
        init_file_logging(log_path)?;
    }
    log::info!("opening {}", cli.file.display());

    run_viewer(cli.file, doc, &options)
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => config,
            None => bail!("Config file {} does not exist", path.display()),
        },
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

/// Resolves the config for a terminal host, which cannot render tab stops
/// of a chosen size.
fn engine_options(config: &Config) -> SpecialCharOptions {
    let tab_mode = match config.tab_mode {
        TabModeSetting::Auto | TabModeSetting::Replace => TabMode::Replace,
        TabModeSetting::Native => TabMode::Native,
    };
    SpecialCharOptions {
        pattern: config.pattern.clone(),
        extra_pattern: config.extra_pattern.clone(),
        tab_mode,
        tab_size: config.tab_size,
        char_width: config.char_width,
        merge_gap: config.merge_gap,
    }
}

fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_viewer(path: PathBuf, doc: RopeDocument, options: &SpecialCharOptions) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = terminal
        .size()
        .map_err(anyhow::Error::from)
        .and_then(|size| {
            let height = size.height.saturating_sub(ui::CHROME_ROWS) as usize;
            App::new(path, doc, options, height)
        })
        .and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("viewer failed: {err:?}");
    }
    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_height(size.height.saturating_sub(ui::CHROME_ROWS) as usize)?;
        terminal.draw(|f| ui::ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('q') if ctrl => return Ok(()),
            KeyCode::Char('s') if ctrl => app.save()?,
            KeyCode::Char('j') if alt => app.scroll_by(1)?,
            KeyCode::Char('k') if alt => app.scroll_by(-1)?,
            KeyCode::Down => app.scroll_by(1)?,
            KeyCode::Up => app.scroll_by(-1)?,
            KeyCode::PageDown => app.page_down()?,
            KeyCode::PageUp => app.page_up()?,
            KeyCode::Left => app.caret_left()?,
            KeyCode::Right => app.caret_right()?,
            KeyCode::Backspace => app.backspace()?,
            KeyCode::Tab => app.insert("\t")?,
            KeyCode::Enter => app.insert("\n")?,
            KeyCode::Char(c) if !ctrl && !alt => app.insert(c.encode_utf8(&mut [0; 4]))?,
            _ => {}
        }
    }
}

//! listsync - terminal front end for remote-backed lists
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Stores (Tokio) - async HTTP execution against the REST API

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use listsync::app::{AppActor, Stores};
use listsync::config::Config;
use listsync::constants::{APP_NAME, APP_VERSION};
use listsync::input::ChannelInput;
use listsync::messages::render::PopupView;
use listsync::messages::ui_events::{key_to_ui_event, PopupKind};
use listsync::messages::{RenderState, UiEvent};
use listsync::models::ResourceKind;
use listsync::ui::{centered_rect, render_tabs, row_item, skeleton_rows};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version = APP_VERSION, about = "Browse and edit remote lists")]
struct Args {
    /// Config file (defaults to <config_dir>/listsync/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the REST API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Tab shown at startup: comments, posts, recipes or todos
    #[arg(long)]
    tab: Option<ResourceKind>,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(tab) = args.tab {
        config.initial_tab = tab;
    }
    config.validate()?;

    if args.init_config {
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    // Initialize logging to file
    let _log_guard = init_logging(&config.log_file);
    tracing::info!(
        base_url = %config.base_url,
        tab = %config.initial_tab,
        "Starting {} {}",
        APP_NAME,
        APP_VERSION
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();
    let (input, input_rx) = ChannelInput::channel();

    // Spawn app actor
    let stores = Stores::http(&config);
    let app_actor = AppActor::new(stores, input, config.initial_tab, render_tx);
    tokio::spawn(app_actor.run(ui_rx, input_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

fn init_logging(path: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(listsync::constants::DEFAULT_LOG_FILE));

    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) =
                    key_to_ui_event(key, current_state.popup_kind(), current_state.show_help)
                {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let error_height = if state.error.is_some() { 1 } else { 0 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Tab bar
            Constraint::Length(error_height), // Error line
            Constraint::Min(0),               // List
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    f.render_widget(render_tabs(state.active_tab, &state.busy_tabs), main_chunks[0]);

    if let Some(error) = &state.error {
        let line = Paragraph::new(format!(" {} (x to dismiss)", error))
            .style(Style::default().fg(Color::Red).bold());
        f.render_widget(line, main_chunks[1]);
    }

    draw_list(f, state, main_chunks[2]);
    draw_status_bar(f, state, main_chunks[3]);

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }

    if let Some(popup) = &state.popup {
        draw_input_popup(f, popup, area);
    }
}

fn draw_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", state.active_tab.title()));

    if state.is_loading {
        let list = List::new(skeleton_rows(area.width)).block(block);
        f.render_widget(list, area);
        return;
    }

    if state.rows.is_empty() {
        let empty = Paragraph::new(format!(" No {} yet. Press a to add one.", state.active_tab.plural()))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state.rows.iter().map(row_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = match state.popup_kind() {
        Some(PopupKind::Prompt) => " Enter:submit | Esc:cancel ".to_string(),
        Some(PopupKind::Confirm) => " y:yes | n:no ".to_string(),
        None => {
            let toggle = if state.active_tab == ResourceKind::Todos {
                " | space:toggle"
            } else {
                ""
            };
            format!(" a:add | e:edit | d:delete{} | r:reload | ?:help | q:quit ", toggle)
        }
    };

    let loaded = match state.last_loaded {
        _ if state.is_loading => " Loading... ".to_string(),
        Some(at) => format!(" loaded {} ", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
        None => String::new(),
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(loaded, Style::default().fg(Color::Yellow)),
    ]));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 LISTSYNC - Keyboard Shortcuts

 NAVIGATION
   1-4                Switch list
   Tab / Shift+Tab    Next / previous list
   ↑ / ↓  (k / j)     Move selection

 LIST
   a                  Add an item
   e / Enter          Edit selected item
   d / Delete         Delete selected item
   space / t          Toggle completed (todos)
   r                  Reload from server
   x                  Dismiss error

 POPUPS
   Enter              Submit / confirm
   Esc                Cancel
   y / n              Answer a confirmation

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_input_popup(f: &mut Frame, popup: &PopupView, area: Rect) {
    let popup_area = centered_rect(60, 20, area);

    let (title, body) = match popup.kind {
        PopupKind::Prompt => (
            " Enter to submit, Esc to cancel ",
            format!("{}\n\n> {}_", popup.message, popup.buffer),
        ),
        PopupKind::Confirm => (" y / n ", popup.message.clone()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title)
        .style(Style::default().bg(Color::Black));

    let input = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

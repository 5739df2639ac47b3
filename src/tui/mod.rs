mod browse;
mod detail;
mod format;
pub mod input;
mod layout;
mod options;
pub mod state;
mod theme;

use crate::catalog::CatalogClient;
use crate::config::Config;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use state::{App, AppEvent, AppMode};
use std::io;
use tokio::sync::mpsc;

pub async fn run(config: Config) -> Result<()> {
    let client = CatalogClient::new(&config)?;

    // 终端初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    let (tx, mut rx) = mpsc::channel::<AppEvent>(32);

    // 异步获取包总数和推荐包
    browse::spawn_initial_loads(&client, &tx);

    let result = event_loop(&mut terminal, &mut app, &client, &tx, &mut rx);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &CatalogClient,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // 处理按键
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        app.should_quit = true;
                    } else if app.dialog.open {
                        options::handle_dialog_key(key, app);
                    } else {
                        match app.mode {
                            AppMode::Browse => browse::handle_browse_key(key, app, client, tx),
                            AppMode::Detail => detail::handle_detail_key(key, app, tx),
                        }
                    }
                }
            }
        }

        // 处理异步事件
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    match app.mode {
        AppMode::Browse => browse::render_browse(f, app),
        AppMode::Detail => detail::render_detail(f, app),
    }
    if app.dialog.open {
        options::render_dialog(f, app);
    }
}

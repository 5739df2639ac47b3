use super::format::{group_thousands, time_ago};
use super::input;
use super::layout;
use super::state::{App, AppEvent, Focus};
use super::theme::{BLUE, BRIGHT_WHITE, DESC_DIM, DIM, GOLD, PINK, SEL_BG};
use crate::catalog::{CatalogClient, PackageRecord};
use crate::script::bare_install_command;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

const SEARCH_PLACEHOLDER: &str =
    "Search packages (e.g., 'Visual Studio Code', 'Chrome', 'Node.js')";

/// 每个包占 3 行（名称 + 描述 + 标签）
const ITEM_HEIGHT: usize = 3;

/// 处理浏览模式按键
pub fn handle_browse_key(
    key: KeyEvent,
    app: &mut App,
    client: &CatalogClient,
    tx: &mpsc::Sender<AppEvent>,
) {
    match app.browse.focus {
        Focus::Search => handle_search_key(key, app, client, tx),
        Focus::Results => handle_results_key(key, app, client, tx),
    }
}

/// 搜索框按键处理
fn handle_search_key(
    key: KeyEvent,
    app: &mut App,
    client: &CatalogClient,
    tx: &mpsc::Sender<AppEvent>,
) {
    match key.code {
        KeyCode::Enter => {
            spawn_search(app, client, tx);
        }
        KeyCode::Esc => {
            app.browse.input.clear();
        }
        KeyCode::Tab | KeyCode::Down => {
            if !app.visible_packages().is_empty() {
                app.browse.focus = Focus::Results;
            }
        }
        KeyCode::Char(c) => {
            // 忽略带 Ctrl/Alt 修饰的字符
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return;
            }
            app.browse.input.insert(c);
        }
        KeyCode::Backspace => app.browse.input.delete_back(),
        KeyCode::Delete => app.browse.input.delete_forward(),
        KeyCode::Left => app.browse.input.move_left(),
        KeyCode::Right => app.browse.input.move_right(),
        KeyCode::Home => app.browse.input.move_home(),
        KeyCode::End => app.browse.input.move_end(),
        _ => {}
    }
}

/// 结果列表按键处理
fn handle_results_key(
    key: KeyEvent,
    app: &mut App,
    client: &CatalogClient,
    tx: &mpsc::Sender<AppEvent>,
) {
    match key.code {
        KeyCode::Up => {
            if app.browse.selected == 0 {
                app.browse.focus = Focus::Search;
            } else {
                app.select_previous();
            }
        }
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => {
            for _ in 0..5 {
                app.select_previous();
            }
        }
        KeyCode::PageDown => {
            for _ in 0..5 {
                app.select_next();
            }
        }
        KeyCode::Tab | KeyCode::Esc | KeyCode::Char('/') => {
            app.browse.focus = Focus::Search;
        }
        KeyCode::Char(' ') => {
            app.toggle_highlighted();
        }
        KeyCode::Enter => {
            if let Some(id) = app.highlighted_package().map(|p| p.id.clone()) {
                app.open_detail(&id);
                super::detail::spawn_detail_fetch(&id, client, tx);
            }
        }
        KeyCode::Char('c') => {
            if let Some(id) = app.highlighted_package().map(|p| p.id.clone()) {
                layout::spawn_copy(bare_install_command(&id), tx);
            }
        }
        KeyCode::Char('d') => {
            app.open_dialog();
        }
        KeyCode::Char('x') => {
            app.selection.clear();
            app.status_message = Some("✓ Selection cleared".to_string());
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        _ => {}
    }
}

/// 发起异步搜索，结果通过事件通道回传
pub fn spawn_search(app: &mut App, client: &CatalogClient, tx: &mpsc::Sender<AppEvent>) {
    let Some((seq, query)) = app.begin_search() else {
        return;
    };

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match client.search(&query).await {
            Ok(packages) => AppEvent::SearchResults {
                seq,
                query,
                packages,
            },
            Err(e) => {
                log::warn!("搜索 \"{}\" 失败: {}", query, e);
                AppEvent::SearchFailed {
                    seq,
                    error: e.to_string(),
                }
            }
        };
        let _ = tx.send(event).await;
    });
}

/// 启动时加载包总数与推荐包
pub fn spawn_initial_loads(client: &CatalogClient, tx: &mpsc::Sender<AppEvent>) {
    let (client_count, tx_count) = (client.clone(), tx.clone());
    tokio::spawn(async move {
        let event = match client_count.get_total_count().await {
            Ok(total) => AppEvent::TotalCountLoaded(total),
            Err(e) => {
                log::warn!("获取包总数失败: {}", e);
                AppEvent::Error(format!("Could not load package count: {}", e))
            }
        };
        let _ = tx_count.send(event).await;
    });

    let (client_featured, tx_featured) = (client.clone(), tx.clone());
    tokio::spawn(async move {
        let event = match client_featured.get_featured().await {
            Ok(packages) => AppEvent::FeaturedLoaded(packages),
            Err(e) => {
                log::warn!("获取推荐包失败: {}", e);
                AppEvent::Error(format!("Could not load featured packages: {}", e))
            }
        };
        let _ = tx_featured.send(event).await;
    });
}

// ===== 渲染 =====

pub fn render_browse(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // 搜索框
            Constraint::Min(0),    // 结果列表
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    let total = app
        .total_packages
        .map(group_thousands)
        .unwrap_or_else(|| "…".to_string());
    let mut title = format!("📦 Winget Store · {} packages available", total);
    if !app.selection.is_empty() {
        title.push_str(&format!(" · Download Script ({})", app.selection.count()));
    }
    layout::render_header(f, &title, chunks[0]);

    input::render_input_box(
        f,
        &app.browse.input,
        "🔍",
        SEARCH_PLACEHOLDER,
        app.browse.focus == Focus::Search,
        chunks[1],
    );

    render_package_list(f, app, chunks[2]);

    let footer_text = match (app.browse.focus, app.browse.searching) {
        (_, true) => "Searching... | Ctrl+C quit",
        (Focus::Search, false) => "Enter search | Tab/↓ results | Esc clear | Ctrl+C quit",
        (Focus::Results, false) => {
            "↑↓ move | Space select | x clear | Enter details | c copy | d download script | Tab search | q quit"
        }
    };
    layout::render_footer(f, footer_text, app.status_message.as_deref(), chunks[3]);
}

fn render_package_list(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.browse.focus == Focus::Results;
    let title = match &app.browse.query {
        Some(query) => format!(" Results for \"{}\" ({}) ", query, app.browse.results.len()),
        None => " ✨ Featured Packages ".to_string(),
    };
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let packages = app.visible_packages();
    if packages.is_empty() {
        let hint = if app.browse.searching {
            "Searching..."
        } else if app.browse.query.is_some() {
            "No packages found"
        } else {
            "Search for Windows packages to get started"
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))),
            padded,
        );
        return;
    }

    let visible_items = (padded.height as usize) / ITEM_HEIGHT;
    let scroll = layout::scroll_for(app.browse.selected, visible_items);
    let now = Utc::now();

    let mut lines: Vec<Line> = Vec::new();
    for (i, pkg) in packages.iter().enumerate().skip(scroll).take(visible_items) {
        let is_cursor = focused && i == app.browse.selected;
        let checked = app.selection.contains(&pkg.id);
        lines.extend(package_lines(pkg, is_cursor, checked, now));
    }

    f.render_widget(Paragraph::new(lines), padded);

    if packages.len() > visible_items {
        layout::render_scrollbar(f, packages.len(), scroll, area);
    }
}

/// 单个包的三行展示
fn package_lines(
    pkg: &PackageRecord,
    is_cursor: bool,
    checked: bool,
    now: chrono::DateTime<Utc>,
) -> Vec<Line<'static>> {
    let base = if is_cursor {
        Style::default().bg(SEL_BG)
    } else {
        Style::default()
    };
    let marker = if is_cursor { "► " } else { "  " };
    let checkbox = if checked { "[✓] " } else { "[ ] " };
    let checkbox_color = if checked { BLUE } else { DIM };
    let name_style = if is_cursor {
        base.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)
    } else {
        base.fg(BLUE)
    };

    let mut first = vec![
        Span::styled(marker, base.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)),
        Span::styled(checkbox, base.fg(checkbox_color).add_modifier(Modifier::BOLD)),
        Span::styled(pkg.name().to_string(), name_style),
        Span::styled(format!("  {}", pkg.id), base.fg(PINK)),
        Span::styled(format!(" · {}", pkg.publisher()), base.fg(DIM)),
    ];
    if let Some(version) = pkg.latest_version() {
        first.push(Span::styled(format!(" v{}", version), base.fg(Color::White)));
    }
    if pkg.featured {
        first.push(Span::styled(" ★", base.fg(GOLD)));
    }

    let desc_color = if is_cursor { DESC_DIM } else { Color::DarkGray };
    let second = Line::from(Span::styled(
        format!("      {}", pkg.description_or_default()),
        base.fg(desc_color),
    ));

    let mut third = vec![Span::styled("      ", base)];
    for tag in pkg.latest.tags.iter().take(3) {
        third.push(Span::styled(format!("#{} ", tag), base.fg(GOLD)));
    }
    if let Some(updated) = pkg.updated_at {
        third.push(Span::styled(
            format!("updated {}", time_ago(updated, now)),
            base.fg(DIM),
        ));
    }

    vec![Line::from(first), second, Line::from(third)]
}

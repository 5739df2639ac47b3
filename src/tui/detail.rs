use super::format::{short_date, time_ago};
use super::layout;
use super::state::{App, AppEvent, DetailStatus};
use super::theme::{BLUE, BRIGHT_WHITE, DIM, GOLD, PINK, SEL_BG};
use crate::catalog::{CatalogClient, PackageRecord};
use crate::script::pinned_install_command;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

/// 异步加载包详情
pub fn spawn_detail_fetch(id: &str, client: &CatalogClient, tx: &mpsc::Sender<AppEvent>) {
    let id = id.to_string();
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match client.get_by_id(&id).await {
            Ok(package) => AppEvent::DetailLoaded { id, package },
            Err(e) => {
                log::warn!("获取包详情 {} 失败: {}", id, e);
                AppEvent::DetailFailed {
                    id,
                    error: e.to_string(),
                }
            }
        };
        let _ = tx.send(event).await;
    });
}

/// 处理详情页按键
pub fn handle_detail_key(key: KeyEvent, app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    let version_count = app
        .detail
        .package()
        .map(|p| p.versions.len())
        .unwrap_or(0);

    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
            app.close_detail();
        }
        KeyCode::Up => {
            app.detail.selected_version = app.detail.selected_version.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.detail.selected_version + 1 < version_count {
                app.detail.selected_version += 1;
            }
        }
        KeyCode::Home => app.detail.selected_version = 0,
        KeyCode::End => app.detail.selected_version = version_count.saturating_sub(1),
        KeyCode::Char('c') | KeyCode::Enter => {
            if let Some(cmd) = selected_version_command(app) {
                layout::spawn_copy(cmd, tx);
            }
        }
        KeyCode::Char(' ') => {
            if app.detail.package().is_some() {
                let id = app.detail.id.clone();
                app.selection.toggle(&id);
            }
        }
        KeyCode::Char('d') => {
            app.open_dialog();
        }
        _ => {}
    }
}

/// 当前光标版本的安装命令
pub fn selected_version_command(app: &App) -> Option<String> {
    let pkg = app.detail.package()?;
    let version = pkg.versions.get(app.detail.selected_version)?;
    Some(pinned_install_command(&pkg.id, version))
}

// ===== 渲染 =====

pub fn render_detail(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    match &app.detail.status {
        DetailStatus::Loading => {
            layout::render_header(f, &format!("📦 {}", app.detail.id), chunks[0]);
            render_centered_message(f, &["Loading package..."], Color::DarkGray, chunks[1]);
            layout::render_footer(f, "Esc back", app.status_message.as_deref(), chunks[2]);
        }
        DetailStatus::NotFound => {
            layout::render_header(f, &format!("📦 {}", app.detail.id), chunks[0]);
            render_centered_message(
                f,
                &["Package not found", "", "Press Esc to return to packages"],
                Color::Gray,
                chunks[1],
            );
            layout::render_footer(
                f,
                "Esc return to packages",
                app.status_message.as_deref(),
                chunks[2],
            );
        }
        DetailStatus::Loaded(pkg) => {
            layout::render_header(f, &format!("📦 {} · {}", pkg.name(), pkg.publisher()), chunks[0]);

            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_info_panel(f, app, pkg, panels[0]);
            render_versions_panel(f, app, pkg, panels[1]);

            layout::render_footer(
                f,
                "↑↓ version | c copy install command | Space select | d download script | Esc back",
                app.status_message.as_deref(),
                chunks[2],
            );
        }
    }
}

fn render_centered_message(f: &mut Frame, messages: &[&str], color: Color, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let top_pad = (inner.height as usize).saturating_sub(messages.len()) / 2;
    let mut lines: Vec<Line> = vec![Line::from(""); top_pad];
    for msg in messages {
        lines.push(Line::from(Span::styled(
            msg.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// 左侧：基本信息、描述、许可证
fn render_info_panel(f: &mut Frame, app: &App, pkg: &PackageRecord, area: Rect) {
    let block = Block::default()
        .title(" About ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    f.render_widget(
        Paragraph::new(info_lines(app, pkg)).wrap(Wrap { trim: false }),
        padded,
    );
}

fn info_lines(app: &App, pkg: &PackageRecord) -> Vec<Line<'static>> {
    let mut fields: Vec<(&str, String)> = vec![
        ("Id", pkg.id.clone()),
        ("Publisher", pkg.publisher().to_string()),
    ];
    if let Some(homepage) = &pkg.latest.homepage {
        fields.push(("Homepage", homepage.clone()));
    }
    if let Some(updated) = pkg.updated_at {
        fields.push((
            "Updated",
            format!("{} ({})", short_date(updated), time_ago(updated, Utc::now())),
        ));
    }
    if let Some(created) = pkg.created_at {
        fields.push(("Created", short_date(created)));
    }
    fields.push((
        "Selected",
        if app.selection.contains(&pkg.id) { "yes" } else { "no" }.to_string(),
    ));

    let mut lines: Vec<Line> = Vec::new();
    for (key, value) in fields {
        lines.push(field_line(key, value));
    }

    if !pkg.latest.tags.is_empty() {
        let mut spans = vec![Span::styled(
            pad_key("Tags"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        for tag in &pkg.latest.tags {
            spans.push(Span::styled(format!("#{} ", tag), Style::default().fg(GOLD)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(section_title("About"));
    lines.push(Line::from(Span::styled(
        pkg.description_or_default().to_string(),
        Style::default().fg(Color::White),
    )));

    lines.push(Line::from(""));
    lines.push(section_title("Latest Version"));
    match pkg.latest_version() {
        Some(version) => {
            lines.push(Line::from(Span::styled(
                format!("v{}", version),
                Style::default().fg(BLUE).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                pinned_install_command(&pkg.id, version),
                Style::default().fg(Color::Gray),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No versions published",
                Style::default().fg(DIM),
            )));
        }
    }

    if pkg.has_license_info() {
        lines.push(Line::from(""));
        lines.push(section_title("License"));
        if let Some(license) = &pkg.latest.license {
            lines.push(field_line("License", license.clone()));
        }
        if let Some(url) = &pkg.latest.license_url {
            lines.push(field_line("Details", url.clone()));
        }
    }

    lines
}

fn pad_key(key: &str) -> String {
    let width = UnicodeWidthStr::width(key);
    format!("{}{} ", key, " ".repeat(12usize.saturating_sub(width)))
}

fn field_line(key: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            pad_key(key),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("──── {} ────", title),
        Style::default().fg(PINK).add_modifier(Modifier::BOLD),
    ))
}

/// 右侧：全部版本列表
fn render_versions_panel(f: &mut Frame, app: &App, pkg: &PackageRecord, area: Rect) {
    let block = Block::default()
        .title(format!(" All Versions ({}) ", pkg.versions.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    if pkg.versions.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No versions", Style::default().fg(Color::DarkGray))),
            padded,
        );
        return;
    }

    let visible = padded.height as usize;
    let scroll = layout::scroll_for(app.detail.selected_version, visible);

    let lines: Vec<Line> = pkg
        .versions
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(i, version)| {
            let latest = if i == 0 { "  (latest)" } else { "" };
            if i == app.detail.selected_version {
                let bg = Style::default().bg(SEL_BG);
                Line::from(vec![
                    Span::styled("► ", bg.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)),
                    Span::styled(version.clone(), bg.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)),
                    Span::styled(latest, bg.fg(BLUE)),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(version.clone(), Style::default().fg(Color::White)),
                    Span::styled(latest, Style::default().fg(DIM)),
                ])
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines), padded);

    if pkg.versions.len() > visible {
        layout::render_scrollbar(f, pkg.versions.len(), scroll, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;

    fn loaded_app(versions: &[&str]) -> App {
        let json = serde_json::json!({
            "Id": "Git.Git",
            "Versions": versions,
            "Latest": { "Name": "Git", "Publisher": "The Git Development Community" }
        });
        let pkg: PackageRecord = serde_json::from_value(json).unwrap();
        let mut app = App::new(Config::default());
        app.open_detail("Git.Git");
        app.handle_event(AppEvent::DetailLoaded {
            id: "Git.Git".to_string(),
            package: Some(pkg),
        });
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        let (tx, _rx) = mpsc::channel(8);
        handle_detail_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
    }

    #[test]
    fn version_cursor_stays_in_bounds() {
        let mut app = loaded_app(&["2.45.1", "2.45.0", "2.44.0"]);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.detail.selected_version, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.detail.selected_version, 2);
        assert_eq!(
            selected_version_command(&app).as_deref(),
            Some("winget install -e --id Git.Git -v 2.44.0")
        );
    }

    #[test]
    fn space_toggles_selection_of_shown_package() {
        let mut app = loaded_app(&["1.0"]);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.selection.contains("Git.Git"));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.selection.is_empty());
    }

    #[test]
    fn no_versions_means_no_command() {
        let app = loaded_app(&[]);
        assert!(selected_version_command(&app).is_none());
    }

    #[test]
    fn info_lines_use_placeholder_and_skip_license() {
        let app = loaded_app(&["1.0"]);
        let pkg = app.detail.package().unwrap();
        let text: Vec<String> = info_lines(&app, pkg)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l == "No description available"));
        assert!(!text.iter().any(|l| l.contains("License")));
        assert!(!text.iter().any(|l| l.starts_with("Homepage")));
    }

    #[test]
    fn escape_returns_to_browse() {
        let mut app = loaded_app(&["1.0"]);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, super::super::state::AppMode::Browse);
    }
}

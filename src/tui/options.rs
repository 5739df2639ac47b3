use super::layout;
use super::state::{App, DialogItem};
use super::theme::{BLUE, BRIGHT_WHITE, DIM, PINK, SEL_BG};
use crate::export::ScriptSaver;
use crate::script::ScriptType;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Margin,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// 处理安装选项弹窗按键
pub fn handle_dialog_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Up => app.dialog_previous(),
        KeyCode::Down | KeyCode::Tab => app.dialog_next(),
        KeyCode::Left | KeyCode::Right => {
            if app.dialog.current_item() == DialogItem::ScriptType {
                app.toggle_dialog_item();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => match app.dialog.current_item() {
            DialogItem::Generate => export_script(app),
            DialogItem::Cancel => app.close_dialog(),
            _ => app.toggle_dialog_item(),
        },
        KeyCode::Char('g') => export_script(app),
        KeyCode::Char('s') => save_as_default(app),
        _ => {}
    }
}

/// 生成脚本并写入导出目录，随后关闭弹窗
pub fn export_script(app: &mut App) {
    let Some(script) = app.generate_script() else {
        app.close_dialog();
        return;
    };

    let saver = ScriptSaver::new(app.config.export_dir.clone());
    app.status_message = Some(match saver.save(&script) {
        Ok(path) => format!("✓ Script saved to {}", path.display()),
        Err(e) => {
            log::warn!("保存脚本失败: {:#}", e);
            format!("✗ Failed to save script: {:#}", e)
        }
    });
    app.close_dialog();
}

/// 把当前选项写回配置文件作为默认值
fn save_as_default(app: &mut App) {
    app.config.install = app.options;
    app.status_message = Some(match app.config.save() {
        Ok(()) => "✓ Saved as default options".to_string(),
        Err(e) => format!("✗ Failed to save config: {}", e),
    });
}

// ===== 渲染 =====

pub fn render_dialog(f: &mut Frame, app: &App) {
    let area = layout::centered_rect(72, 17, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Installation Options ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        "── Script Type ──",
        Style::default().fg(PINK).add_modifier(Modifier::BOLD),
    )));

    let selected = app.dialog.current_item();
    let script_type = app.options.script_type;
    let mut type_spans = vec![cursor_span(selected == DialogItem::ScriptType)];
    for candidate in [ScriptType::Batch, ScriptType::Shell] {
        let style = if candidate == script_type {
            Style::default().fg(BLUE).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(DIM)
        };
        type_spans.push(Span::styled(format!(" {} ", candidate.label()), style));
        type_spans.push(Span::raw("  "));
    }
    lines.push(Line::from(type_spans));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "── Additional Options ──",
        Style::default().fg(PINK).add_modifier(Modifier::BOLD),
    )));
    let toggles = [
        (DialogItem::Force, app.options.force, "Force install (--force)"),
        (
            DialogItem::AcceptLicense,
            app.options.accept_license,
            "Accept license (--accept-package-agreements --accept-source-agreements)",
        ),
        (DialogItem::Interactive, app.options.interactive, "Interactive mode (-i)"),
    ];
    for (item, value, label) in toggles {
        lines.push(toggle_line(label, value, selected == item));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("Packages: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}", app.selection.count()),
            Style::default().fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  →  ", Style::default().fg(DIM)),
        Span::styled(
            app.config.export_dir.join(script_type.file_name()).display().to_string(),
            Style::default().fg(Color::White),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        cursor_span(selected == DialogItem::Generate),
        button_span("Generate Script", selected == DialogItem::Generate, Color::Green),
        Span::raw("    "),
        cursor_span(selected == DialogItem::Cancel),
        button_span("Cancel", selected == DialogItem::Cancel, Color::Gray),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑↓ select | Space/Enter toggle | g generate | s save as default | Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), padded);
}

fn cursor_span(active: bool) -> Span<'static> {
    if active {
        Span::styled("► ", Style::default().fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("  ")
    }
}

fn toggle_line(label: &'static str, value: bool, active: bool) -> Line<'static> {
    let checkbox = if value { "[✓]" } else { "[ ]" };
    let checkbox_color = if value { BLUE } else { DIM };
    let base = if active {
        Style::default().bg(SEL_BG)
    } else {
        Style::default()
    };
    let label_style = if active {
        base.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)
    } else {
        base.fg(Color::White)
    };
    Line::from(vec![
        cursor_span(active),
        Span::styled(format!("{} ", checkbox), base.fg(checkbox_color).add_modifier(Modifier::BOLD)),
        Span::styled(label, label_style),
    ])
}

fn button_span(label: &'static str, active: bool, color: Color) -> Span<'static> {
    let style = if active {
        Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    Span::styled(format!("[ {} ]", label), style)
}

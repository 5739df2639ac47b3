use super::state::AppEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use tokio::sync::mpsc;

/// 标准三段式布局：Header(3) + Content(弹性) + Footer(3)
pub fn main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

/// 渲染通用 header
pub fn render_header(f: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// 渲染 footer；有状态消息时显示在快捷键提示之前
///
/// 消息以 ✓ 开头显示为绿色，其余为红色。
pub fn render_footer(f: &mut Frame, text: &str, status: Option<&str>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let line = match status {
        Some(msg) => {
            let color = if msg.starts_with('✓') {
                Color::Green
            } else {
                Color::Red
            };
            Line::from(vec![
                Span::styled(format!("{} | ", msg), Style::default().fg(color)),
                Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)),
            ])
        }
        None => Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Green))),
    };
    f.render_widget(Paragraph::new(line), padded);
}

/// 居中的弹出区域
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// 列表滚动偏移，保证光标项可见
pub fn scroll_for(selected: usize, visible_items: usize) -> usize {
    if visible_items > 0 && selected >= visible_items {
        selected - visible_items + 1
    } else {
        0
    }
}

/// 在区域右侧渲染纵向滚动条
pub fn render_scrollbar(f: &mut Frame, total: usize, position: usize, area: Rect) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut state = ScrollbarState::new(total).position(position);
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            horizontal: 0,
            vertical: 1,
        }),
        &mut state,
    );
}

/// 在阻塞线程池中复制，结果以 `AppEvent::Copied` 回传
pub fn spawn_copy(text: String, tx: &mpsc::Sender<AppEvent>) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let payload = text.clone();
        let ok = tokio::task::spawn_blocking(move || copy_to_clipboard(&payload))
            .await
            .unwrap_or(false);
        let _ = tx.send(AppEvent::Copied { text, ok }).await;
    });
}

/// 将文本复制到系统剪贴板
///
/// 依次尝试 clip（Windows）、pbcopy、wl-copy、xclip、xsel，返回是否成功。
pub fn copy_to_clipboard(text: &str) -> bool {
    let candidates: &[(&str, &[&str])] = &[
        ("clip", &[]),
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
    ];
    for (program, args) in candidates {
        let result = duct::cmd(*program, args.iter().copied())
            .stdin_bytes(text.as_bytes())
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
        if matches!(result, Ok(output) if output.status.success()) {
            log::debug!("已通过 {} 复制到剪贴板", program);
            return true;
        }
    }
    false
}

//! 全局主题色

use ratatui::style::Color;

/// 包 ID
pub const PINK: Color = Color::Rgb(245, 169, 184);
/// 强调色（已选中、版本号）
pub const BLUE: Color = Color::Rgb(91, 206, 250);
/// 光标行背景色
pub const SEL_BG: Color = Color::Rgb(32, 40, 62);
pub const BRIGHT_WHITE: Color = Color::Rgb(255, 255, 255);
/// 次要信息
pub const DIM: Color = Color::Rgb(130, 130, 140);
/// 光标行内的描述文字
pub const DESC_DIM: Color = Color::Rgb(180, 180, 190);
/// 推荐、标签
pub const GOLD: Color = Color::Rgb(250, 204, 21);

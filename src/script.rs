//! 安装脚本生成：把选中的包 ID 渲染为 .bat 或 .ps1 脚本文本
//!
//! 这里只做纯字符串拼接，不碰文件系统，保存由 `export` 模块负责。

use serde::{Deserialize, Serialize};

/// 包管理器命令前缀
const INSTALL_PREFIX: &str = "winget install -e --id";

/// 脚本方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    #[default]
    #[serde(alias = "bat")]
    Batch,
    #[serde(alias = "ps1", alias = "powershell")]
    Shell,
}

impl ScriptType {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ScriptType::Batch => "bat",
            ScriptType::Shell => "ps1",
        }
    }

    /// 建议的下载文件名
    pub fn file_name(self) -> String {
        format!("install-packages.{}", self.extension())
    }

    pub fn label(self) -> &'static str {
        match self {
            ScriptType::Batch => "Batch Script (.bat)",
            ScriptType::Shell => "PowerShell (.ps1)",
        }
    }

    /// 在两种方言之间切换
    pub fn toggled(self) -> Self {
        match self {
            ScriptType::Batch => ScriptType::Shell,
            ScriptType::Shell => ScriptType::Batch,
        }
    }
}

/// 安装选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallOptions {
    pub script_type: ScriptType,
    pub force: bool,
    pub accept_license: bool,
    pub interactive: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            script_type: ScriptType::Batch,
            force: false,
            accept_license: true,
            interactive: false,
        }
    }
}

impl InstallOptions {
    /// 按固定顺序拼出附加参数：--force, 协议接受, -i
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.force {
            flags.push("--force");
        }
        if self.accept_license {
            flags.push("--accept-package-agreements --accept-source-agreements");
        }
        if self.interactive {
            flags.push("-i");
        }
        flags
    }
}

/// 生成好的脚本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub file_name: String,
    pub content: String,
}

/// 不带任何附加参数的安装命令
pub fn bare_install_command(id: &str) -> String {
    format!("{INSTALL_PREFIX} {id}")
}

/// 单个包的安装命令
///
/// ID 原样嵌入，不做任何转义。
pub fn install_command(id: &str, options: &InstallOptions) -> String {
    let flags = options.flags();
    if flags.is_empty() {
        bare_install_command(id)
    } else {
        format!("{} {}", bare_install_command(id), flags.join(" "))
    }
}

/// 指定版本的安装命令（详情页复制用）
pub fn pinned_install_command(id: &str, version: &str) -> String {
    format!("{INSTALL_PREFIX} {id} -v {version}")
}

/// 生成完整脚本
pub fn generate_script<S: AsRef<str>>(ids: &[S], options: &InstallOptions) -> GeneratedScript {
    let commands: Vec<String> = ids
        .iter()
        .map(|id| install_command(id.as_ref(), options))
        .collect();

    let lines = match options.script_type {
        ScriptType::Batch => batch_lines(&commands),
        ScriptType::Shell => shell_lines(&commands),
    };

    GeneratedScript {
        file_name: options.script_type.file_name(),
        content: lines.join("\n"),
    }
}

fn batch_lines(commands: &[String]) -> Vec<String> {
    let mut lines = vec![
        "@echo off".to_string(),
        format!("echo Installing {} package(s)...", commands.len()),
        "echo.".to_string(),
    ];
    for (i, cmd) in commands.iter().enumerate() {
        if i > 0 {
            lines.push("echo.".to_string());
        }
        lines.push(cmd.clone());
    }
    if !commands.is_empty() {
        lines.push("echo.".to_string());
    }
    lines.push("echo Installation complete!".to_string());
    lines.push("pause".to_string());
    lines
}

fn shell_lines(commands: &[String]) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Write-Host \"Installing {} package(s)...\" -ForegroundColor Cyan",
            commands.len()
        ),
        "Write-Host \"\"".to_string(),
    ];
    for (i, cmd) in commands.iter().enumerate() {
        if i > 0 {
            lines.push("Write-Host \"\"".to_string());
        }
        lines.push(format!("Write-Host \"> {cmd}\" -ForegroundColor Gray"));
        lines.push(cmd.clone());
    }
    if !commands.is_empty() {
        lines.push("Write-Host \"\"".to_string());
    }
    lines.push("Write-Host \"Installation complete!\" -ForegroundColor Green".to_string());
    lines.push("pause".to_string());
    lines
}

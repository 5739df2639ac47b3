use crate::script::GeneratedScript;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// 把生成的脚本写入导出目录
pub struct ScriptSaver {
    base_dir: PathBuf,
}

impl ScriptSaver {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// 写入 `<base_dir>/<file_name>`，已存在则覆盖
    pub fn save(&self, script: &GeneratedScript) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("无法创建目录 {}", self.base_dir.display()))?;

        let filepath = self.base_dir.join(&script.file_name);
        fs::write(&filepath, &script.content)
            .with_context(|| format!("无法写入 {}", filepath.display()))?;

        log::info!("脚本已保存: {}", filepath.display());
        Ok(filepath)
    }
}

use super::input::InputBox;
use crate::catalog::PackageRecord;
use crate::config::Config;
use crate::script::{generate_script, GeneratedScript, InstallOptions};
use crate::selection::SelectionSet;

// ========== 枚举 ==========

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Browse,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Search,
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Loading,
    Loaded(Box<PackageRecord>),
    NotFound,
}

/// 安装选项弹窗中的条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialogItem {
    ScriptType,
    Force,
    AcceptLicense,
    Interactive,
    Generate,
    Cancel,
}

impl DialogItem {
    pub const ALL: [DialogItem; 6] = [
        DialogItem::ScriptType,
        DialogItem::Force,
        DialogItem::AcceptLicense,
        DialogItem::Interactive,
        DialogItem::Generate,
        DialogItem::Cancel,
    ];
}

// ========== 事件 ==========

#[derive(Debug)]
pub enum AppEvent {
    TotalCountLoaded(u64),
    FeaturedLoaded(Vec<PackageRecord>),
    SearchResults {
        seq: u64,
        query: String,
        packages: Vec<PackageRecord>,
    },
    SearchFailed {
        seq: u64,
        error: String,
    },
    DetailLoaded {
        id: String,
        package: Option<PackageRecord>,
    },
    DetailFailed {
        id: String,
        error: String,
    },
    Copied {
        text: String,
        ok: bool,
    },
    Error(String),
}

// ========== 子状态结构体 ==========

pub struct BrowseState {
    pub input: InputBox,
    pub focus: Focus,
    /// 最近一次成功搜索的关键词；None 时展示推荐包
    pub query: Option<String>,
    pub results: Vec<PackageRecord>,
    pub selected: usize,
    pub searching: bool,
    pub search_seq: u64,
}

pub struct DetailState {
    pub id: String,
    pub status: DetailStatus,
    pub selected_version: usize,
}

pub struct OptionsDialogState {
    pub open: bool,
    pub selected: usize,
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            input: InputBox::new(),
            focus: Focus::Search,
            query: None,
            results: Vec::new(),
            selected: 0,
            searching: false,
            search_seq: 0,
        }
    }
}

impl DetailState {
    pub fn loading(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: DetailStatus::Loading,
            selected_version: 0,
        }
    }

    pub fn package(&self) -> Option<&PackageRecord> {
        match &self.status {
            DetailStatus::Loaded(pkg) => Some(pkg.as_ref()),
            _ => None,
        }
    }
}

impl OptionsDialogState {
    pub fn new() -> Self {
        Self {
            open: false,
            selected: 0,
        }
    }

    pub fn current_item(&self) -> DialogItem {
        DialogItem::ALL[self.selected.min(DialogItem::ALL.len() - 1)]
    }
}

// ========== App ==========

/// 整个会话的状态，只由 UI 主循环修改
pub struct App {
    pub mode: AppMode,
    pub config: Config,
    pub selection: SelectionSet,
    pub options: InstallOptions,
    pub total_packages: Option<u64>,
    pub featured: Vec<PackageRecord>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    // 子状态
    pub browse: BrowseState,
    pub detail: DetailState,
    pub dialog: OptionsDialogState,
}

impl App {
    pub fn new(config: Config) -> Self {
        let options = config.install;
        Self {
            mode: AppMode::Browse,
            config,
            selection: SelectionSet::new(),
            options,
            total_packages: None,
            featured: Vec::new(),
            status_message: None,
            should_quit: false,
            browse: BrowseState::new(),
            detail: DetailState::loading(""),
            dialog: OptionsDialogState::new(),
        }
    }

    /// 当前列表：尚未搜索时为推荐包，否则为搜索结果
    pub fn visible_packages(&self) -> &[PackageRecord] {
        if self.browse.query.is_some() {
            &self.browse.results
        } else {
            &self.featured
        }
    }

    pub fn highlighted_package(&self) -> Option<&PackageRecord> {
        self.visible_packages().get(self.browse.selected)
    }

    pub fn select_previous(&mut self) {
        self.browse.selected = self.browse.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let max = self.visible_packages().len().saturating_sub(1);
        if self.browse.selected < max {
            self.browse.selected += 1;
        }
    }

    /// 切换光标所在包的勾选状态
    pub fn toggle_highlighted(&mut self) -> Option<bool> {
        let id = self.highlighted_package()?.id.clone();
        Some(self.selection.toggle(&id))
    }

    /// 准备一次搜索：空白关键词返回 None，否则递增序号
    pub fn begin_search(&mut self) -> Option<(u64, String)> {
        let query = self.browse.input.content().trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.browse.search_seq += 1;
        self.browse.searching = true;
        self.status_message = None;
        Some((self.browse.search_seq, query))
    }

    pub fn open_detail(&mut self, id: &str) {
        self.detail = DetailState::loading(id);
        self.mode = AppMode::Detail;
        self.status_message = None;
    }

    pub fn close_detail(&mut self) {
        self.mode = AppMode::Browse;
        self.detail = DetailState::loading("");
    }

    /// 仅在已有选中包时打开安装选项弹窗
    pub fn open_dialog(&mut self) -> bool {
        if self.selection.is_empty() {
            self.status_message = Some("✗ Select at least one package first".to_string());
            return false;
        }
        self.dialog.open = true;
        self.dialog.selected = 0;
        true
    }

    pub fn close_dialog(&mut self) {
        self.dialog.open = false;
    }

    pub fn dialog_previous(&mut self) {
        self.dialog.selected = self.dialog.selected.saturating_sub(1);
    }

    pub fn dialog_next(&mut self) {
        if self.dialog.selected + 1 < DialogItem::ALL.len() {
            self.dialog.selected += 1;
        }
    }

    /// 切换弹窗中当前选项的值；按钮项不处理
    pub fn toggle_dialog_item(&mut self) {
        match self.dialog.current_item() {
            DialogItem::ScriptType => {
                self.options.script_type = self.options.script_type.toggled();
            }
            DialogItem::Force => self.options.force = !self.options.force,
            DialogItem::AcceptLicense => {
                self.options.accept_license = !self.options.accept_license;
            }
            DialogItem::Interactive => self.options.interactive = !self.options.interactive,
            DialogItem::Generate | DialogItem::Cancel => {}
        }
    }

    /// 用当前选中包和选项生成脚本；未选中任何包时返回 None
    pub fn generate_script(&self) -> Option<GeneratedScript> {
        if self.selection.is_empty() {
            return None;
        }
        Some(generate_script(self.selection.members(), &self.options))
    }

    /// 处理异步任务回传的事件
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TotalCountLoaded(total) => {
                self.total_packages = Some(total);
            }
            AppEvent::FeaturedLoaded(packages) => {
                self.featured = packages;
                if self.browse.query.is_none() {
                    self.browse.selected = 0;
                }
            }
            AppEvent::SearchResults {
                seq,
                query,
                packages,
            } => {
                if seq != self.browse.search_seq {
                    log::debug!("丢弃过期的搜索结果 #{}", seq);
                    return;
                }
                self.browse.results = packages;
                self.browse.query = Some(query);
                self.browse.selected = 0;
                self.browse.searching = false;
            }
            AppEvent::SearchFailed { seq, error } => {
                if seq != self.browse.search_seq {
                    return;
                }
                self.browse.searching = false;
                self.status_message = Some(format!("✗ Search failed: {}", error));
            }
            AppEvent::DetailLoaded { id, package } => {
                if self.mode != AppMode::Detail || self.detail.id != id {
                    return;
                }
                self.detail.status = match package {
                    Some(pkg) => DetailStatus::Loaded(Box::new(pkg)),
                    None => DetailStatus::NotFound,
                };
                self.detail.selected_version = 0;
            }
            AppEvent::DetailFailed { id, error } => {
                if self.mode != AppMode::Detail || self.detail.id != id {
                    return;
                }
                self.detail.status = DetailStatus::NotFound;
                self.status_message = Some(format!("✗ Failed to load {}: {}", id, error));
            }
            AppEvent::Copied { text, ok } => {
                self.status_message = Some(if ok {
                    format!("✓ Copied: {}", text)
                } else {
                    "✗ No clipboard tool found".to_string()
                });
            }
            AppEvent::Error(msg) => {
                self.status_message = Some(format!("✗ {}", msg));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::LatestInfo;
    use crate::script::ScriptType;

    fn pkg(id: &str) -> PackageRecord {
        PackageRecord {
            id: id.to_string(),
            versions: vec!["1.0".to_string()],
            latest: LatestInfo {
                name: id.to_string(),
                publisher: "Acme".to_string(),
                tags: Vec::new(),
                description: None,
                homepage: None,
                license: None,
                license_url: None,
            },
            featured: false,
            updated_at: None,
            created_at: None,
        }
    }

    fn type_query(app: &mut App, text: &str) {
        for c in text.chars() {
            app.browse.input.insert(c);
        }
    }

    #[test]
    fn starts_with_config_defaults() {
        let mut config = Config::default();
        config.install.script_type = ScriptType::Shell;
        let app = App::new(config);
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.options.script_type, ScriptType::Shell);
        assert!(app.selection.is_empty());
        assert!(!app.dialog.open);
    }

    #[test]
    fn featured_shown_until_first_search() {
        let mut app = App::new(Config::default());
        app.handle_event(AppEvent::FeaturedLoaded(vec![pkg("Featured.One")]));
        assert_eq!(app.visible_packages()[0].id, "Featured.One");

        type_query(&mut app, "git");
        let (seq, query) = app.begin_search().unwrap();
        app.handle_event(AppEvent::SearchResults {
            seq,
            query,
            packages: vec![pkg("Git.Git"), pkg("GitHub.cli")],
        });
        assert_eq!(app.browse.query.as_deref(), Some("git"));
        assert_eq!(app.visible_packages().len(), 2);
        assert!(!app.browse.searching);
    }

    #[test]
    fn blank_query_is_not_issued() {
        let mut app = App::new(Config::default());
        type_query(&mut app, "   ");
        assert!(app.begin_search().is_none());
        assert_eq!(app.browse.search_seq, 0);
        assert!(!app.browse.searching);
    }

    #[test]
    fn failed_search_keeps_previous_results() {
        let mut app = App::new(Config::default());
        type_query(&mut app, "chrome");
        let (seq, query) = app.begin_search().unwrap();
        app.handle_event(AppEvent::SearchResults {
            seq,
            query,
            packages: vec![pkg("Google.Chrome")],
        });

        let (seq, _) = app.begin_search().unwrap();
        app.handle_event(AppEvent::SearchFailed {
            seq,
            error: "timeout".to_string(),
        });

        assert_eq!(app.browse.query.as_deref(), Some("chrome"));
        assert_eq!(app.visible_packages()[0].id, "Google.Chrome");
        assert!(!app.browse.searching);
        assert!(app.status_message.as_deref().unwrap().contains("timeout"));
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut app = App::new(Config::default());
        type_query(&mut app, "vs");
        let (first, _) = app.begin_search().unwrap();
        let (second, _) = app.begin_search().unwrap();

        app.handle_event(AppEvent::SearchResults {
            seq: second,
            query: "vs".to_string(),
            packages: vec![pkg("New.Result")],
        });
        app.handle_event(AppEvent::SearchResults {
            seq: first,
            query: "vs".to_string(),
            packages: vec![pkg("Old.Result")],
        });

        assert_eq!(app.visible_packages()[0].id, "New.Result");
    }

    #[test]
    fn toggling_highlighted_package_updates_selection() {
        let mut app = App::new(Config::default());
        app.handle_event(AppEvent::FeaturedLoaded(vec![pkg("A.A"), pkg("B.B")]));

        app.select_next();
        assert_eq!(app.toggle_highlighted(), Some(true));
        assert!(app.selection.contains("B.B"));
        assert_eq!(app.toggle_highlighted(), Some(false));
        assert!(app.selection.is_empty());

        app.select_next();
        assert_eq!(app.browse.selected, 1);
    }

    #[test]
    fn clipboard_result_becomes_status() {
        let mut app = App::new(Config::default());
        app.handle_event(AppEvent::Copied {
            text: "winget install -e --id Git.Git".to_string(),
            ok: true,
        });
        assert_eq!(
            app.status_message.as_deref(),
            Some("✓ Copied: winget install -e --id Git.Git")
        );

        app.handle_event(AppEvent::Copied {
            text: "winget install -e --id Git.Git".to_string(),
            ok: false,
        });
        assert_eq!(app.status_message.as_deref(), Some("✗ No clipboard tool found"));
    }

    #[test]
    fn dialog_requires_selection() {
        let mut app = App::new(Config::default());
        assert!(!app.open_dialog());
        assert!(!app.dialog.open);
        assert!(app.generate_script().is_none());

        app.selection.toggle("Git.Git");
        assert!(app.open_dialog());
        assert!(app.dialog.open);
    }

    #[test]
    fn dialog_toggles_options_and_generates() {
        let mut app = App::new(Config::default());
        app.selection.toggle("Microsoft.VisualStudioCode");
        app.selection.toggle("Google.Chrome");
        app.open_dialog();

        app.toggle_dialog_item();
        assert_eq!(app.options.script_type, ScriptType::Shell);
        app.dialog_next();
        app.toggle_dialog_item();
        assert!(app.options.force);
        app.dialog_next();
        app.toggle_dialog_item();
        assert!(!app.options.accept_license);
        for _ in 0..10 {
            app.dialog_next();
        }
        assert_eq!(app.dialog.current_item(), DialogItem::Cancel);

        let script = app.generate_script().unwrap();
        assert_eq!(script.file_name, "install-packages.ps1");
        assert!(script
            .content
            .contains("\nwinget install -e --id Google.Chrome --force\n"));
        let first = script.content.find("Microsoft.VisualStudioCode").unwrap();
        let second = script.content.find("Google.Chrome").unwrap();
        assert!(first < second);
    }

    #[test]
    fn detail_events_resolve_loading_state() {
        let mut app = App::new(Config::default());
        app.open_detail("Git.Git");
        assert_eq!(app.detail.status, DetailStatus::Loading);

        app.handle_event(AppEvent::DetailLoaded {
            id: "Other.Pkg".to_string(),
            package: Some(pkg("Other.Pkg")),
        });
        assert_eq!(app.detail.status, DetailStatus::Loading);

        app.handle_event(AppEvent::DetailLoaded {
            id: "Git.Git".to_string(),
            package: Some(pkg("Git.Git")),
        });
        assert_eq!(app.detail.package().map(|p| p.id.as_str()), Some("Git.Git"));

        app.close_detail();
        assert_eq!(app.mode, AppMode::Browse);
    }

    #[test]
    fn missing_or_failed_detail_shows_not_found() {
        let mut app = App::new(Config::default());
        app.open_detail("Gone.Pkg");
        app.handle_event(AppEvent::DetailLoaded {
            id: "Gone.Pkg".to_string(),
            package: None,
        });
        assert_eq!(app.detail.status, DetailStatus::NotFound);

        app.open_detail("Broken.Pkg");
        app.handle_event(AppEvent::DetailFailed {
            id: "Broken.Pkg".to_string(),
            error: "connection refused".to_string(),
        });
        assert_eq!(app.detail.status, DetailStatus::NotFound);
        assert!(app.status_message.is_some());
    }
}

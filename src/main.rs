use fs_navigator::{
    logging, AppConfig, Entry, FilesystemConfig, LocalFileSystem, NavigationController,
    StaticWordList, SuggestionController, SuggestionEvent,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// 配置文件路径
const CONFIG_PATH: &str = "config/app.toml";

/// 用法: fs-navigator-demo [目录] [补全前缀]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 配置文件不存在时使用默认配置，不自动创建
    let config = AppConfig::load_from_file(CONFIG_PATH)
        .await
        .unwrap_or_default();

    let _log_guard = logging::init_logging(&config.log);
    info!("fs-navigator demo 启动");

    let mut args = std::env::args().skip(1);
    let directory = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => match config.filesystem.start_directory.clone() {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        },
    };
    let prefix = args.next();

    let mut navigator = NavigationController::from_config(
        LocalFileSystem::new(),
        &FilesystemConfig {
            start_directory: None,
            ..config.filesystem.clone()
        },
    );
    let (subscription, mut events) = navigator.subscribe();

    navigator.select_directory(&directory)?;

    while let Ok(event) = events.try_recv() {
        debug!("导航事件: {:?}", event);
    }
    navigator.unsubscribe(subscription);

    let breadcrumb: Vec<String> = navigator
        .path_parts()
        .unwrap_or_default()
        .iter()
        .map(|part| part.name())
        .collect();
    println!("{}", breadcrumb.join(" > "));
    println!();

    for entry in navigator.entries() {
        match entry {
            Entry::Directory(dir) => println!("  [D] {}", dir.name()),
            Entry::File(file) => println!("      {}", file.name()),
        }
    }

    println!();
    println!("驱动器:");
    for drive in navigator.drives() {
        println!(
            "  {:<16} {:?} {}",
            drive.icon,
            drive.kind,
            match drive.volume_label {
                Some(ref label) => format!("{} ({})", label, drive.root.path().display()),
                None => drive.root.path().display().to_string(),
            }
        );
    }

    println!();
    println!("特殊目录:");
    for location in navigator.special_locations() {
        println!(
            "  {:<16} {:?} {}",
            location.icon,
            location.folder,
            location.directory.path().display()
        );
    }

    if let Some(prefix) = prefix {
        let names: Vec<String> = navigator.entries().iter().map(Entry::name).collect();

        let suggestions = SuggestionController::from_config(&config.suggestion);
        suggestions.set_source(Some(Arc::new(StaticWordList::new(names))));
        let (_, mut rx) = suggestions.subscribe();

        suggestions.search(prefix.clone());
        while let Some(event) = rx.recv().await {
            if let SuggestionEvent::ItemsChanged { items, .. } = event {
                println!();
                println!("\"{}\" 的补全建议:", prefix);
                for item in items.unwrap_or_default() {
                    println!("  {}", item);
                }
                break;
            }
        }
    }

    Ok(())
}

// 配置管理模块

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 文件系统浏览配置
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    /// 输入建议配置
    #[serde(default)]
    pub suggestion: SuggestionConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 是否启用日志文件持久化
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
    /// 日志文件保存目录
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// 日志保留天数（默认 7 天）
    #[serde(default = "default_log_retention_days")]
    pub retention_days: u32,
    /// 日志级别（默认 info）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_enabled() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_retention_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            log_dir: default_log_dir(),
            retention_days: default_log_retention_days(),
            level: default_log_level(),
        }
    }
}

/// 文件系统浏览配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemConfig {
    /// 是否显示隐藏文件
    #[serde(default)]
    pub show_hidden: bool,
    /// 是否显示受保护的系统文件
    #[serde(default)]
    pub show_system: bool,
    /// 启动时进入的目录
    #[serde(default)]
    pub start_directory: Option<PathBuf>,
}

/// 输入建议配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// 每次最多发布的候选数（0 表示不限制）
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// 最近使用列表容量
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,
}

fn default_max_results() -> usize {
    10
}

fn default_recent_capacity() -> usize {
    20
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            recent_capacity: default_recent_capacity(),
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub async fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// 保存配置到文件
    pub async fn save_to_file(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        // 确保父目录存在
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        fs::write(path, content)
            .await
            .context("Failed to write config file")?;

        tracing::info!("配置已保存: {}", path);
        Ok(())
    }

    /// 加载或创建默认配置
    pub async fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path).await {
            Ok(config) => {
                tracing::info!("配置文件加载成功: {}", path);
                config
            }
            Err(e) => {
                tracing::warn!("配置文件加载失败，使用默认配置: {:#}", e);
                let default_config = Self::default();

                if let Err(e) = default_config.save_to_file(path).await {
                    tracing::error!("保存默认配置失败: {:#}", e);
                }

                default_config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.filesystem.show_hidden);
        assert!(!config.filesystem.show_system);
        assert_eq!(config.filesystem.start_directory, None);
        assert_eq!(config.suggestion.max_results, 10);
        assert_eq!(config.suggestion.recent_capacity, 20);
        assert!(config.log.enabled);
        assert_eq!(config.log.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log.retention_days, 7);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [filesystem]
            show_hidden = true
            start_directory = "/srv/data"
            "#,
        )
        .unwrap();

        assert!(config.filesystem.show_hidden);
        assert!(!config.filesystem.show_system);
        assert_eq!(
            config.filesystem.start_directory,
            Some(PathBuf::from("/srv/data"))
        );
        assert_eq!(config.suggestion, SuggestionConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let mut config = AppConfig::default();
        config.filesystem.show_system = true;
        config.suggestion.max_results = 3;
        config.save_to_file(path).await.unwrap();

        let loaded = AppConfig::load_from_file(path).await.unwrap();
        assert!(loaded.filesystem.show_system);
        assert_eq!(loaded.suggestion.max_results, 3);
    }

    #[tokio::test]
    async fn test_load_or_default_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("app.toml");
        let path = path.to_str().unwrap();

        let config = AppConfig::load_or_default(path).await;
        assert_eq!(config.suggestion, SuggestionConfig::default());
        assert!(std::path::Path::new(path).exists());
    }
}

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::custom_err::{config_err, CustomResult};

/// 应用配置，启动时加载，之后只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub template: TemplateConfig,
    pub url: UrlConfig,
    // 成功跳转模板
    pub dispatch_success_tmpl: String,
    // 失败跳转模板
    pub dispatch_error_tmpl: String,
    // 其它自定义配置
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("127.0.0.1"),
            port: 8848,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    // 模板目录
    pub view_path: String,
    // 模板后缀
    pub view_suffix: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            view_path: String::from("view"),
            view_suffix: String::from("html"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    // url 根路径，例如 /admin
    pub root: String,
    // 伪静态后缀，空表示不加
    pub html_suffix: String,
    // 命名路由
    pub routes: HashMap<String, String>,
}

impl Default for UrlConfig {
    fn default() -> Self {
        UrlConfig {
            root: String::new(),
            html_suffix: String::from("html"),
            routes: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CustomResult<Config> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_err(format!("读取配置文件{:?}失败: {}", path, e)))?;
        let config = Config::from_json(&text)?;
        log::info!("配置加载完成: {:?}", path);
        Ok(config)
    }

    pub fn from_json(text: &str) -> CustomResult<Config> {
        serde_json::from_str(text).map_err(|e| config_err(format!("配置格式错误: {}", e)))
    }

    /// 按 key 读取配置，支持 `template.view_path` 这种多级 key
    pub fn get(&self, key: &str) -> Option<Value> {
        let root = serde_json::to_value(self).ok()?;
        let mut curr = &root;
        for part in key.split('.') {
            curr = curr.as_object()?.get(part)?;
        }
        Some(curr.clone())
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// 读取整个配置段
    pub fn pull(&self, section: &str) -> Map<String, Value> {
        match self.get(section) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_config() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8848);
        assert_eq!(config.template, TemplateConfig::default());
        assert_eq!(config.url.html_suffix, "html");
        assert_eq!(config.get_str("dispatch_success_tmpl"), Some(String::new()));
    }

    #[test]
    fn test_get_and_pull() {
        let config = Config::from_json(
            r#"{
                "template": {"view_path": "themes/default"},
                "dispatch_success_tmpl": "common/success",
                "dispatch_error_tmpl": "common/error",
                "site_name": "Demo",
                "upload": {"max_size": 1024}
            }"#,
        )
        .unwrap();

        assert_eq!(config.get_str("template.view_path"), Some(String::from("themes/default")));
        assert_eq!(config.get_str("template.view_suffix"), Some(String::from("html")));
        assert_eq!(config.get_str("dispatch_error_tmpl"), Some(String::from("common/error")));
        assert_eq!(config.get("site_name"), Some(json!("Demo")));
        assert_eq!(config.get("upload.max_size"), Some(json!(1024)));
        assert_eq!(config.get("upload.none"), None);
        assert_eq!(config.get("site_name.x"), None);

        let template = config.pull("template");
        assert_eq!(template.get("view_suffix"), Some(&json!("html")));
        assert!(config.pull("missing").is_empty());
    }

    #[test]
    fn test_bad_config() {
        let err = Config::from_json("{\"server\": 1}").unwrap_err();
        assert_eq!(err.code, crate::constant::ERR_CONFIG);

        let err = Config::from_file("/not/exists/config.json").unwrap_err();
        assert_eq!(err.code, crate::constant::ERR_CONFIG);
    }
}

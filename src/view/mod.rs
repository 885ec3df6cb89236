use std::path::{Path, PathBuf};

use minijinja::{path_loader, AutoEscape, Environment};
use serde_json::{Map, Value};

use crate::config::TemplateConfig;
use crate::custom_err::{template_err, CustomResult};

/// 视图渲染
#[allow(async_fn_in_trait)]
pub trait Renderer {
    /// 模板变量赋值
    fn assign(&mut self, name: &str, value: Value);

    /// 渲染模板文件，`render_content` 为 true 时 `template` 直接作为模板内容
    async fn fetch(
        &self,
        template: &str,
        vars: &Map<String, Value>,
        config: &Map<String, Value>,
        render_content: bool,
    ) -> CustomResult<String>;
}

/// 基于 minijinja 的模板视图
pub struct TemplateView {
    config: TemplateConfig,
    // 已赋值的模板变量
    data: Map<String, Value>,
}

impl TemplateView {
    pub fn new(config: TemplateConfig) -> TemplateView {
        TemplateView {
            config,
            data: Map::new(),
        }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// 合并本次调用的配置
    fn merge_config(&self, config: &Map<String, Value>) -> TemplateConfig {
        let mut merged = self.config.clone();
        for (key, value) in config {
            let value = match value.as_str() {
                Some(s) => s.to_string(),
                None => continue,
            };
            match key.as_str() {
                "view_path" => merged.view_path = value,
                "view_suffix" => merged.view_suffix = value,
                _ => {}
            }
        }
        merged
    }

    /// include / extends 从模板目录加载，输出统一做 html 转义
    fn environment(config: &TemplateConfig) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_loader(path_loader(config.view_path.clone()));
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env
    }
}

/// 定位模板文件，带后缀的直接使用，否则拼上模板目录和后缀
pub fn locate_template(template: &str, config: &TemplateConfig) -> PathBuf {
    let path = Path::new(template);
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let mut file = PathBuf::from(&config.view_path);
    if config.view_suffix.is_empty() {
        file.push(template);
    } else {
        file.push(format!("{}.{}", template, config.view_suffix));
    }
    file
}

impl Renderer for TemplateView {
    fn assign(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_string(), value);
    }

    async fn fetch(
        &self,
        template: &str,
        vars: &Map<String, Value>,
        config: &Map<String, Value>,
        render_content: bool,
    ) -> CustomResult<String> {
        let config = self.merge_config(config);
        let mut env = TemplateView::environment(&config);

        let mut all = self.data.clone();
        for (key, value) in vars {
            all.insert(key.clone(), value.clone());
        }

        if render_content {
            return env
                .render_str(template, &all)
                .map_err(|e| template_err(format!("模板渲染失败: {}", e)));
        }

        if template.is_empty() {
            return Err(template_err(String::from("模板名称为空")));
        }
        let file = locate_template(template, &config);
        log::debug!("读取模板文件:{:?}", file);
        let source = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| template_err(format!("模板不存在: {:?}, {}", file, e)))?;

        let name = file.to_string_lossy().to_string();
        env.add_template_owned(name.clone(), source)
            .map_err(|e| template_err(format!("模板解析失败: {}", e)))?;
        let tmpl = env
            .get_template(&name)
            .map_err(|e| template_err(format!("模板不存在: {}", e)))?;
        tmpl.render(&all)
            .map_err(|e| template_err(format!("模板渲染失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::constant::ERR_TEMPLATE;

    fn temp_view_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cms-web-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("common")).unwrap();
        dir
    }

    #[test]
    fn test_locate_template() {
        let config = TemplateConfig::default();
        assert_eq!(locate_template("common/success", &config), PathBuf::from("view/common/success.html"));
        assert_eq!(locate_template("static/jump.htm", &config), PathBuf::from("static/jump.htm"));
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = temp_view_dir("fetch");
        std::fs::write(dir.join("common/hello.html"), "{{ site }} - {{ title }}").unwrap();
        std::fs::write(dir.join("common/page.html"), "[{% include \"common/hello.html\" %}]").unwrap();

        let mut view = TemplateView::new(TemplateConfig {
            view_path: dir.to_string_lossy().to_string(),
            ..TemplateConfig::default()
        });
        view.assign("site", json!("Demo"));
        view.assign("title", json!("assigned"));

        let vars = json!({"title": "首页"}).as_object().unwrap().clone();
        let html = view.fetch("common/hello", &vars, &Map::new(), false).await.unwrap();
        assert_eq!(html, "Demo - 首页");
        // 调用时的变量不会写回视图
        assert_eq!(view.data().get("title"), Some(&json!("assigned")));

        let html = view.fetch("common/page", &vars, &Map::new(), false).await.unwrap();
        assert_eq!(html, "[Demo - 首页]");

        let err = view.fetch("common/none", &vars, &Map::new(), false).await.unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_fetch_content_escape() {
        let view = TemplateView::new(TemplateConfig::default());
        let vars = json!({"msg": "<b>保存成功", "n": 1, "data": {"id": 5}})
            .as_object()
            .unwrap()
            .clone();

        let html = view
            .fetch("{{ msg }}|{{ msg|safe }}|{{ n }}|{{ data.id }}|{{ none }}", &vars, &Map::new(), true)
            .await
            .unwrap();
        assert_eq!(html, "&lt;b&gt;保存成功|<b>保存成功|1|5|");

        let err = view.fetch("{{ n ", &vars, &Map::new(), true).await.unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE);

        let err = view.fetch("", &vars, &Map::new(), false).await.unwrap_err();
        assert_eq!(err.code, ERR_TEMPLATE);
    }

    #[tokio::test]
    async fn test_fetch_config_override() {
        let dir = temp_view_dir("override");
        std::fs::write(dir.join("common/plain.tpl"), "n={{ n }}").unwrap();

        let view = TemplateView::new(TemplateConfig::default());
        let vars = json!({"n": 2}).as_object().unwrap().clone();
        let config = json!({"view_path": dir.to_string_lossy(), "view_suffix": "tpl"})
            .as_object()
            .unwrap()
            .clone();

        let html = view.fetch("common/plain", &vars, &config, false).await.unwrap();
        assert_eq!(html, "n=2");

        std::fs::remove_dir_all(dir).unwrap();
    }
}

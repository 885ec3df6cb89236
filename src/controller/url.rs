use dashmap::DashMap;

use crate::config::UrlConfig;

/// 生成 url
pub trait UrlBuilder {
    fn build(&self, path: &str) -> String;
}

/// 按命名路由和伪静态后缀生成 url
pub struct RouteUrlBuilder {
    root: String,
    html_suffix: String,
    // 路由名 => 路径
    routes: DashMap<String, String>,
}

impl RouteUrlBuilder {
    pub fn new(config: &UrlConfig) -> RouteUrlBuilder {
        let routes = DashMap::new();
        for (name, target) in &config.routes {
            routes.insert(name.clone(), target.clone());
        }
        RouteUrlBuilder {
            root: config.root.trim_end_matches('/').to_string(),
            html_suffix: config.html_suffix.trim_start_matches('.').to_string(),
            routes,
        }
    }

    /// 运行期注册命名路由
    pub fn add_route(&self, name: &str, target: &str) {
        log::info!("注册路由 {} => {}", name, target);
        self.routes.insert(name.to_string(), target.to_string());
    }
}

impl UrlBuilder for RouteUrlBuilder {
    fn build(&self, path: &str) -> String {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let path = match self.routes.get(path) {
            Some(target) => target.value().trim_matches('/').to_string(),
            None => path.trim_matches('/').to_string(),
        };

        let mut url = format!("{}/{}", self.root, path);
        if !path.is_empty() && !self.html_suffix.is_empty() {
            url.push('.');
            url.push_str(&self.html_suffix);
        }
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(q);
        }
        url
    }
}

/// 构造跳转 url
/// 完整地址和以 / 开头的地址原样返回，空字符串表示不跳转，其它交给 url 生成器
pub fn build_url(url: &str, builder: &dyn UrlBuilder) -> String {
    if url.contains("://") || url.starts_with('/') {
        url.to_string()
    } else if url.is_empty() {
        String::new()
    } else {
        builder.build(url)
    }
}

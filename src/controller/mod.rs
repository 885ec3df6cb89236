pub mod request;
pub mod url;

use std::sync::Arc;

use actix_web::http::header::{ContentType, HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::constant::{CODE_ERROR, CODE_SUCCESS};
use crate::controller::request::RequestContext;
use crate::controller::url::{RouteUrlBuilder, UrlBuilder};
use crate::custom_err::{common_err, CustomResult};
use crate::http_param::{JumpResult, ReturnObject};
use crate::view::{Renderer, TemplateView};

/// 渲染前的回调，可以注入公共模板变量
pub type RenderHook<V> = Box<dyn Fn(&mut V, &Config)>;

/// 应用级共享数据，注册到 actix 的 app_data
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub urls: Arc<RouteUrlBuilder>,
}

impl AppContext {
    pub fn new(config: Config) -> AppContext {
        let urls = Arc::new(RouteUrlBuilder::new(&config.url));
        AppContext {
            config: Arc::new(config),
            urls,
        }
    }
}

/// 控制器基类，一个请求一个实例
pub struct Controller<V: Renderer = TemplateView> {
    config: Arc<Config>,
    view: V,
    request: Box<dyn RequestContext>,
    urls: Arc<dyn UrlBuilder>,
    before_render: Vec<RenderHook<V>>,
}

impl Controller<TemplateView> {
    pub fn from_request(req: &HttpRequest, app: &AppContext) -> Controller<TemplateView> {
        let view = TemplateView::new(app.config.template.clone());
        let urls: Arc<dyn UrlBuilder> = app.urls.clone();
        Controller::new(app.config.clone(), view, Box::new(req.clone()), urls)
    }
}

impl<V: Renderer> Controller<V> {
    pub fn new(
        config: Arc<Config>,
        view: V,
        request: Box<dyn RequestContext>,
        urls: Arc<dyn UrlBuilder>,
    ) -> Controller<V> {
        Controller {
            config,
            view,
            request,
            urls,
            before_render: Vec::new(),
        }
    }

    /// 初始化，构造后立即执行
    pub fn with_initialize<F: FnOnce(&mut Self)>(mut self, init: F) -> Self {
        init(&mut self);
        self
    }

    /// 追加渲染前回调，按注册顺序执行
    pub fn with_before_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut V, &Config) + 'static,
    {
        self.before_render.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// 成功返回
    pub async fn success<D: Serialize>(
        &mut self,
        msg: &str,
        url: &str,
        data: D,
        wait: u32,
        header: &[(&str, &str)],
    ) -> CustomResult<HttpResponse> {
        self.jump(CODE_SUCCESS, msg, url, data, wait, header).await
    }

    /// 失败返回
    pub async fn error<D: Serialize>(
        &mut self,
        msg: &str,
        url: &str,
        data: D,
        wait: u32,
        header: &[(&str, &str)],
    ) -> CustomResult<HttpResponse> {
        self.jump(CODE_ERROR, msg, url, data, wait, header).await
    }

    /// 结果返回，ajax 请求返回 json，否则渲染跳转模板
    pub async fn jump<D: Serialize>(
        &mut self,
        code: i32,
        msg: &str,
        url: &str,
        data: D,
        wait: u32,
        header: &[(&str, &str)],
    ) -> CustomResult<HttpResponse> {
        let header = parse_header(header)?;
        let result = JumpResult {
            code,
            msg: msg.to_string(),
            url: self.build_url(url),
            data: serde_json::to_value(data)?,
            wait,
        };

        let mut builder = HttpResponse::Ok();
        if self.request.is_ajax() {
            log::info!("jump json, code={}, url={}", result.code, result.url);
            builder.insert_header(ContentType::json());
            apply_header(&mut builder, header);
            Ok(builder.json(&result))
        } else {
            let template = self.jump_template(code);
            log::info!("jump html, code={}, template={}", result.code, template);
            let content = self.fetch(&template, &result.to_vars(), &Map::new(), false).await?;
            builder.insert_header(ContentType::html());
            apply_header(&mut builder, header);
            Ok(builder.body(content))
        }
    }

    /// 按业务结果返回成功或失败
    pub async fn response(
        &mut self,
        ret: &ReturnObject,
        url: &str,
        wait: u32,
        header: &[(&str, &str)],
    ) -> CustomResult<HttpResponse> {
        if ret.is_success() {
            self.success(ret.msg(), url, ret.data(), wait, header).await
        } else {
            self.error(ret.msg(), url, ret.data(), wait, header).await
        }
    }

    /// 模板变量赋值
    pub fn assign(&mut self, name: &str, value: Value) -> &mut Self {
        self.view.assign(name, value);
        self
    }

    /// 解析和获取模板内容
    pub async fn fetch(
        &mut self,
        template: &str,
        vars: &Map<String, Value>,
        config: &Map<String, Value>,
        render_content: bool,
    ) -> CustomResult<String> {
        self.before_view_render();
        self.view.fetch(template, vars, config, render_content).await
    }

    /// 渲染内容输出
    pub async fn display(
        &mut self,
        content: &str,
        vars: &Map<String, Value>,
        config: &Map<String, Value>,
    ) -> CustomResult<String> {
        self.before_view_render();
        self.view.fetch(content, vars, config, true).await
    }

    pub fn build_url(&self, url: &str) -> String {
        self::url::build_url(url, self.urls.as_ref())
    }

    /// 获取跳转模板
    pub fn jump_template(&self, code: i32) -> String {
        let key = if code == CODE_SUCCESS {
            "dispatch_success_tmpl"
        } else {
            "dispatch_error_tmpl"
        };
        self.config.get_str(key).unwrap_or_default()
    }

    fn before_view_render(&mut self) {
        for hook in &self.before_render {
            hook(&mut self.view, &*self.config);
        }
    }
}

/// 校验调用方传入的响应头
fn parse_header(header: &[(&str, &str)]) -> CustomResult<Vec<(HeaderName, HeaderValue)>> {
    let mut parsed = Vec::with_capacity(header.len());
    for (name, value) in header {
        let name = HeaderName::try_from(*name)
            .map_err(|e| common_err(format!("响应头名称不合法: {:?}, {}", name, e)))?;
        let value = HeaderValue::try_from(*value)
            .map_err(|e| common_err(format!("响应头 {} 的值不合法: {}", name, e)))?;
        parsed.push((name, value));
    }
    Ok(parsed)
}

fn apply_header(builder: &mut HttpResponseBuilder, header: Vec<(HeaderName, HeaderValue)>) {
    for pair in header {
        builder.insert_header(pair);
    }
}

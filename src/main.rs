use std::path::PathBuf;

use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use log::info;
use serde_json::{json, Map, Value};

use cms_web::config::Config;
use cms_web::constant::DEFAULT_WAIT;
use cms_web::controller::{AppContext, Controller};
use cms_web::custom_err::{common_err, CustomResult};
use cms_web::http_param::ReturnObject;
use cms_web::view::Renderer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_log();

    let config_path = std::env::var("CMS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| manifest_file("config.json"));
    let config = Config::from_file(config_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    let (host, port) = (config.server.host.clone(), config.server.port);
    let app = AppContext::new(config);
    app.urls.add_route("home", "");

    info!("服务启动 http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app.clone()))
            .service(index)
            .service(save)
            .service(fail)
            .service(result)
    })
        .bind((host, port))?
        .run()
        .await
}

/// 站点控制器，渲染前注入站点名称
fn site_controller(req: &HttpRequest, app: &AppContext) -> Controller {
    Controller::from_request(req, app).with_before_render(|view, config| {
        view.assign("site_name", config.get("site_name").unwrap_or(Value::Null));
    })
}

#[actix_web::get("/")]
async fn index(req: HttpRequest, app: web::Data<AppContext>) -> CustomResult<HttpResponse> {
    let mut ctl = site_controller(&req, &app);
    ctl.assign("title", json!("首页"));
    let html = ctl.fetch("index/index", &Map::new(), &Map::new(), false).await?;
    Ok(HttpResponse::Ok().insert_header(ContentType::html()).body(html))
}

#[actix_web::post("/save")]
async fn save(req: HttpRequest, param: web::Json<Value>, app: web::Data<AppContext>) -> CustomResult<HttpResponse> {
    let param = param.into_inner();
    info!("url = /save, param={}", param);
    let mut ctl = site_controller(&req, &app);
    ctl.success("保存成功", "home", param, DEFAULT_WAIT, &[]).await
}

#[actix_web::get("/fail")]
async fn fail(req: HttpRequest, app: web::Data<AppContext>) -> CustomResult<HttpResponse> {
    let mut ctl = site_controller(&req, &app);
    ctl.error("操作失败", "", "", DEFAULT_WAIT, &[]).await
}

#[actix_web::get("/result/{id}")]
async fn result(req: HttpRequest, id: web::Path<u32>, app: web::Data<AppContext>) -> CustomResult<HttpResponse> {
    let id = id.into_inner();
    let ret = ReturnObject::from(find_article(id));
    info!("url=/result/{}, success={}", id, ret.is_success());
    let mut ctl = site_controller(&req, &app);
    ctl.response(&ret, "/", DEFAULT_WAIT, &[]).await
}

fn find_article(id: u32) -> CustomResult<Value> {
    if id % 2 == 0 {
        Ok(json!({"id": id, "title": format!("文章{}", id)}))
    } else {
        Err(common_err(format!("文章{}不存在", id)))
    }
}

fn manifest_file(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(name);
    path
}

pub fn init_log() {
    let config_path = manifest_file("log4rs.yaml");
    println!("{:?}", config_path);
    log4rs::init_file(config_path, Default::default()).unwrap();
    log::info!("日志初始化成功！");
}

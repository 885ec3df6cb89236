use std::collections::HashMap;

use actix_web::{web, HttpRequest};

// 强制 ajax 返回的请求参数
const VAR_AJAX: &str = "_ajax";

/// 当前请求
pub trait RequestContext {
    /// 是否 ajax 请求
    fn is_ajax(&self) -> bool;
}

impl RequestContext for HttpRequest {
    fn is_ajax(&self) -> bool {
        let by_header = self
            .headers()
            .get("X-Requested-With")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
            .unwrap_or(false);
        if by_header {
            return true;
        }

        // 只有空串和 "0" 视为假
        match web::Query::<HashMap<String, String>>::from_query(self.query_string()) {
            Ok(query) => query
                .get(VAR_AJAX)
                .map(|v| !v.is_empty() && v != "0")
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// 固定结果，脱离 http 请求时使用
#[derive(Debug, Clone, Copy)]
pub struct StaticRequest(pub bool);

impl RequestContext for StaticRequest {
    fn is_ajax(&self) -> bool {
        self.0
    }
}

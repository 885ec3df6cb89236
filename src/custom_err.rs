use std::error::Error;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::constant::{ERR_COMMON, ERR_CONFIG, ERR_TEMPLATE};

pub type CustomResult<T> = std::result::Result<T, CustomError>;

#[derive(Debug, PartialEq)]
pub struct CustomError {
    pub code: usize,
    pub message: String,
}

pub fn common_err(msg: String) -> CustomError {
    CustomError {
        code: ERR_COMMON,
        message: msg,
    }
}

/// 模板找不到或无法读取
pub fn template_err(msg: String) -> CustomError {
    CustomError {
        code: ERR_TEMPLATE,
        message: msg,
    }
}

pub fn config_err(msg: String) -> CustomError {
    CustomError {
        code: ERR_CONFIG,
        message: msg,
    }
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for CustomError {}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "code": self.code,
            "msg": self.message,
        }))
    }
}

impl From<std::io::Error> for CustomError {
    fn from(e: std::io::Error) -> Self {
        common_err(e.to_string())
    }
}

impl From<serde_json::Error> for CustomError {
    fn from(e: serde_json::Error) -> Self {
        common_err(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[actix_web::test]
    async fn test_error_response() {
        let err = template_err(String::from("模板不存在: view/none.html"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["code"], ERR_TEMPLATE);
        assert_eq!(value["msg"], "模板不存在: view/none.html");
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CustomError = io.into();
        assert_eq!(err.code, ERR_COMMON);
        assert_eq!(err.to_string(), "[10000] no such file");
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constant::{CODE_ERROR, CODE_SUCCESS};
use crate::custom_err::CustomResult;

/// 跳转结果，json 返回或者渲染到跳转模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpResult {
    pub code: i32,
    pub msg: String,
    pub url: String,
    pub data: Value,
    pub wait: u32,
}

impl JumpResult {
    /// 作为模板变量
    pub fn to_vars(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert(String::from("code"), Value::from(self.code));
        vars.insert(String::from("msg"), Value::from(self.msg.clone()));
        vars.insert(String::from("url"), Value::from(self.url.clone()));
        vars.insert(String::from("data"), self.data.clone());
        vars.insert(String::from("wait"), Value::from(self.wait));
        vars
    }
}

/// 业务层的返回结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnObject {
    code: i32,
    msg: String,
    data: Value,
}

impl ReturnObject {
    pub fn success(msg: impl Into<String>, data: Value) -> ReturnObject {
        ReturnObject {
            code: CODE_SUCCESS,
            msg: msg.into(),
            data,
        }
    }

    pub fn error(msg: impl Into<String>, data: Value) -> ReturnObject {
        ReturnObject {
            code: CODE_ERROR,
            msg: msg.into(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl<T: Serialize> From<CustomResult<T>> for ReturnObject {
    fn from(res: CustomResult<T>) -> Self {
        match res {
            Ok(value) => match serde_json::to_value(value) {
                Ok(data) => ReturnObject::success("", data),
                Err(e) => ReturnObject::error(e.to_string(), Value::Null),
            },
            Err(e) => ReturnObject::error(e.message, Value::Null),
        }
    }
}

/// 跳转成功
pub const CODE_SUCCESS: i32 = 1;
/// 跳转失败
pub const CODE_ERROR: i32 = 0;

/// 跳转页面默认等待秒数
pub const DEFAULT_WAIT: u32 = 3;

// 错误码
pub const ERR_COMMON: usize = 10000;
pub const ERR_TEMPLATE: usize = 10001;
pub const ERR_CONFIG: usize = 10002;

// 应用核心库

// 模块导出
pub mod app;
pub mod config;
pub mod layout;
pub mod source;

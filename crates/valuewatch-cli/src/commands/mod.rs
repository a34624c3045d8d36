//! CLI 명령어 구현 모듈.

pub mod context;
pub mod quote;
pub mod report;
pub mod summary;

//! 전략 제어 HTTP API

pub mod handlers;
pub mod routes;

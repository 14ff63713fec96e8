//! Dispatch service tying the core components together

pub mod dispatch;

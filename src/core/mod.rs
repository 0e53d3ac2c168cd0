//! Core Module
//!
//! Infraestrutura central da pilha: logging, bring-up e self-test.

pub mod boot;
pub mod logging;
#[cfg(feature = "self_test")]
pub mod selftest;

//! State management for orders.
//!
//! This module provides the state machine that governs order status transitions and
//! persists them through the order repository.

pub mod order;

pub use order::OrderStateMachine;

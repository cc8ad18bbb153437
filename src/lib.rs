//! Survey Sensei - Session Flow Core
//!
//! This crate implements the conversational core of the Survey Sensei
//! application: the survey flow controller with branch-and-prune answer
//! editing, the review selection gate, and the pane visibility coordinator
//! that keeps the multi-region layout consistent with flow progress.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

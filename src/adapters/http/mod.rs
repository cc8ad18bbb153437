//! HTTP adapter for the Survey Sensei REST backend.

mod client;
mod dto;

pub use client::{SurveyApiClient, SurveyApiConfig};

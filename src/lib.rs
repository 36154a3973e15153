//! Carepath - Treatment Cycle Milestone & Stage Detection Engine
//!
//! This crate tracks fertility treatment cycles (IVF, IUI, egg freezing,
//! frozen transfers) as sequences of dated milestones, detects which clinical
//! stage a patient is currently in, and surfaces stage-appropriate educational
//! content.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

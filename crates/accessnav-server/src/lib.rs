//! Accessible navigation server: enriched directions, saved routes, user
//! preferences and crowd-sourced accessibility points.

pub mod api;
pub mod cache;
pub mod config;
pub mod directions;
pub mod identity;
pub mod persistence;
pub mod route_service;
pub mod state;

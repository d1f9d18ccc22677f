//! Client for a project and task management REST API.
//!
//! Organisations own teams, teams own projects, projects own backlogs and
//! backlogs own tasks; tasks carry comments, time entries and media. Each
//! collection is driven through a [`resource::ResourceAdapter`] over an
//! authenticated [`api::Transport`].

pub mod access;
pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod resource;
pub mod session;

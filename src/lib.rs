//! Nutrition target calculation and meal planning for the board UI.
//!
//! The core is a pipeline of pure synchronous functions:
//!
//! 1. [`normalize`] - free-form assessment answers to a canonical metric
//!    profile
//! 2. [`energy`] - Mifflin-St Jeor BMR and TDEE
//! 3. [`targets`] - goal-based calorie adjustment and macro splitting
//! 4. [`plan`] - per-slot calorie distribution and food selection
//!
//! [`assessment`] composes the pipeline; [`server`], [`telegram`] and
//! [`watcher`] wrap it in the application shell.

pub mod assessment;
pub mod domain;
pub mod energy;
pub mod error;
pub mod foods;
pub mod normalize;
pub mod plan;
pub mod server;
pub mod targets;
pub mod telegram;
pub mod watcher;

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Applications
//!
//! Each application is a pure `main`: it builds sink streams out of source
//! streams and never touches the outside world itself. The larger ones are
//! split Intent-Model-View style:
//!
//! ```text
//! sources ──> intent() ──> actions ──> model() ──> state ──> view() ──> sinks
//! ```
//!
//! # Available Applications
//!
//! - [`timer`] - elapsed seconds, restarted on click (or on hover)
//! - [`hello`] - greets whatever is typed into a text field
//! - [`counter`] - increment / decrement buttons over a running total
//! - [`bmi`] - body-mass index from two range sliders
//! - [`first_user`] - fetches a user over HTTP on click

pub mod bmi;
pub mod counter;
pub mod first_user;
pub mod hello;
pub mod timer;

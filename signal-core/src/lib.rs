#![no_std]

// Shared logic for the two-indicator signal controller.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library and exposing abstractions the other crates can adopt.

pub mod console;
pub mod controller;
pub mod driver;
pub mod pause;
pub mod phases;
pub mod telemetry;

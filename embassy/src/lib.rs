#![no_std]

pub mod commands;
pub mod console;
pub mod led;

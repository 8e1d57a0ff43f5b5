// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Terminal colors used by the logging macros.

use std::fmt::Display;

pub const GREY: &str = "\x1b[0;0m";
pub const LAVENDER: &str = "\x1b[38;5;183;1m";
pub const MINT: &str = "\x1b[38;5;48;1m";
pub const RED: &str = "\x1b[31;1m";
pub const YELLOW: &str = "\x1b[33;1m";
pub const RESET: &str = "\x1b[0;0m";

pub trait Color {
    fn color(&self, color: &str) -> String;

    fn grey(&self) -> String {
        self.color(GREY)
    }
    fn lavender(&self) -> String {
        self.color(LAVENDER)
    }
    fn mint(&self) -> String {
        self.color(MINT)
    }
    fn red(&self) -> String {
        self.color(RED)
    }
    fn yellow(&self) -> String {
        self.color(YELLOW)
    }
}

impl<T: Display> Color for T {
    fn color(&self, color: &str) -> String {
        format!("{color}{self}{RESET}")
    }
}

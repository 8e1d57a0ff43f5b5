// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt::Display;

use anstyle::{AnsiColor, Effects, Style};
use starknet::core::types::Felt;

const BOLD: Style = Style::new().effects(Effects::BOLD);
const ERROR: Style = AnsiColor::Red.on_default().effects(Effects::BOLD);

/// Clap value parser for addresses and class hashes.
pub fn felt_arg(text: &str) -> Result<Felt, String> {
    infini_tools::utils::parse_felt(text)
}

pub fn print_error(err: impl Display) {
    eprintln!("{ERROR}error{ERROR:#}{BOLD}:{BOLD:#} {err}");
}

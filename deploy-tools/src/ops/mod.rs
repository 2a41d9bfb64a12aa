// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub use comptroller::unitroller;
pub use finish::ensure_finished;
pub use verify::verify_all;

mod comptroller;
mod finish;
mod verify;

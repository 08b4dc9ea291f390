// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod models;
pub mod operations;
pub mod sort;
pub mod stats;
pub mod store;
pub mod utils;
pub mod commands;

pub use engine::{execute, execute_with_ids, preview};
pub use error::{EngineError, ErrorKind};
pub use filter::{FilterPredicate, matches};
pub use forecast::project;
pub use models::{
    BatchOperation, BatchOutcome, CopyTarget, FilterSpec, ForecastPoint, Preview, UpdateSpec,
    ValueAdjustment, ValueRecord,
};

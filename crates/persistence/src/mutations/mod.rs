// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation operations.
//!
//! Every function takes a `&mut SqliteConnection` so mutations compose
//! inside a single Diesel transaction. Compare-and-swap updates return
//! whether they won; callers decide between retry and surfacing a
//! conflict.

pub mod audit;
pub mod bids;
pub mod fleet;
pub mod pilots;
pub mod reports;
pub mod sessions;
pub mod vault;

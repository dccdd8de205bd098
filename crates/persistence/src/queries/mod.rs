// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query operations.

pub mod audit;
pub mod bids;
pub mod fleet;
pub mod pilots;
pub mod reports;
pub mod sessions;
pub mod vault;

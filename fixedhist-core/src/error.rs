// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use thiserror::Error;

/// Errors produced when building a bucket layout.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A bucket limit was NaN and cannot be ordered.
    #[error("bucket limit is NaN")]
    NanLimit,
}

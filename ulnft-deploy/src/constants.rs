// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

/// File written by `export-env` unless `--output` is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Exit code of a failed chain step that a re-run can resume.
pub const RESUMABLE_EXIT_CODE: u8 = 2;

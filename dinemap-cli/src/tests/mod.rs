//! Shared test harness modules for the dinemap CLI.

use super::*;

mod helpers;
mod search_unit;

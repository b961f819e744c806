//! UI module root: exposes drawing functions for individual panels.

pub mod banner;
pub mod form;
pub mod header;
pub mod results;
pub mod theme;
pub mod util;

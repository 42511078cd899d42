#![forbid(unsafe_code)]

pub mod assemble;
pub mod chapter;
pub mod cli;
pub mod collection;
pub mod discover;
pub mod download;
pub mod error;
pub mod formats;
pub mod locator;
pub mod logging;
pub mod pager;
pub mod render;
pub mod site;
pub mod store;
pub mod template;
pub mod transport;

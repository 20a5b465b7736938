#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]

pub mod errors;
pub mod backend;
pub mod utils;
pub mod bbs;
pub mod group;

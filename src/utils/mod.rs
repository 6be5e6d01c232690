// src/utils/mod.rs
mod interp;
mod lock;

pub(crate) use interp::*;
pub(crate) use lock::*;

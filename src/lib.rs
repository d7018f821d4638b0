#[macro_use]
extern crate lazy_static;

pub mod oasis_compiler;

#![allow(dead_code)]

pub mod ast_builders;

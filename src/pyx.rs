//! Main module for the pyx stub engine

pub mod ast;
pub mod config;
pub mod formats;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod unparsed;

#[cfg(test)]
pub mod testing;

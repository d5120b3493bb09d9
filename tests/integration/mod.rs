//! End-to-end assembly against an on-disk upstream checkout

mod assemble_pipeline;
mod cli_commands;
mod support;

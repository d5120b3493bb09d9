//! Integration tests for the DevTools assembler

mod integration;

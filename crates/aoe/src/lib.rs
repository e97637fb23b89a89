pub mod collect;
pub mod commands;
pub mod pipeline;

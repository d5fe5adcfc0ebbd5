pub mod git;
#[cfg(test)]
pub mod memory;
pub mod tracker;

//! Pure relay logic: no I/O beyond the injected rhyme dictionary.

pub mod mutator;
pub mod relay;
pub mod word_selector;

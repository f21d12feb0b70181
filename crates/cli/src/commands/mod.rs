pub mod angles;
pub mod build;
pub mod inspect;
pub mod matching;

// Pipeline processing: normalizers, the word-frequency analyzer, and matching

pub mod matcher;
pub mod normalize;
pub mod sequence;
pub mod word_frequency;

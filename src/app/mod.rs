pub mod linkage_use_case;
pub mod ports;

pub use linkage_use_case::LinkageUseCase;

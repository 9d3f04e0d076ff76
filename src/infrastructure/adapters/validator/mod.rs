//! Sound Validator 适配器

mod symphonia_validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use symphonia_validator::SymphoniaSoundValidator;

mod feature_engine;
#[cfg(test)]
mod tests;

pub use feature_engine::FeatureEngine;

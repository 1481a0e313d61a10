// Feature engineering shared by training and inference
pub mod feature_registry;

pub use feature_registry::{
    CalendarFeatures, FeatureBuilder, FeatureCoverage, FeatureTable, FeatureVector, Schema,
    SchemaDiff, build_features,
};

pub mod predictor;
pub mod smartcore_predictor;
pub mod snapshot;
pub mod trainer;

pub use predictor::UsagePredictor;
pub use smartcore_predictor::{ForestParams, SmartCorePredictor};
pub use snapshot::ModelSnapshot;
pub use trainer::{Trainer, TrainerParams, TrainingOutcome};

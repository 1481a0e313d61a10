pub mod sample_data;

pub use sample_data::SampleDataGenerator;

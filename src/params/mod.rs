//! Household plan parameters and their JSON configuration format

mod data;

pub use data::{
    SimulationParameters, DEFAULT_NUM_PATHS, DEFAULT_SEED, DEFAULT_SOCIAL_SECURITY_AGE,
};

pub mod field;
pub mod integrator;
pub mod noise;
pub mod order;
pub mod phase;
pub mod topology;

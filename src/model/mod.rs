pub mod facility;
pub mod orders;
pub mod sampler;

pub mod effects;
pub mod kit;
pub mod kit_file;
pub mod metronome;
pub mod persistence;
pub mod project;
pub mod sequence;
pub mod transport;

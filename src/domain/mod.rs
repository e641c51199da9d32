pub mod entity;
pub mod proximity;
pub mod rules;
pub mod seed;

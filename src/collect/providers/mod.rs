pub mod gnews;
pub mod social;

pub mod code_generator;
pub mod phone;
pub mod validation;

pub use code_generator::generate_six_digit_code;
pub use phone::*;
pub use validation::*;

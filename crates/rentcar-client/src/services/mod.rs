pub mod dates;
pub mod pricing;
pub mod validation;

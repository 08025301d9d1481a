// Number formatting shared by the templates

pub mod formatters;

pub use formatters::{float_format4w, pow_format5w, PowAlign, PowFormat};

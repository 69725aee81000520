pub mod banks;
pub mod convert;
pub mod detect;

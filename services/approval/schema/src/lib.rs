pub mod approval_codes;
pub mod profiles;

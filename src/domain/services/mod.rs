mod ip_validator;

pub use ip_validator::IpValidator;
